// Example: building a short chord progression and handing it to the player

use midiseq::{NoteMessage, NoteOptions, Player, Sequence, TempoEvent, TrackInit};

fn main() -> Result<(), midiseq::SequencerError> {
    let sequence = Sequence::new();

    let tempo = sequence.tracks().tempo();
    tempo.add(0.0, TempoEvent::new(120.0))?;

    let track = sequence.tracks().new_track(TrackInit::default());
    for (time, note, velocity) in [(0.0, 60, 64), (1.0, 64, 96), (2.0, 67, 110)] {
        track.add(
            time,
            NoteMessage::new(NoteOptions {
                note: Some(note),
                velocity: Some(velocity),
                ..Default::default()
            })?,
        )?;
    }
    // Closing chord, held for two beats.
    for note in [60, 64, 67, 72] {
        track.add(
            3.0,
            NoteMessage::new(NoteOptions {
                note: Some(note),
                velocity: Some(110),
                duration: Some(2.0),
                ..Default::default()
            })?,
        )?;
    }

    sequence.save("hello_world.seq")?;
    println!("Track length: {} beats", track.length());

    let mut player = Player::new();
    player.set_sequence(sequence);
    player.start()?;
    println!("Playing: {}", player.is_playing());
    player.stop();

    Ok(())
}
