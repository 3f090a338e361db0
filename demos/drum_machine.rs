// Example: a sixteen-beat drum pattern built onto a single track

use midiseq::{ChannelMessage, NoteMessage, NoteOptions, Player, Sequence, Track, TrackInit};

const KICK1: u32 = 32;
const KICK2: u32 = 36;
const SNARE: u32 = 40;

struct DrumMachine {
    player: Player,
    track: Track,
}

impl DrumMachine {
    fn new() -> Result<Self, midiseq::SequencerError> {
        let sequence = Sequence::new();
        let track = sequence.tracks().new_track(TrackInit::default());

        // Select the drum kit on channel 10.
        track.add(0.0, ChannelMessage::program_change(10, 26))?;
        track.add(0.0, ChannelMessage::control_change(10, 32, 1))?;

        let mut player = Player::new();
        player.set_sequence(sequence);

        let machine = Self { player, track };
        machine.build_track()?;
        Ok(machine)
    }

    fn hit(&self, beat: f64, note: u32) -> Result<(), midiseq::SequencerError> {
        self.track.add(
            beat,
            NoteMessage::new(NoteOptions {
                channel: Some(10),
                note: Some(note),
                velocity: Some(80),
                duration: Some(0.1),
                ..Default::default()
            })?,
        )
    }

    fn build_track(&self) -> Result<(), midiseq::SequencerError> {
        for step in 0..16u32 {
            let beat = step as f64;
            self.hit(beat, KICK1)?;
            self.hit(beat + 0.5, KICK2)?;
            if step % 4 == 0 {
                let extra = (step % 8 / 4) as f64;
                self.hit(beat + extra, SNARE)?;
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), midiseq::SequencerError> {
        self.player.start()?;
        println!(
            "Pattern of {} events over {} beats.",
            self.track.len(),
            self.track.length()
        );
        self.player.stop();
        Ok(())
    }
}

fn main() -> Result<(), midiseq::SequencerError> {
    DrumMachine::new()?.run()
}
