// Player - pass-through playback facade over a sequence

use log::info;

use crate::sequencer::error::SequencerError;
use crate::sequencer::sequence::Sequence;

/// Playback controls over one [`Sequence`].
///
/// This is a state facade: it tracks what the transport was asked to do,
/// not a clock. Actual rendering against time is the job of an external
/// engine consuming the sequence.
pub struct Player {
    sequence: Option<Sequence>,
    playing: bool,
    play_rate_scalar: f64,
}

impl Player {
    pub fn new() -> Self {
        Self {
            sequence: None,
            playing: false,
            play_rate_scalar: 1.0,
        }
    }

    /// Hand a sequence to the player. Track handles obtained before the
    /// hand-off keep working; the sequence itself is reachable through
    /// [`Player::sequence`].
    pub fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = Some(sequence);
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Start playback. Fails when no sequence has been set.
    pub fn start(&mut self) -> Result<(), SequencerError> {
        if self.sequence.is_none() {
            return Err(SequencerError::UnsupportedOperation(
                "player has no sequence",
            ));
        }
        self.playing = true;
        info!("playback started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.playing {
            info!("playback stopped");
        }
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playback rate multiplier, 1.0 = normal speed.
    pub fn play_rate_scalar(&self) -> f64 {
        self.play_rate_scalar
    }

    pub fn set_play_rate_scalar(&mut self, rate: f64) {
        self.play_rate_scalar = rate;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
