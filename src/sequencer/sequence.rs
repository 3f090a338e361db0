// Sequence - the top-level container handed to a player

use std::path::Path;

use crate::sequencer::collection::TrackCollection;
use crate::sequencer::error::SequencerError;

/// A sequence of tracks. Owns its [`TrackCollection`]; tracks created
/// through the collection belong to this sequence for their lifetime.
pub struct Sequence {
    tracks: TrackCollection,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            tracks: TrackCollection::new(),
        }
    }

    pub fn tracks(&self) -> &TrackCollection {
        &self.tracks
    }

    /// Load a sequence document, appending its tracks after the existing
    /// ones. Previously obtained track handles and indices stay valid.
    /// The collection lock is held for the whole operation.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(), SequencerError> {
        self.tracks.load(path.as_ref())
    }

    /// Save the current model as a sequence document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SequencerError> {
        self.tracks.save(path.as_ref())
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}
