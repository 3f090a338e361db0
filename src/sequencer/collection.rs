// TrackCollection - the ordered, lock-guarded set of tracks in a sequence

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

use crate::sequencer::error::SequencerError;
use crate::sequencer::track::{LoopInfo, Track, TrackKind};
use crate::storage;
use crate::storage::types::SequenceDocument;

/// Initial attributes for a track created through
/// [`TrackCollection::new_track`]. Fields left as `None` keep the track
/// defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackInit {
    pub length: Option<f64>,
    pub loop_info: Option<LoopInfo>,
    pub offset: Option<f64>,
    pub mute: Option<bool>,
    pub solo: Option<bool>,
}

struct CollectionState {
    tracks: Vec<Track>,
    tempo: Option<Track>,
}

/// The ordered set of regular tracks in a sequence, plus the single tempo
/// track, created lazily on first access.
///
/// Every operation takes one collection-wide lock, so concurrent callers
/// serialize; there is no separate read path. Track handles are stored
/// directly, which makes indexed access return the identical track
/// identity on every call.
pub struct TrackCollection {
    state: Mutex<CollectionState>,
}

impl TrackCollection {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CollectionState {
                tracks: Vec::new(),
                tempo: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, CollectionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Create a regular track, append it to the collection and return its
    /// handle. Each call yields a distinct track.
    pub fn new_track(&self, init: TrackInit) -> Track {
        let mut state = self.state();
        let track = Track::new(TrackKind::Regular);
        {
            let mut track_state = track.state();
            if let Some(length) = init.length {
                track_state.explicit_length = length;
            }
            if let Some(loop_info) = init.loop_info {
                track_state.loop_info = loop_info;
            }
            if let Some(offset) = init.offset {
                track_state.offset = offset;
            }
            if let Some(mute) = init.mute {
                track_state.mute = mute;
            }
            if let Some(solo) = init.solo {
                track_state.solo = solo;
            }
        }
        state.tracks.push(track.clone());
        debug!("created track {}", state.tracks.len() - 1);
        track
    }

    /// Track at `index`. Repeated calls with the same index return the
    /// identical track.
    pub fn get(&self, index: usize) -> Result<Track, SequencerError> {
        let state = self.state();
        state
            .tracks
            .get(index)
            .cloned()
            .ok_or(SequencerError::IndexOutOfRange {
                index,
                len: state.tracks.len(),
            })
    }

    /// Remove `track` from the collection. The removed track becomes
    /// permanently inert: any further mutation of it fails.
    pub fn delete(&self, track: &Track) -> Result<(), SequencerError> {
        if track.kind() == TrackKind::Tempo {
            return Err(SequencerError::InvalidArgument(
                "the tempo track cannot be deleted".to_string(),
            ));
        }
        let mut state = self.state();
        let index = state
            .tracks
            .iter()
            .position(|t| t == track)
            .ok_or(SequencerError::NotInCollection)?;
        state.tracks.remove(index);
        track.mark_inert();
        debug!("deleted track {}", index);
        Ok(())
    }

    /// Position of `track` in the collection.
    pub fn index_of(&self, track: &Track) -> Result<usize, SequencerError> {
        if track.kind() == TrackKind::Tempo {
            return Err(SequencerError::InvalidArgument(
                "the tempo track has no index".to_string(),
            ));
        }
        let state = self.state();
        state
            .tracks
            .iter()
            .position(|t| t == track)
            .ok_or(SequencerError::NotInCollection)
    }

    /// Number of regular tracks. The tempo track is not counted.
    pub fn len(&self) -> usize {
        self.state().tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().tracks.is_empty()
    }

    /// The tempo track, created on first access. Every call returns the
    /// same track.
    pub fn tempo(&self) -> Track {
        let mut state = self.state();
        state
            .tempo
            .get_or_insert_with(|| Track::new(TrackKind::Tempo))
            .clone()
    }

    /// Snapshot of the regular tracks in insertion order. The handles are
    /// the same identities indexed access returns.
    pub fn tracks(&self) -> Vec<Track> {
        self.state().tracks.clone()
    }

    /// Read a sequence document and append its tracks after the existing
    /// ones. Runs entirely under the collection lock so no concurrent
    /// structural change can interleave with deserialization.
    pub(crate) fn load(&self, path: &Path) -> Result<(), SequencerError> {
        let mut state = self.state();

        let text = std::fs::read_to_string(path)?;
        let doc = storage::from_ron(&text)?;
        storage::check_version(&doc)?;

        let prior = state.tracks.len();
        for track_doc in &doc.tracks {
            let track = Track::new(TrackKind::Regular);
            storage::apply_track_document(track_doc, &track)?;
            state.tracks.push(track);
        }
        if let Some(tempo_doc) = &doc.tempo {
            let tempo = state
                .tempo
                .get_or_insert_with(|| Track::new(TrackKind::Tempo))
                .clone();
            storage::apply_track_document(tempo_doc, &tempo)?;
        }

        info!(
            "loaded {} tracks from {} ({} already present)",
            doc.tracks.len(),
            path.display(),
            prior
        );
        Ok(())
    }

    /// Serialize the current model to a sequence document at `path`,
    /// under the collection lock.
    pub(crate) fn save(&self, path: &Path) -> Result<(), SequencerError> {
        let state = self.state();

        let doc = SequenceDocument {
            metadata: storage::fresh_metadata(),
            tracks: state
                .tracks
                .iter()
                .map(storage::track_to_document)
                .collect(),
            tempo: state.tempo.as_ref().map(storage::track_to_document),
        };

        let text = storage::to_ron(&doc)?;
        std::fs::write(path, text)?;
        info!("saved {} tracks to {}", state.tracks.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::event::NoteMessage;

    #[test]
    fn test_new_track_yields_distinct_tracks() {
        let tracks = TrackCollection::new();
        let t1 = tracks.new_track(TrackInit::default());
        let t2 = tracks.new_track(TrackInit::default());
        let t3 = tracks.new_track(TrackInit::default());

        assert_eq!(tracks.len(), 3);
        assert_ne!(t1, t2);
        assert_ne!(t2, t3);
        assert_eq!(tracks.index_of(&t2).unwrap(), 1);
    }

    #[test]
    fn test_new_track_applies_init_attributes() {
        let tracks = TrackCollection::new();
        let track = tracks.new_track(TrackInit {
            length: Some(8.0),
            loop_info: Some(LoopInfo {
                duration: 4.0,
                number: 2,
            }),
            offset: Some(0.5),
            mute: Some(true),
            solo: Some(true),
        });

        assert_eq!(track.length(), 8.0);
        assert_eq!(track.loop_info().duration, 4.0);
        assert_eq!(track.loop_info().number, 2);
        assert_eq!(track.offset(), 0.5);
        assert!(track.mute());
        assert!(track.solo());
    }

    #[test]
    fn test_indexed_access_returns_same_identity() {
        let tracks = TrackCollection::new();
        let created = tracks.new_track(TrackInit::default());

        let a = tracks.get(0).unwrap();
        let b = tracks.get(0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, created);
    }

    #[test]
    fn test_get_out_of_range() {
        let tracks = TrackCollection::new();
        tracks.new_track(TrackInit::default());

        match tracks.get(42) {
            Err(SequencerError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 42);
                assert_eq!(len, 1);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_removes_and_makes_inert() {
        let tracks = TrackCollection::new();
        let t1 = tracks.new_track(TrackInit::default());
        let t2 = tracks.new_track(TrackInit::default());
        assert_eq!(tracks.len(), 2);

        tracks.delete(&t1).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks.get(0).unwrap(), t2);

        // The removed track refuses mutation from any handle.
        assert!(matches!(
            t1.add(0.0, NoteMessage::with_note(60)),
            Err(SequencerError::UnsupportedOperation(_))
        ));

        // Deleting it again: no longer a member.
        assert!(matches!(
            tracks.delete(&t1),
            Err(SequencerError::NotInCollection)
        ));
    }

    #[test]
    fn test_index_of_foreign_track() {
        let tracks = TrackCollection::new();
        tracks.new_track(TrackInit::default());

        let other = TrackCollection::new();
        let foreign = other.new_track(TrackInit::default());

        assert!(matches!(
            tracks.index_of(&foreign),
            Err(SequencerError::NotInCollection)
        ));
    }

    #[test]
    fn test_tempo_track_is_not_an_indexable_member() {
        let tracks = TrackCollection::new();
        let tempo = tracks.tempo();

        assert!(matches!(
            tracks.index_of(&tempo),
            Err(SequencerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracks.delete(&tempo),
            Err(SequencerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tempo_is_memoized() {
        let tracks = TrackCollection::new();
        let a = tracks.tempo();
        let b = tracks.tempo();
        assert_eq!(a, b);
        assert_eq!(a.kind(), TrackKind::Tempo);
        // The tempo track does not count towards size.
        assert_eq!(tracks.len(), 0);
    }

    #[test]
    fn test_iteration_matches_indexed_access() {
        let tracks = TrackCollection::new();
        let t1 = tracks.new_track(TrackInit::default());
        let t2 = tracks.new_track(TrackInit::default());
        let t3 = tracks.new_track(TrackInit::default());

        let snapshot = tracks.tracks();
        assert_eq!(snapshot, vec![t1, t2, t3]);
        for (i, track) in snapshot.iter().enumerate() {
            assert_eq!(*track, tracks.get(i).unwrap());
        }
    }
}
