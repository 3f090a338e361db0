// Track - time-ordered event storage with playback metadata

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::sequencer::error::SequencerError;
use crate::sequencer::event::Event;
use crate::sequencer::iterator::EventIterator;

/// Loop configuration for a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopInfo {
    /// Length of the looped section in beats
    pub duration: f64,
    /// Number of times the section repeats
    pub number: u32,
}

impl Default for LoopInfo {
    fn default() -> Self {
        Self {
            duration: 0.0,
            number: 1,
        }
    }
}

/// Whether a track holds regular MIDI events or tempo events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Regular,
    Tempo,
}

/// One stored (time, event) pair.
pub(crate) struct TrackEntry {
    pub(crate) time: f64,
    pub(crate) event: Event,
}

pub(crate) struct TrackState {
    pub(crate) entries: Vec<TrackEntry>,
    pub(crate) explicit_length: f64,
    pub(crate) loop_info: LoopInfo,
    pub(crate) offset: f64,
    pub(crate) mute: bool,
    pub(crate) solo: bool,
    pub(crate) resolution: u16,
    pub(crate) inert: bool,
}

impl TrackState {
    fn ensure_mutable(&self) -> Result<(), SequencerError> {
        if self.inert {
            Err(SequencerError::UnsupportedOperation(
                "track has been deleted",
            ))
        } else {
            Ok(())
        }
    }
}

/// A time-ordered sequence of events plus playback metadata.
///
/// `Track` is a shared handle: clones refer to the same underlying track,
/// and equality compares handle identity, not contents. Tracks are created
/// through [`TrackCollection`](crate::sequencer::TrackCollection) and stay
/// bound to their sequence for their whole lifetime.
///
/// Entries are kept sorted by time, non-decreasing; entries with equal
/// timestamps keep insertion order.
#[derive(Clone)]
pub struct Track {
    kind: TrackKind,
    state: Arc<Mutex<TrackState>>,
}

impl Track {
    /// Pulses per quarter note reported by the tempo track.
    pub const DEFAULT_RESOLUTION: u16 = 480;

    pub(crate) fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            state: Arc::new(Mutex::new(TrackState {
                entries: Vec::new(),
                explicit_length: 0.0,
                loop_info: LoopInfo::default(),
                offset: 0.0,
                mute: false,
                solo: false,
                resolution: Self::DEFAULT_RESOLUTION,
                inert: false,
            })),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, TrackState> {
        // A panicked writer leaves the data behind; keep serving it.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    fn check_destination(&self, event: &Event) -> Result<(), SequencerError> {
        let accepted = match (self.kind, event) {
            (TrackKind::Tempo, Event::Tempo(_)) => true,
            (TrackKind::Regular, Event::Note(_) | Event::Channel(_)) => true,
            _ => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(SequencerError::IllegalTrackDestination)
        }
    }

    /// Insert an event at the given time, keeping entries sorted.
    /// An entry added at an already-occupied timestamp lands after the
    /// existing entries at that timestamp.
    pub fn add(&self, time: f64, event: impl Into<Event>) -> Result<(), SequencerError> {
        let event = event.into();
        let mut state = self.state();
        state.ensure_mutable()?;
        self.check_destination(&event)?;

        let pos = state.entries.partition_point(|e| e.time <= time);
        state.entries.insert(pos, TrackEntry { time, event });
        debug!("added event at t={} (index {})", time, pos);
        Ok(())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    /// Reported track length: the explicit length or the end of the
    /// latest-sounding event, whichever is greater.
    pub fn length(&self) -> f64 {
        let state = self.state();
        state
            .entries
            .iter()
            .map(|e| e.time + e.event.sounding_duration())
            .fold(state.explicit_length, f64::max)
    }

    /// Set the explicit length. The reported length never drops below the
    /// event-derived maximum.
    pub fn set_length(&self, length: f64) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.explicit_length = length;
        Ok(())
    }

    pub fn loop_info(&self) -> LoopInfo {
        self.state().loop_info
    }

    pub fn set_loop_info(&self, loop_info: LoopInfo) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.loop_info = loop_info;
        Ok(())
    }

    /// Playback offset in beats.
    pub fn offset(&self) -> f64 {
        self.state().offset
    }

    pub fn set_offset(&self, offset: f64) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.offset = offset;
        Ok(())
    }

    pub fn mute(&self) -> bool {
        self.state().mute
    }

    pub fn set_mute(&self, mute: bool) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.mute = mute;
        Ok(())
    }

    pub fn solo(&self) -> bool {
        self.state().solo
    }

    pub fn set_solo(&self, solo: bool) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.solo = solo;
        Ok(())
    }

    /// Sequence resolution in pulses per quarter note. Only the tempo
    /// track carries a resolution.
    pub fn resolution(&self) -> Result<u16, SequencerError> {
        match self.kind {
            TrackKind::Tempo => Ok(self.state().resolution),
            TrackKind::Regular => Err(SequencerError::UnsupportedOperation(
                "resolution is only defined for the tempo track",
            )),
        }
    }

    /// A new cursor over this track, positioned on the first entry (or at
    /// the end sentinel if the track is empty).
    pub fn iterator(&self) -> EventIterator {
        EventIterator::new(self.clone())
    }

    /// Snapshot enumeration of the stored events in track order. Each call
    /// starts over from the beginning; cursor state is not shared.
    pub fn events(&self) -> std::vec::IntoIter<Event> {
        let events: Vec<Event> = self.state().entries.iter().map(|e| e.event).collect();
        events.into_iter()
    }

    pub(crate) fn entries_snapshot(&self) -> Vec<(f64, Event)> {
        self.state()
            .entries
            .iter()
            .map(|e| (e.time, e.event))
            .collect()
    }

    pub(crate) fn mark_inert(&self) {
        self.state().inert = true;
    }

    // Cursor support. Each call locks the track once, so an individual
    // operation observes a consistent entry list even with concurrent
    // callers; cross-call coordination is up to the caller.

    /// Index of the first entry whose time is >= `time`, or the entry
    /// count when every entry is earlier.
    pub(crate) fn lower_bound(&self, time: f64) -> usize {
        self.state().entries.partition_point(|e| e.time < time)
    }

    pub(crate) fn entry_at(&self, index: usize) -> Option<(f64, Event)> {
        self.state()
            .entries
            .get(index)
            .map(|e| (e.time, e.event))
    }

    /// Move the entry at `index` to a new time and re-sort it into place.
    /// Returns the entry's new index. The moved entry lands after any
    /// existing entries at the same timestamp, as a fresh insertion would.
    pub(crate) fn retime_entry(&self, index: usize, time: f64) -> Result<usize, SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        if index >= state.entries.len() {
            return Err(SequencerError::EndOfTrack);
        }
        let mut entry = state.entries.remove(index);
        entry.time = time;
        let pos = state.entries.partition_point(|e| e.time <= time);
        state.entries.insert(pos, entry);
        Ok(pos)
    }

    /// Replace the event at `index`, keeping its time.
    pub(crate) fn replace_event(&self, index: usize, event: Event) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        if index >= state.entries.len() {
            return Err(SequencerError::EndOfTrack);
        }
        self.check_destination(&event)?;
        state.entries[index].event = event;
        Ok(())
    }

    /// Remove the entry at `index`. Out-of-range indices (the end
    /// sentinel) are a no-op.
    pub(crate) fn remove_entry(&self, index: usize) -> Result<(), SequencerError> {
        let mut state = self.state();
        state.ensure_mutable()?;
        if index < state.entries.len() {
            state.entries.remove(index);
        }
        Ok(())
    }
}

/// Tracks compare by handle identity: a clone equals its original, two
/// separately created tracks never compare equal.
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Track {}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("kind", &self.kind)
            .field("entries", &self.len())
            .finish()
    }
}
