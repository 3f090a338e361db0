// EventIterator - a cursor over one track's entries

use crate::sequencer::error::SequencerError;
use crate::sequencer::event::Event;
use crate::sequencer::track::Track;

/// A stateful cursor over the entries of a single [`Track`].
///
/// The cursor holds an index in `[0, n]` where `n` is the track's entry
/// count: indices below `n` denote a current event, index `n` is the
/// one-past-end sentinel with no current event. The entry count is re-read
/// from the track on every call, so a cursor stays usable while its track
/// is mutated through other handles, but positions observed before such a
/// mutation may no longer be meaningful.
///
/// Several iterators may walk the same track at once, each with its own
/// cursor.
pub struct EventIterator {
    track: Track,
    cursor: usize,
}

impl EventIterator {
    pub(crate) fn new(track: Track) -> Self {
        Self { track, cursor: 0 }
    }

    /// Move the cursor to the first entry whose time is >= `time`, or to
    /// the end sentinel when every entry is earlier. An exact match lands
    /// on the matching entry, not past it.
    pub fn seek(&mut self, time: f64) {
        self.cursor = self.track.lower_bound(time);
    }

    /// Whether the cursor denotes a current event.
    pub fn has_current(&self) -> bool {
        self.cursor < self.track.len()
    }

    /// Advance the cursor by one position. Advancing from the last entry
    /// onto the sentinel is allowed once; advancing at the sentinel fails
    /// with `EndOfTrack`.
    pub fn next(&mut self) -> Result<(), SequencerError> {
        if self.cursor < self.track.len() {
            self.cursor += 1;
            Ok(())
        } else {
            Err(SequencerError::EndOfTrack)
        }
    }

    /// Whether advancing would land on another current event. False on
    /// the last entry even though one more `next()` call is still legal
    /// there (it lands on the sentinel).
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.track.len()
    }

    /// Retreat the cursor by one position; fails with `StartOfTrack` at
    /// index 0.
    pub fn prev(&mut self) -> Result<(), SequencerError> {
        if self.cursor > 0 {
            self.cursor -= 1;
            Ok(())
        } else {
            Err(SequencerError::StartOfTrack)
        }
    }

    pub fn has_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Time of the current entry.
    pub fn time(&self) -> Result<f64, SequencerError> {
        self.track
            .entry_at(self.cursor)
            .map(|(time, _)| time)
            .ok_or(SequencerError::EndOfTrack)
    }

    /// Move the current entry to a new time. The entry re-sorts into
    /// place (landing after existing entries with the same timestamp) and
    /// the cursor follows it, so the cursor's numeric index may change.
    pub fn set_time(&mut self, time: f64) -> Result<(), SequencerError> {
        self.cursor = self.track.retime_entry(self.cursor, time)?;
        Ok(())
    }

    /// The current event.
    pub fn event(&self) -> Result<Event, SequencerError> {
        self.track
            .entry_at(self.cursor)
            .map(|(_, event)| event)
            .ok_or(SequencerError::EndOfTrack)
    }

    /// Replace the current event in place, keeping its time. The variant
    /// may change freely as long as the track accepts it.
    pub fn set_event(&mut self, event: impl Into<Event>) -> Result<(), SequencerError> {
        self.track.replace_event(self.cursor, event.into())
    }

    /// Remove the current entry. Later entries shift down and the cursor
    /// stays put, so it then denotes what was the next entry (or the new
    /// sentinel). At the sentinel this is a no-op, not an error.
    pub fn delete(&mut self) -> Result<(), SequencerError> {
        self.track.remove_entry(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::event::{ChannelMessage, NoteMessage, TempoEvent};
    use crate::sequencer::track::{Track, TrackKind};

    fn note(n: u32) -> NoteMessage {
        NoteMessage::with_note(n)
    }

    /// Track with notes 60 at t=0 and 67 at t=1, plus its iterator.
    fn two_note_track() -> (Track, EventIterator) {
        let track = Track::new(TrackKind::Regular);
        track.add(0.0, note(60)).unwrap();
        track.add(1.0, note(67)).unwrap();
        let iter = track.iterator();
        (track, iter)
    }

    fn current_note(iter: &EventIterator) -> u8 {
        match iter.event().unwrap() {
            Event::Note(n) => n.note,
            other => panic!("Unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_seek_is_lower_bound() {
        let (_track, mut iter) = two_note_track();

        iter.seek(0.0);
        assert_eq!(current_note(&iter), 60);

        // Seeking between onsets advances to the next onset.
        iter.seek(0.1);
        assert_eq!(current_note(&iter), 67);

        // An exact match lands on the matching entry.
        iter.seek(1.0);
        assert_eq!(current_note(&iter), 67);

        // Past every entry: the sentinel.
        iter.seek(2.0);
        assert!(!iter.has_current());
    }

    #[test]
    fn test_has_current() {
        let (_track, mut iter) = two_note_track();
        assert!(iter.has_current());
        iter.next().unwrap();
        assert!(iter.has_current());
        iter.next().unwrap();
        assert!(!iter.has_current());
    }

    #[test]
    fn test_next_allows_one_bump_past_last_entry() {
        let (_track, mut iter) = two_note_track();
        iter.next().unwrap();
        iter.next().unwrap();
        let err = iter.next().unwrap_err();
        assert!(matches!(err, SequencerError::EndOfTrack));
        // Failing again is fine; the cursor stays at the sentinel.
        assert!(matches!(iter.next(), Err(SequencerError::EndOfTrack)));
    }

    #[test]
    fn test_has_next_predicts_current_event_not_call_success() {
        let (_track, mut iter) = two_note_track();
        assert!(iter.has_next());
        iter.next().unwrap();
        // On the last entry: no further current event, though one more
        // next() call is still legal.
        assert!(!iter.has_next());
        iter.next().unwrap();
        assert!(!iter.has_next());
    }

    #[test]
    fn test_prev_fails_at_start() {
        let (_track, mut iter) = two_note_track();
        iter.next().unwrap();
        iter.prev().unwrap();
        let err = iter.prev().unwrap_err();
        assert!(matches!(err, SequencerError::StartOfTrack));
    }

    #[test]
    fn test_has_prev() {
        let (_track, mut iter) = two_note_track();
        assert!(!iter.has_prev());
        iter.next().unwrap();
        assert!(iter.has_prev());
    }

    #[test]
    fn test_time_and_end_of_track() {
        let (_track, mut iter) = two_note_track();
        assert_eq!(iter.time().unwrap(), 0.0);
        iter.next().unwrap();
        assert_eq!(iter.time().unwrap(), 1.0);
        iter.next().unwrap();
        assert!(matches!(iter.time(), Err(SequencerError::EndOfTrack)));
        iter.seek(0.0);
        assert_eq!(iter.time().unwrap(), 0.0);
    }

    #[test]
    fn test_set_time_resorts_and_cursor_follows() {
        let (_track, mut iter) = two_note_track();

        // Move the first note onto the second note's onset. It lands
        // after the existing entry at t=1, and the cursor follows.
        iter.set_time(1.0).unwrap();
        assert_eq!(iter.time().unwrap(), 1.0);
        assert_eq!(current_note(&iter), 60);
        assert!(!iter.has_next());

        // Seeking back to the old onset now finds the other note first.
        iter.seek(0.0);
        assert_eq!(current_note(&iter), 67);
        iter.next().unwrap();
        assert_eq!(current_note(&iter), 60);
    }

    #[test]
    fn test_set_time_swaps_onsets() {
        let (_track, mut iter) = two_note_track();

        iter.set_time(2.0).unwrap();
        iter.seek(0.0);
        assert_eq!(current_note(&iter), 67);
        iter.set_time(0.5).unwrap();

        iter.seek(0.0);
        assert_eq!(current_note(&iter), 67);
        assert_eq!(iter.time().unwrap(), 0.5);
        iter.next().unwrap();
        assert_eq!(current_note(&iter), 60);
        assert_eq!(iter.time().unwrap(), 2.0);
    }

    #[test]
    fn test_set_time_at_sentinel_fails() {
        let (_track, mut iter) = two_note_track();
        iter.seek(10.0);
        assert!(matches!(
            iter.set_time(0.0),
            Err(SequencerError::EndOfTrack)
        ));
    }

    #[test]
    fn test_event_walks_channel_messages() {
        let track = Track::new(TrackKind::Regular);
        let ev1 = ChannelMessage::key_pressure(1, 60, 64);
        let ev2 = ChannelMessage::control_change(1, 1, 127);
        let ev3 = ChannelMessage::program_change(1, 42);
        let ev4 = ChannelMessage::channel_pressure(1, 37);
        let ev5 = ChannelMessage::pitch_bend(1, 84);
        for ev in [ev1, ev2, ev3, ev4, ev5] {
            track.add(0.0, ev).unwrap();
        }

        let mut iter = track.iterator();
        for expected in [ev1, ev2, ev3, ev4, ev5] {
            assert_eq!(iter.event().unwrap(), Event::Channel(expected));
            iter.next().unwrap();
        }
        assert!(!iter.has_current());
    }

    #[test]
    fn test_event_on_tempo_track() {
        let track = Track::new(TrackKind::Tempo);
        track.add(0.0, TempoEvent::new(120.0)).unwrap();

        let mut iter = track.iterator();
        assert_eq!(iter.event().unwrap(), Event::Tempo(TempoEvent::new(120.0)));

        iter.set_event(TempoEvent::new(60.0)).unwrap();
        assert_eq!(iter.event().unwrap(), Event::Tempo(TempoEvent::new(60.0)));
    }

    #[test]
    fn test_set_event_replaces_in_place() {
        let (_track, mut iter) = two_note_track();

        // Swap the two notes through the cursor.
        let first = iter.event().unwrap();
        iter.next().unwrap();
        let second = iter.event().unwrap();
        iter.set_event(first).unwrap();
        iter.prev().unwrap();
        iter.set_event(second).unwrap();

        iter.seek(0.0);
        assert_eq!(current_note(&iter), 67);
        assert_eq!(iter.time().unwrap(), 0.0);
        iter.next().unwrap();
        assert_eq!(current_note(&iter), 60);

        // The variant may change freely.
        iter.seek(0.0);
        let cc = ChannelMessage::control_change(1, 2, 3);
        iter.set_event(cc).unwrap();
        assert_eq!(iter.event().unwrap(), Event::Channel(cc));
    }

    #[test]
    fn test_set_event_checks_track_kind() {
        let (_track, mut iter) = two_note_track();
        let err = iter.set_event(TempoEvent::new(120.0)).unwrap_err();
        assert!(matches!(err, SequencerError::IllegalTrackDestination));
        // The entry is untouched.
        assert_eq!(current_note(&iter), 60);
    }

    #[test]
    fn test_set_event_at_sentinel_fails() {
        let (_track, mut iter) = two_note_track();
        while iter.has_current() {
            iter.next().unwrap();
        }
        let err = iter.set_event(note(60)).unwrap_err();
        assert!(matches!(err, SequencerError::EndOfTrack));
    }

    #[test]
    fn test_delete_shifts_and_sentinel_is_noop() {
        let (track, mut iter) = two_note_track();

        assert_eq!(current_note(&iter), 60);
        iter.delete().unwrap();
        // The cursor now denotes what was the next entry.
        assert_eq!(current_note(&iter), 67);
        iter.delete().unwrap();

        assert!(!iter.has_current());
        assert!(track.is_empty());
        // Deleting at the sentinel is a repeatable no-op.
        iter.delete().unwrap();
        iter.delete().unwrap();
    }

    #[test]
    fn test_iterator_on_empty_track_starts_at_sentinel() {
        let track = Track::new(TrackKind::Regular);
        let mut iter = track.iterator();
        assert!(!iter.has_current());
        assert!(matches!(iter.next(), Err(SequencerError::EndOfTrack)));
        assert!(matches!(iter.prev(), Err(SequencerError::StartOfTrack)));
    }

    #[test]
    fn test_iterator_sees_later_track_mutation() {
        let track = Track::new(TrackKind::Regular);
        let mut iter = track.iterator();
        assert!(!iter.has_current());

        track.add(0.0, note(60)).unwrap();
        assert!(iter.has_current());
        assert_eq!(current_note(&iter), 60);

        let mut other = track.iterator();
        other.delete().unwrap();
        assert!(!iter.has_current());
    }
}
