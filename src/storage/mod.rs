// Sequence persistence - RON documents as the load/save boundary

pub mod types;

use chrono::Utc;

use crate::sequencer::error::SequencerError;
use crate::sequencer::event::{ChannelMessage, Event, NoteMessage, TempoEvent};
use crate::sequencer::track::{LoopInfo, Track};
use crate::storage::types::{
    DocumentMetadata, EntryDocument, EventDocument, SequenceDocument, TrackDocument,
};

/// Document format version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

pub(crate) fn fresh_metadata() -> DocumentMetadata {
    let now = Utc::now().to_rfc3339();
    DocumentMetadata {
        version: FORMAT_VERSION,
        created: now.clone(),
        modified: now,
    }
}

pub(crate) fn check_version(doc: &SequenceDocument) -> Result<(), SequencerError> {
    if doc.metadata.version != FORMAT_VERSION {
        return Err(SequencerError::Storage(format!(
            "unsupported document version {}",
            doc.metadata.version
        )));
    }
    Ok(())
}

/// Serialize a sequence document to RON.
pub(crate) fn to_ron(doc: &SequenceDocument) -> Result<String, SequencerError> {
    ron::to_string(doc)
        .map_err(|e| SequencerError::Storage(format!("failed to serialize sequence: {}", e)))
}

/// Deserialize a sequence document from RON.
pub(crate) fn from_ron(text: &str) -> Result<SequenceDocument, SequencerError> {
    ron::from_str(text)
        .map_err(|e| SequencerError::Storage(format!("failed to deserialize sequence: {}", e)))
}

pub(crate) fn track_to_document(track: &Track) -> TrackDocument {
    let entries = track.entries_snapshot();
    let state = track.state();
    TrackDocument {
        length: state.explicit_length,
        loop_duration: state.loop_info.duration,
        loop_number: state.loop_info.number,
        offset: state.offset,
        mute: state.mute,
        solo: state.solo,
        events: entries
            .into_iter()
            .map(|(time, event)| EntryDocument {
                time,
                event: event_to_document(&event),
            })
            .collect(),
    }
}

/// Fill a track from its document form: metadata first, then the events
/// in stored order through the regular insertion path.
pub(crate) fn apply_track_document(
    doc: &TrackDocument,
    track: &Track,
) -> Result<(), SequencerError> {
    {
        let mut state = track.state();
        state.explicit_length = doc.length;
        state.loop_info = LoopInfo {
            duration: doc.loop_duration,
            number: doc.loop_number,
        };
        state.offset = doc.offset;
        state.mute = doc.mute;
        state.solo = doc.solo;
    }
    for entry in &doc.events {
        track.add(entry.time, event_from_document(&entry.event))?;
    }
    Ok(())
}

fn event_to_document(event: &Event) -> EventDocument {
    match event {
        Event::Note(n) => EventDocument::Note {
            channel: n.channel,
            note: n.note,
            velocity: n.velocity,
            release_velocity: n.release_velocity,
            duration: n.duration,
        },
        Event::Channel(c) => EventDocument::Channel {
            status: c.status,
            data1: c.data1,
            data2: c.data2,
        },
        Event::Tempo(t) => EventDocument::Tempo { bpm: t.bpm },
    }
}

fn event_from_document(doc: &EventDocument) -> Event {
    match doc {
        EventDocument::Note {
            channel,
            note,
            velocity,
            release_velocity,
            duration,
        } => Event::Note(NoteMessage {
            channel: *channel,
            note: *note,
            velocity: *velocity,
            release_velocity: *release_velocity,
            duration: *duration,
        }),
        EventDocument::Channel {
            status,
            data1,
            data2,
        } => Event::Channel(ChannelMessage {
            status: *status,
            data1: *data1,
            data2: *data2,
        }),
        EventDocument::Tempo { bpm } => Event::Tempo(TempoEvent::new(*bpm)),
    }
}
