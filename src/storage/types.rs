// Serializable document types mirroring the live sequence model

use serde::{Deserialize, Serialize};

/// On-disk form of a whole sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDocument {
    pub metadata: DocumentMetadata,
    /// Regular tracks, in collection order.
    pub tracks: Vec<TrackDocument>,
    /// Contents of the tempo track, if it holds anything worth saving.
    pub tempo: Option<TrackDocument>,
}

/// Document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document format version
    pub version: u32,
    /// Creation timestamp (RFC 3339)
    pub created: String,
    /// Last modification timestamp (RFC 3339)
    pub modified: String,
}

/// On-disk form of one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDocument {
    /// Explicit track length; the reported length is recomputed from the
    /// events after loading.
    pub length: f64,
    pub loop_duration: f64,
    pub loop_number: u32,
    pub offset: f64,
    pub mute: bool,
    pub solo: bool,
    pub events: Vec<EntryDocument>,
}

/// One stored (time, event) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDocument {
    pub time: f64,
    pub event: EventDocument,
}

/// On-disk form of a single event, tagged by variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventDocument {
    Note {
        channel: u8,
        note: u8,
        velocity: u8,
        release_velocity: u8,
        duration: f64,
    },
    Channel {
        status: u8,
        data1: u8,
        data2: Option<u8>,
    },
    Tempo {
        bpm: f64,
    },
}
