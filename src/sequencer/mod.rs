// Sequencer core - events, tracks, collections and cursors

pub mod collection;
pub mod error;
pub mod event;
pub mod iterator;
pub mod sequence;
pub mod track;

pub use collection::{TrackCollection, TrackInit};
pub use error::SequencerError;
pub use event::{
    ChannelMessage, ChannelMessageKind, ChannelOptions, Event, NoteMessage, NoteOptions,
    TempoEvent,
};
pub use iterator::EventIterator;
pub use sequence::Sequence;
pub use track::{LoopInfo, Track, TrackKind};
