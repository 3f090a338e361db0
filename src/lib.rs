// midiseq - music sequence data model
//
// Tracks of timed events grouped into a sequence, a lock-guarded track
// collection, a cursor protocol for walking and editing track contents,
// and a pass-through player facade.

pub mod player;
pub mod sequencer;
pub mod storage;

// Re-export commonly used types for convenience
pub use player::Player;
pub use sequencer::{
    ChannelMessage, ChannelMessageKind, ChannelOptions, Event, EventIterator, LoopInfo,
    NoteMessage, NoteOptions, Sequence, SequencerError, TempoEvent, Track, TrackCollection,
    TrackInit, TrackKind,
};
