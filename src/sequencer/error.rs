// Error types for the sequencer core

/// Errors raised by the sequence model, collections and iterators.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("track index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("track does not belong to this collection")]
    NotInCollection,

    #[error("event kind is not accepted by this track")]
    IllegalTrackDestination,

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("no event at or past the end of the track")]
    EndOfTrack,

    #[error("no event before the start of the track")]
    StartOfTrack,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}
