// Event model - note messages, channel messages and tempo events

use crate::sequencer::error::SequencerError;

/// A timed event stored on a track.
///
/// Regular tracks hold `Note` and `Channel` events; the tempo track holds
/// `Tempo` events. Equality is structural: two events of the same variant
/// with equal fields compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Note(NoteMessage),
    Channel(ChannelMessage),
    Tempo(TempoEvent),
}

impl Event {
    /// Sounding duration of the event, used for track length computation.
    /// Only note messages occupy time; everything else is instantaneous.
    pub(crate) fn sounding_duration(&self) -> f64 {
        match self {
            Event::Note(note) => note.duration,
            Event::Channel(_) | Event::Tempo(_) => 0.0,
        }
    }
}

impl From<NoteMessage> for Event {
    fn from(msg: NoteMessage) -> Self {
        Event::Note(msg)
    }
}

impl From<ChannelMessage> for Event {
    fn from(msg: ChannelMessage) -> Self {
        Event::Channel(msg)
    }
}

impl From<TempoEvent> for Event {
    fn from(ev: TempoEvent) -> Self {
        Event::Tempo(ev)
    }
}

/// Wrap an arbitrary integer into a MIDI data byte.
/// Out-of-range values wrap modulo 256 instead of failing; callers do
/// their own range discipline.
fn wrap_byte(value: u32) -> u8 {
    (value % 256) as u8
}

/// A MIDI note with velocity and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteMessage {
    /// MIDI channel
    pub channel: u8,
    /// MIDI note number (60 = C4)
    pub note: u8,
    /// Attack velocity
    pub velocity: u8,
    /// Release velocity
    pub release_velocity: u8,
    /// Sounding duration in beats
    pub duration: f64,
}

/// Construction options for [`NoteMessage`].
///
/// `note` is required; every other field falls back to its default when
/// left as `None`. Byte-valued fields accept any integer and wrap
/// modulo 256.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteOptions {
    pub channel: Option<u32>,
    pub note: Option<u32>,
    pub velocity: Option<u32>,
    pub release_velocity: Option<u32>,
    pub duration: Option<f64>,
}

impl NoteMessage {
    /// Build a note message, filling omitted fields with their defaults
    /// (channel 1, velocity 64, release velocity 0, duration 1.0).
    pub fn new(opts: NoteOptions) -> Result<Self, SequencerError> {
        let note = opts.note.ok_or(SequencerError::MissingField("note"))?;
        Ok(Self {
            channel: wrap_byte(opts.channel.unwrap_or(1)),
            note: wrap_byte(note),
            velocity: wrap_byte(opts.velocity.unwrap_or(64)),
            release_velocity: wrap_byte(opts.release_velocity.unwrap_or(0)),
            duration: opts.duration.unwrap_or(1.0),
        })
    }

    /// Shorthand for a note message with all defaults.
    pub fn with_note(note: u32) -> Self {
        Self {
            channel: 1,
            note: wrap_byte(note),
            velocity: 64,
            release_velocity: 0,
            duration: 1.0,
        }
    }
}

/// Kind of a channel message, identified by the high nibble of its
/// status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMessageKind {
    KeyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl ChannelMessageKind {
    /// Status mask for this message kind.
    pub fn mask(self) -> u8 {
        match self {
            ChannelMessageKind::KeyPressure => 0xA0,
            ChannelMessageKind::ControlChange => 0xB0,
            ChannelMessageKind::ProgramChange => 0xC0,
            ChannelMessageKind::ChannelPressure => 0xD0,
            ChannelMessageKind::PitchBend => 0xE0,
        }
    }

    /// Recover the kind from a status byte, if the high nibble names one.
    pub fn from_status(status: u8) -> Option<Self> {
        match status & 0xF0 {
            0xA0 => Some(ChannelMessageKind::KeyPressure),
            0xB0 => Some(ChannelMessageKind::ControlChange),
            0xC0 => Some(ChannelMessageKind::ProgramChange),
            0xD0 => Some(ChannelMessageKind::ChannelPressure),
            0xE0 => Some(ChannelMessageKind::PitchBend),
            _ => None,
        }
    }
}

/// A raw channel voice message: a status byte plus one or two data bytes.
///
/// `status = mask | channel` and `channel = status ^ mask` round-trip for
/// channels 0-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: Option<u8>,
}

/// Construction options for a raw [`ChannelMessage`].
/// `status` is required; `data1` defaults to 0, `data2` to absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelOptions {
    pub status: Option<u32>,
    pub data1: Option<u32>,
    pub data2: Option<u32>,
}

impl ChannelMessage {
    /// Build a raw channel message from explicit status and data bytes.
    pub fn new(opts: ChannelOptions) -> Result<Self, SequencerError> {
        let status = opts.status.ok_or(SequencerError::MissingField("status"))?;
        Ok(Self {
            status: wrap_byte(status),
            data1: wrap_byte(opts.data1.unwrap_or(0)),
            data2: opts.data2.map(wrap_byte),
        })
    }

    fn from_parts(kind: ChannelMessageKind, channel: u8, data1: u8, data2: Option<u8>) -> Self {
        Self {
            status: kind.mask() | channel,
            data1,
            data2,
        }
    }

    /// Polyphonic key pressure (aftertouch) for a single note.
    pub fn key_pressure(channel: u8, note: u8, pressure: u8) -> Self {
        Self::from_parts(ChannelMessageKind::KeyPressure, channel, note, Some(pressure))
    }

    /// Continuous controller change.
    pub fn control_change(channel: u8, number: u8, value: u8) -> Self {
        Self::from_parts(ChannelMessageKind::ControlChange, channel, number, Some(value))
    }

    /// Program (patch) change. Carries a single data byte.
    pub fn program_change(channel: u8, program: u8) -> Self {
        Self::from_parts(ChannelMessageKind::ProgramChange, channel, program, None)
    }

    /// Channel-wide pressure (aftertouch). Carries a single data byte.
    pub fn channel_pressure(channel: u8, pressure: u8) -> Self {
        Self::from_parts(ChannelMessageKind::ChannelPressure, channel, pressure, None)
    }

    /// Pitch bend.
    pub fn pitch_bend(channel: u8, value: u8) -> Self {
        Self::from_parts(ChannelMessageKind::PitchBend, channel, value, None)
    }

    /// Message kind derived from the status byte.
    pub fn kind(&self) -> Option<ChannelMessageKind> {
        ChannelMessageKind::from_status(self.status)
    }

    /// High nibble of the status byte.
    pub fn mask(&self) -> u8 {
        self.status & 0xF0
    }

    /// Channel encoded in the status byte.
    pub fn channel(&self) -> u8 {
        self.status ^ self.mask()
    }

    /// Note number, for key pressure messages.
    pub fn note(&self) -> Option<u8> {
        match self.kind()? {
            ChannelMessageKind::KeyPressure => Some(self.data1),
            _ => None,
        }
    }

    /// Pressure amount, for key pressure and channel pressure messages.
    pub fn pressure(&self) -> Option<u8> {
        match self.kind()? {
            ChannelMessageKind::KeyPressure => self.data2,
            ChannelMessageKind::ChannelPressure => Some(self.data1),
            _ => None,
        }
    }

    /// Controller number, for control change messages.
    pub fn number(&self) -> Option<u8> {
        match self.kind()? {
            ChannelMessageKind::ControlChange => Some(self.data1),
            _ => None,
        }
    }

    /// Controller or bend value, for control change and pitch bend messages.
    pub fn value(&self) -> Option<u8> {
        match self.kind()? {
            ChannelMessageKind::ControlChange => self.data2,
            ChannelMessageKind::PitchBend => Some(self.data1),
            _ => None,
        }
    }

    /// Program number, for program change messages.
    pub fn program(&self) -> Option<u8> {
        match self.kind()? {
            ChannelMessageKind::ProgramChange => Some(self.data1),
            _ => None,
        }
    }
}

/// A tempo change on the tempo track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEvent {
    /// Beats per minute
    pub bpm: f64,
}

impl TempoEvent {
    pub fn new(bpm: f64) -> Self {
        Self { bpm }
    }
}
