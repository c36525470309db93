use std::fmt;

/// Active case of an event's mutually exclusive `data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventVariant {
    Start,
    End,
    /// Neither `start` nor `end` was set on the wire message.
    Unknown,
}

impl EventVariant {
    /// Value forwarded as `event_subtype`; `None` serializes to `null`.
    pub fn subtype(&self) -> Option<&'static str> {
        match self {
            EventVariant::Start => Some("Start"),
            EventVariant::End => Some("End"),
            EventVariant::Unknown => None,
        }
    }

    /// Name of the wire field that carried the data (`data_type` in payloads).
    pub fn data_type(&self) -> Option<&'static str> {
        match self {
            EventVariant::Start => Some("start"),
            EventVariant::End => Some("end"),
            EventVariant::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.subtype().unwrap_or("Unknown")
    }
}

impl fmt::Display for EventVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event received from the vendor stream.
///
/// Events are transformed and forwarded, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub session: String,
    pub timestamp: i64,
    pub variant: EventVariant,
}

impl Event {
    pub fn new(session: impl Into<String>, timestamp: i64, variant: EventVariant) -> Self {
        Self {
            session: session.into(),
            timestamp,
            variant,
        }
    }
}
