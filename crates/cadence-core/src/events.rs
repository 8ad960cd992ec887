use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of user and schedule events recorded for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "focus.gain")]
    FocusGain,
    #[serde(rename = "focus.lost")]
    FocusLost,
    #[serde(rename = "timer.start")]
    TimerStart,
    #[serde(rename = "timer.pause")]
    TimerPause,
    #[serde(rename = "timer.stop")]
    TimerStop,
    #[serde(rename = "timer.complete")]
    TimerFinish,
    #[serde(rename = "schedule.advmanual")]
    ScheduleAdvanceManual,
    #[serde(rename = "schedule.advauto")]
    ScheduleAdvanceAuto,
    #[serde(rename = "other")]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::FocusGain,
        EventType::FocusLost,
        EventType::TimerStart,
        EventType::TimerPause,
        EventType::TimerStop,
        EventType::TimerFinish,
        EventType::ScheduleAdvanceManual,
        EventType::ScheduleAdvanceAuto,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::FocusGain => "focus.gain",
            EventType::FocusLost => "focus.lost",
            EventType::TimerStart => "timer.start",
            EventType::TimerPause => "timer.pause",
            EventType::TimerStop => "timer.stop",
            EventType::TimerFinish => "timer.complete",
            EventType::ScheduleAdvanceManual => "schedule.advmanual",
            EventType::ScheduleAdvanceAuto => "schedule.advauto",
            EventType::Other => "other",
        }
    }

    pub fn schedule_advance(is_automatic: bool) -> Self {
        if is_automatic {
            EventType::ScheduleAdvanceAuto
        } else {
            EventType::ScheduleAdvanceManual
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event identifier that is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type '{0}'")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    pub event_type: EventType,
}

/// Append-only, in-memory event log.
///
/// Insertion order is chronological order: a timestamp earlier than the
/// previous one (wall clock stepped back) is clamped to the previous one.
/// The log is unbounded; retention is up to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event_type` at the current time. Never gated.
    pub fn append(&mut self, event_type: EventType) -> &Event {
        self.append_at(event_type, Utc::now())
    }

    pub(crate) fn append_at(&mut self, event_type: EventType, at: DateTime<Utc>) -> &Event {
        let at = match self.events.last() {
            Some(last) if at < last.at => last.at,
            _ => at,
        };
        self.events.push(Event { at, event_type });
        &self.events[self.events.len() - 1]
    }

    /// Events recorded at or after `since`, oldest first.
    ///
    /// Holds no cursor; callers may repeat the query freely.
    pub fn events_since(&self, since: DateTime<Utc>) -> Vec<Event> {
        // Timestamps are non-decreasing, so the matches form a suffix.
        let start = self.events.partition_point(|e| e.at < since);
        self.events[start..].to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
