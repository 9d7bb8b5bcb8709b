/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Alarm decision types produced by the reminder engine.

use std::fmt;

use chrono::{DateTime, Utc};

// ── Alarm type ────────────────────────────────────────────────────────────────

/// Category of a scheduled alarm.
///
/// The declaration order is the tie-break precedence: when two candidates land
/// on the same instant, the one that sorts first wins.  Fixed deadlines beat
/// probabilistic reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlarmType {
    /// Fires exactly at the task's due date.
    Due,
    /// Near-future nag once the due date has passed.
    Overdue,
    /// Periodic jittered reminder, independent of the due date.
    Random,
}

impl AlarmType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlarmType::Due => "due",
            AlarmType::Overdue => "overdue",
            AlarmType::Random => "random",
        }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ── Alarm ─────────────────────────────────────────────────────────────────────

/// A single alarm: when it should ring and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub time: DateTime<Utc>,
    pub kind: AlarmType,
}

impl Alarm {
    pub fn new(time: DateTime<Utc>, kind: AlarmType) -> Self {
        Self { time, kind }
    }

    /// Ordering key used for selection: earliest time first, then
    /// [`AlarmType`] precedence.
    pub(crate) fn selection_key(&self) -> (DateTime<Utc>, AlarmType) {
        (self.time, self.kind)
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} alarm at {}", self.kind, self.time.to_rfc3339())
    }
}

/// Outcome of one engine invocation: `None` means no alarm should be armed.
pub type AlarmDecision = Option<Alarm>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn alarm_type_precedence_is_due_overdue_random() {
        assert!(AlarmType::Due < AlarmType::Overdue);
        assert!(AlarmType::Overdue < AlarmType::Random);
    }

    #[test]
    fn selection_key_breaks_ties_by_type() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let due = Alarm::new(t, AlarmType::Due);
        let random = Alarm::new(t, AlarmType::Random);
        assert!(due.selection_key() < random.selection_key());

        let earlier_random = Alarm::new(t - chrono::Duration::seconds(1), AlarmType::Random);
        assert!(earlier_random.selection_key() < due.selection_key());
    }

    #[test]
    fn alarm_display_names_type_and_time() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let alarm = Alarm::new(t, AlarmType::Overdue);
        assert_eq!(alarm.to_string(), "overdue alarm at 2026-01-01T09:00:00+00:00");
    }
}
