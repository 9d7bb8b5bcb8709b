/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task snapshot consumed by the reminder engine.
//!
//! Only three fields drive the alarm decision:
//!
//! ```text
//! due_date ─────────┐
//! reminder_flags ───┼──►  ReminderEngine  ──►  Option<Alarm>
//! reminder_period ──┘
//! ```
//!
//! `id` and `title` ride along so schedulers can key alarms per task and log
//! something readable.  The engine never looks at them.
//!
//! # Ownership model
//! The engine borrows a `&Task` for the duration of one decision and never
//! mutates it.  Callers are free to edit the task and trigger again; every
//! decision is computed from the fields as they are at call time.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Stable identifier of a task inside the surrounding task store.
pub type TaskId = u64;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised while building a task snapshot from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// A reminder flag name (CLI or YAML) did not match any known flag.
    #[error("unknown reminder flag: '{0}' (valid: at-deadline, after-deadline)")]
    UnknownReminderFlag(String),
}

// ── Reminder flags ────────────────────────────────────────────────────────────

/// Bitset of deadline notification rules enabled on a task.
///
/// Bit values match the stored `reminder_flags` column (`1 << 1` = at
/// deadline, `1 << 2` = after deadline).  Unknown bits coming from storage are
/// dropped by [`ReminderFlags::from_bits`] so they can never enable a rule the
/// engine does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReminderFlags(u32);

impl ReminderFlags {
    /// No deadline rule enabled.
    pub const NONE: Self = Self(0);

    /// Fire exactly when the due date is reached.
    pub const NOTIFY_AT_DEADLINE: Self = Self(1 << 1);

    /// Keep nagging once the due date has passed.
    pub const NOTIFY_AFTER_DEADLINE: Self = Self(1 << 2);

    const KNOWN_BITS: u32 = Self::NOTIFY_AT_DEADLINE.0 | Self::NOTIFY_AFTER_DEADLINE.0;

    /// Build from a raw stored integer, discarding unknown bits.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::KNOWN_BITS)
    }

    /// Raw integer form for storage.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit in `other` is set in `self`.
    ///
    /// `contains(NONE)` is always `true`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ReminderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ReminderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// Parses a single flag name.
///
/// Accepts both `kebab-case` (CLI) and `snake_case` (YAML) spellings, case
/// insensitive.  `"none"` parses to [`ReminderFlags::NONE`].
impl FromStr for ReminderFlags {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "at-deadline" => Ok(Self::NOTIFY_AT_DEADLINE),
            "after-deadline" => Ok(Self::NOTIFY_AFTER_DEADLINE),
            "none" => Ok(Self::NONE),
            _ => Err(TaskError::UnknownReminderFlag(s.to_string())),
        }
    }
}

impl fmt::Display for ReminderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::with_capacity(2);
        if self.contains(Self::NOTIFY_AT_DEADLINE) {
            names.push("at-deadline");
        }
        if self.contains(Self::NOTIFY_AFTER_DEADLINE) {
            names.push("after-deadline");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// Read-only view of a task as seen by the reminder engine.
///
/// * `due_date` — `None` means the task has no deadline; both deadline rules
///   are then inapplicable.
/// * `reminder_period` — `None`, zero or negative means random reminders are
///   disabled.  Negative values are tolerated rather than rejected so a bad
///   stored value can never break a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    // ── Identity ──────────────────────────────────────────────────────────────
    /// Task id in the surrounding store.  `0` for a not-yet-saved task.
    pub id: TaskId,

    /// Human readable title, used only for logging.
    pub title: String,

    // ── Reminder inputs ───────────────────────────────────────────────────────
    /// Deadline instant.
    pub due_date: Option<DateTime<Utc>>,

    /// Enabled deadline notification rules.
    pub reminder_flags: ReminderFlags,

    /// Nominal interval between random reminders.
    pub reminder_period: Option<Duration>,
}

impl Task {
    /// Create a task with no deadline, no flags and no reminder period.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Returns `true` if `flag` is enabled on this task.
    pub fn notifies(&self, flag: ReminderFlags) -> bool {
        !flag.is_empty() && self.reminder_flags.contains(flag)
    }

    /// The reminder period if random reminders are enabled, i.e. strictly
    /// positive.
    pub fn active_reminder_period(&self) -> Option<Duration> {
        self.reminder_period.filter(|p| *p > Duration::zero())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
