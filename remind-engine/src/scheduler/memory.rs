/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! In-memory alarm book: at most one pending alarm per task.
//!
//! Every `create_alarm` for a task supersedes the alarm armed by the previous
//! save (cancel-then-rearm), so repeated saves never pile up stale alarms.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::AlarmScheduler;
use crate::engine::{Alarm, AlarmType};
use crate::task::{Task, TaskId};

/// An alarm waiting to ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlarm {
    pub task_id: TaskId,
    pub title: String,
    pub alarm: Alarm,
}

/// [`AlarmScheduler`] that keeps pending alarms in memory.
///
/// `BTreeMap` keyed by task id so iteration order never depends on hashing.
#[derive(Debug, Default)]
pub struct InMemoryAlarmScheduler {
    alarms: BTreeMap<TaskId, PendingAlarm>,

    /// Number of alarms replaced by a newer decision for the same task.
    superseded: usize,
}

impl InMemoryAlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The alarm currently armed for `task_id`.
    pub fn pending(&self, task_id: TaskId) -> Option<&PendingAlarm> {
        self.alarms.get(&task_id)
    }

    /// Disarm the alarm for `task_id`, returning it if one was armed.
    pub fn cancel(&mut self, task_id: TaskId) -> Option<PendingAlarm> {
        self.alarms.remove(&task_id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn superseded(&self) -> usize {
        self.superseded
    }

    /// All pending alarms, earliest first (ties by task id).
    pub fn iter(&self) -> impl Iterator<Item = &PendingAlarm> {
        let mut sorted: Vec<_> = self.alarms.values().collect();
        sorted.sort_by_key(|p| (p.alarm.time, p.task_id));
        sorted.into_iter()
    }

    /// Remove and return every alarm whose time is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<PendingAlarm> {
        let ids: Vec<TaskId> = self
            .alarms
            .values()
            .filter(|p| p.alarm.time <= now)
            .map(|p| p.task_id)
            .collect();

        let mut fired: Vec<PendingAlarm> = ids
            .into_iter()
            .filter_map(|id| self.alarms.remove(&id))
            .collect();
        fired.sort_by_key(|p| (p.alarm.time, p.task_id));
        fired
    }
}

impl AlarmScheduler for InMemoryAlarmScheduler {
    fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
        let pending = PendingAlarm {
            task_id: task.id,
            title: task.title.clone(),
            alarm: Alarm::new(time, kind),
        };
        if let Some(previous) = self.alarms.insert(task.id, pending) {
            self.superseded += 1;
            debug!(
                task = task.id,
                previous = %previous.alarm,
                "superseded pending alarm"
            );
        }
    }

    fn clear_alarm(&mut self, task: &Task) {
        if self.alarms.remove(&task.id).is_some() {
            debug!(task = task.id, "cleared pending alarm");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn create_replaces_previous_alarm_for_same_task() {
        let mut book = InMemoryAlarmScheduler::new();
        let task = Task::new(3, "laundry");

        book.create_alarm(&task, t0() + Duration::hours(5), AlarmType::Random);
        book.create_alarm(&task, t0() + Duration::hours(2), AlarmType::Due);

        assert_eq!(book.len(), 1);
        assert_eq!(book.superseded(), 1);
        let pending = book.pending(3).unwrap();
        assert_eq!(pending.alarm, Alarm::new(t0() + Duration::hours(2), AlarmType::Due));
        assert_eq!(pending.title, "laundry");
    }

    #[test]
    fn iter_is_sorted_by_time() {
        let mut book = InMemoryAlarmScheduler::new();
        book.create_alarm(&Task::new(1, "a"), t0() + Duration::hours(3), AlarmType::Due);
        book.create_alarm(&Task::new(2, "b"), t0() + Duration::hours(1), AlarmType::Random);
        book.create_alarm(&Task::new(3, "c"), t0() + Duration::hours(2), AlarmType::Overdue);

        let order: Vec<TaskId> = book.iter().map(|p| p.task_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn take_due_pops_only_elapsed_alarms() {
        let mut book = InMemoryAlarmScheduler::new();
        book.create_alarm(&Task::new(1, "a"), t0() + Duration::hours(3), AlarmType::Due);
        book.create_alarm(&Task::new(2, "b"), t0() + Duration::hours(1), AlarmType::Random);
        book.create_alarm(&Task::new(3, "c"), t0() + Duration::hours(2), AlarmType::Overdue);

        let fired = book.take_due(t0() + Duration::hours(2));
        let ids: Vec<TaskId> = fired.iter().map(|p| p.task_id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(book.len(), 1);
        assert!(book.pending(1).is_some());
    }

    #[test]
    fn cancel_and_clear_remove_alarm() {
        let mut book = InMemoryAlarmScheduler::new();
        let task = Task::new(9, "x");
        book.create_alarm(&task, t0(), AlarmType::Due);
        assert!(book.cancel(9).is_some());
        assert!(book.cancel(9).is_none());

        book.create_alarm(&task, t0(), AlarmType::Due);
        book.clear_alarm(&task);
        assert!(book.is_empty());
    }
}
