/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Alarm scheduling capability and the task-save trigger point.
//!
//! ```text
//! task saved ──►  ReminderService::schedule_alarm()
//!                   │
//!                   ├─► ReminderEngine::compute_next_alarm()  ──►  Option<Alarm>
//!                   │
//!                   └─► AlarmScheduler::create_alarm(task, time, kind)   (only if Some)
//! ```
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Scheduler lookup | Injected per call — no process-wide "current scheduler" to swap |
//! | Test doubles | Plain structs implementing the one-method trait |
//! | Stale alarms | Superseding is the scheduler's policy ([`InMemoryAlarmScheduler`] replaces per task) |
//! | Randomness | `rand::thread_rng()` by default, caller-supplied in `schedule_alarm_with_rng` |

pub mod memory;

pub use memory::{InMemoryAlarmScheduler, PendingAlarm};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::engine::{AlarmDecision, AlarmType, ReminderEngine};
use crate::task::Task;

// ── AlarmScheduler ────────────────────────────────────────────────────────────

/// Capability that arms an alarm for a task.
///
/// Implementations decide what "arming" means: an OS timer, a row in a table,
/// a log line, or a test assertion.
pub trait AlarmScheduler {
    /// Arm an alarm of `kind` for `task` at `time`.
    ///
    /// Called at most once per trigger, and never when the engine decided
    /// there is nothing to arm.
    fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType);

    /// The engine decided no alarm applies to `task` any more.
    ///
    /// Schedulers that remember alarms per task can drop a stale one here.
    /// Default: no-op.
    fn clear_alarm(&mut self, _task: &Task) {}
}

impl<S: AlarmScheduler + ?Sized> AlarmScheduler for &mut S {
    fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
        (**self).create_alarm(task, time, kind);
    }

    fn clear_alarm(&mut self, task: &Task) {
        (**self).clear_alarm(task);
    }
}

impl<S: AlarmScheduler + ?Sized> AlarmScheduler for Box<S> {
    fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
        (**self).create_alarm(task, time, kind);
    }

    fn clear_alarm(&mut self, task: &Task) {
        (**self).clear_alarm(task);
    }
}

// ── LoggingAlarmScheduler ─────────────────────────────────────────────────────

/// Scheduler that only emits a `tracing` event per alarm.
///
/// Used by the CLI, where there is no OS alarm service to talk to.
#[derive(Debug, Default)]
pub struct LoggingAlarmScheduler {
    armed: usize,
}

impl LoggingAlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alarms armed so far.
    pub fn armed(&self) -> usize {
        self.armed
    }
}

impl AlarmScheduler for LoggingAlarmScheduler {
    fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
        self.armed += 1;
        info!(
            task  = task.id,
            title = %task.title,
            kind  = %kind,
            time  = %time.to_rfc3339(),
            "alarm armed"
        );
    }

    fn clear_alarm(&mut self, task: &Task) {
        debug!(task = task.id, "no alarm for task");
    }
}

// ── ReminderService ───────────────────────────────────────────────────────────

/// Trigger point: call on every task create/update.
///
/// Stateless apart from the engine configuration, so one service can be
/// shared across threads (`Send + Sync`).
#[derive(Debug, Clone, Default)]
pub struct ReminderService {
    engine: ReminderEngine,
}

impl ReminderService {
    pub fn new(engine: ReminderEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ReminderEngine {
        &self.engine
    }

    /// Compute the next alarm for `task` and hand it to `scheduler`.
    ///
    /// Jitter comes from the calling thread's `thread_rng`.  Returns the
    /// decision that was acted on.
    pub fn schedule_alarm<S: AlarmScheduler + ?Sized>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        scheduler: &mut S,
    ) -> AlarmDecision {
        self.schedule_alarm_with_rng(task, now, scheduler, &mut rand::thread_rng())
    }

    /// Same as [`schedule_alarm`](Self::schedule_alarm) with an explicit
    /// randomness source.
    pub fn schedule_alarm_with_rng<S, R>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        scheduler: &mut S,
        rng: &mut R,
    ) -> AlarmDecision
    where
        S: AlarmScheduler + ?Sized,
        R: Rng + ?Sized,
    {
        let decision = self.engine.compute_next_alarm(task, now, rng);

        match decision {
            Some(alarm) => {
                info!(
                    task = task.id,
                    kind = %alarm.kind,
                    time = %alarm.time,
                    "scheduling alarm"
                );
                scheduler.create_alarm(task, alarm.time, alarm.kind);
            }
            None => scheduler.clear_alarm(task),
        }

        decision
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Alarm;
    use crate::task::ReminderFlags;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Fails the test if any alarm is armed.
    struct NoAlarmExpected;

    impl AlarmScheduler for NoAlarmExpected {
        fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
            panic!(
                "created {kind} alarm at {time} for task {}, no alarm expected",
                task.id
            );
        }
    }

    /// Records that an alarm was armed and runs a per-test assertion on it.
    struct AlarmExpected<F: FnMut(&Task, DateTime<Utc>, AlarmType)> {
        check: F,
        alarm_created: bool,
    }

    impl<F: FnMut(&Task, DateTime<Utc>, AlarmType)> AlarmExpected<F> {
        fn new(check: F) -> Self {
            Self {
                check,
                alarm_created: false,
            }
        }
    }

    impl<F: FnMut(&Task, DateTime<Utc>, AlarmType)> AlarmScheduler for AlarmExpected<F> {
        fn create_alarm(&mut self, task: &Task, time: DateTime<Utc>, kind: AlarmType) {
            self.alarm_created = true;
            (self.check)(task, time, kind);
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    fn water() -> Task {
        Task::new(1, "water")
    }

    // ── Trigger scenarios ─────────────────────────────────────────────────────

    #[test]
    fn no_reminders_arms_nothing() {
        let service = ReminderService::default();
        let mut task = water();
        task.reminder_flags = ReminderFlags::NONE;

        let decision = service.schedule_alarm(&task, now(), &mut NoAlarmExpected);
        assert_eq!(decision, None);
    }

    #[test]
    fn due_dates() {
        let service = ReminderService::default();

        // due date in the past
        let mut task = water();
        task.due_date = Some(now() - Duration::days(1));
        task.reminder_flags = ReminderFlags::NOTIFY_AT_DEADLINE;
        service.schedule_alarm(&task, now(), &mut NoAlarmExpected);

        // due date in the future
        task.due_date = Some(now() + Duration::days(1));
        let mut expected = AlarmExpected::new(|task: &Task, time, kind| {
            assert_eq!(task.due_date, Some(time));
            assert_eq!(kind, AlarmType::Due);
        });
        service.schedule_alarm(&task, now(), &mut expected);
        assert!(expected.alarm_created);
    }

    #[test]
    fn random() {
        let service = ReminderService::default();
        let mut task = water();
        task.reminder_period = Some(Duration::weeks(1));

        for seed in 0..200 {
            let mut expected = AlarmExpected::new(|_: &Task, time, kind| {
                assert!(time > now());
                assert!(time < now() + Duration::weeks(1) * 6 / 5);
                assert_eq!(kind, AlarmType::Random);
            });
            let mut rng = StdRng::seed_from_u64(seed);
            service.schedule_alarm_with_rng(&task, now(), &mut expected, &mut rng);
            assert!(expected.alarm_created);
        }
    }

    #[test]
    fn overdue() {
        let service = ReminderService::default();

        // due date in the future
        let mut task = water();
        task.due_date = Some(now() + Duration::days(1));
        task.reminder_flags = ReminderFlags::NOTIFY_AFTER_DEADLINE;
        service.schedule_alarm(&task, now(), &mut NoAlarmExpected);

        // due date in the past
        task.due_date = Some(now() - Duration::days(1));
        let mut expected = AlarmExpected::new(|_: &Task, time, kind| {
            assert!(time > now());
            assert!(time < now() + Duration::days(2));
            assert_eq!(kind, AlarmType::Overdue);
        });
        service.schedule_alarm(&task, now(), &mut expected);
        assert!(expected.alarm_created);
    }

    #[test]
    fn multiple_reminders() {
        let service = ReminderService::default();

        // due date in the future, random enabled
        let mut task = water();
        task.due_date = Some(now() + Duration::weeks(1));
        task.reminder_flags = ReminderFlags::NOTIFY_AT_DEADLINE;
        task.reminder_period = Some(Duration::hours(1));

        let mut expected = AlarmExpected::new(|_: &Task, time, kind| {
            assert!(time > now());
            assert!(time < now() + Duration::days(1));
            assert_eq!(kind, AlarmType::Random);
        });
        service.schedule_alarm(&task, now(), &mut expected);
        assert!(expected.alarm_created);

        // due date in the past: random keeps firing
        task.due_date = Some(now() - Duration::weeks(1));
        expected.alarm_created = false;
        service.schedule_alarm(&task, now(), &mut expected);
        assert!(expected.alarm_created);

        // due date before the random
        task.due_date = Some(now() + Duration::hours(1));
        let mut expected = AlarmExpected::new(|task: &Task, time, kind| {
            assert_eq!(task.due_date, Some(time));
            assert_eq!(kind, AlarmType::Due);
        });
        service.schedule_alarm(&task, now(), &mut expected);
        assert!(expected.alarm_created);
    }

    // ── Service behaviour ─────────────────────────────────────────────────────

    #[test]
    fn returned_decision_matches_armed_alarm() {
        let service = ReminderService::default();
        let mut task = water();
        task.reminder_period = Some(Duration::days(2));

        let mut armed = None;
        let mut recorder = AlarmExpected::new(|_: &Task, time, kind| {
            armed = Some(Alarm::new(time, kind));
        });
        let mut rng = StdRng::seed_from_u64(99);
        let decision = service.schedule_alarm_with_rng(&task, now(), &mut recorder, &mut rng);
        assert!(recorder.alarm_created);
        drop(recorder);
        assert_eq!(decision, armed);
    }

    #[test]
    fn none_decision_clears_in_memory_alarm() {
        let service = ReminderService::default();
        let mut scheduler = InMemoryAlarmScheduler::new();

        let mut task = water();
        task.due_date = Some(now() + Duration::days(1));
        task.reminder_flags = ReminderFlags::NOTIFY_AT_DEADLINE;
        service.schedule_alarm(&task, now(), &mut scheduler);
        assert!(scheduler.pending(task.id).is_some());

        task.reminder_flags = ReminderFlags::NONE;
        service.schedule_alarm(&task, now(), &mut scheduler);
        assert!(scheduler.pending(task.id).is_none());
    }

    #[test]
    fn logging_scheduler_counts_armed_alarms() {
        let service = ReminderService::default();
        let mut scheduler = LoggingAlarmScheduler::new();

        let mut task = water();
        service.schedule_alarm(&task, now(), &mut scheduler);
        assert_eq!(scheduler.armed(), 0);

        task.reminder_period = Some(Duration::hours(4));
        service.schedule_alarm(&task, now(), &mut scheduler);
        assert_eq!(scheduler.armed(), 1);
    }

    #[test]
    fn boxed_dyn_scheduler_is_accepted() {
        let service = ReminderService::default();
        let mut scheduler: Box<dyn AlarmScheduler> = Box::new(NoAlarmExpected);
        assert_eq!(service.schedule_alarm(&water(), now(), &mut scheduler), None);
    }

    #[test]
    fn service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReminderService>();
    }
}
