/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! remind-engine – picks the next reminder alarm for a task
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task.rs         – read-only task snapshot + reminder flags
//! ├── config/         – jitter constants, YAML engine configuration
//! ├── engine/         – DUE / OVERDUE / RANDOM rules and selection
//! └── scheduler/      – AlarmScheduler capability, trigger point, in-memory book
//! ```

pub mod config;
pub mod engine;
pub mod scheduler;
pub mod task;

pub use config::{EngineConfig, EngineConfigManager};
pub use engine::{Alarm, AlarmDecision, AlarmType, ReminderEngine};
pub use scheduler::{AlarmScheduler, InMemoryAlarmScheduler, ReminderService};
pub use task::{ReminderFlags, Task, TaskId};
