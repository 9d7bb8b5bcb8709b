/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure helpers for jittered offsets.
//!
//! All arithmetic runs at microsecond resolution and is checked: anything
//! that would overflow returns `None`, which the engine treats as "rule not
//! applicable" rather than a panic.

use chrono::Duration;
use rand::Rng;

/// `d × factor`, or `None` if the result is not representable.
pub fn scale_duration(d: Duration, factor: f64) -> Option<Duration> {
    let micros = d.num_microseconds()? as f64 * factor;
    // i64::MAX as f64 rounds up to 2^63, so `>=` also rejects the boundary
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

/// Uniform offset in `(0, window]`.
///
/// Returns `None` if `window` is shorter than one microsecond.
pub fn offset_up_to<R: Rng + ?Sized>(rng: &mut R, window: Duration) -> Option<Duration> {
    let max = window.num_microseconds()?;
    if max < 1 {
        return None;
    }
    Some(Duration::microseconds(rng.gen_range(1..=max)))
}

/// Uniform offset strictly inside `(0, window)`.
///
/// Returns `None` if the open interval holds no whole microsecond.
pub fn offset_within<R: Rng + ?Sized>(rng: &mut R, window: Duration) -> Option<Duration> {
    let max = window.num_microseconds()?;
    if max < 2 {
        return None;
    }
    Some(Duration::microseconds(rng.gen_range(1..max)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
