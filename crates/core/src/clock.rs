// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable date stamps
//!
//! Logs and rendered configs carry two stamps: the run day (`%d_%m_%y`) and
//! the run hour (`%d_%m_%y_%H`).

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;

pub const DAY_FORMAT: &str = "%d_%m_%y";
pub const HOUR_FORMAT: &str = "%d_%m_%y_%H";

/// A clock that provides the current local time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Day stamp recorded in every log row, e.g. `16_10_26`.
    fn day(&self) -> String {
        self.now().format(DAY_FORMAT).to_string()
    }

    /// Hour stamp handed to the parameter file, e.g. `16_10_26_14`.
    fn hour(&self) -> String {
        self.now().format(HOUR_FORMAT).to_string()
    }
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fake clock for testing with a fixed, settable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    pub fn new() -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap_or_default();
        Self { current: Arc::new(Mutex::new(start)) }
    }

    /// Set the clock to a specific time
    pub fn set(&self, at: NaiveDateTime) {
        *self.current.lock() = at;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
