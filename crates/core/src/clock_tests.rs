// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_formats_day_and_hour() {
    let clock = FakeClock::new();
    assert_eq!(clock.day(), "16_10_26");
    assert_eq!(clock.hour(), "16_10_26_14");
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let later = NaiveDate::from_ymd_opt(2027, 1, 2).unwrap().and_hms_opt(3, 0, 0).unwrap();
    clock2.set(later);
    assert_eq!(clock1.day(), "02_01_27");
    assert_eq!(clock1.hour(), "02_01_27_03");
}

#[test]
fn system_clock_day_has_three_fields() {
    let day = SystemClock.day();
    assert_eq!(day.split('_').count(), 3);
}
