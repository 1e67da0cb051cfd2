use std::collections::BTreeSet;

use chrono::{Local, NaiveDate, TimeZone};

use crate::journal::MoodSample;

/// Consecutive calendar days with at least one sample, in local time.
///
/// See [`current_streak_in`].
pub fn current_streak(samples: &[MoodSample], today: NaiveDate) -> u32 {
    current_streak_in(samples, today, &Local)
}

/// Consecutive calendar days with at least one sample, counted backwards
/// from the most recent sample dated on or before `today`.
///
/// Several samples on one day count once. Samples dated after `today`
/// (clock skew, backdating mistakes) are ignored. An empty history is 0.
pub fn current_streak_in<Tz: TimeZone>(samples: &[MoodSample], today: NaiveDate, tz: &Tz) -> u32 {
    let days: BTreeSet<NaiveDate> = samples
        .iter()
        .map(|s| s.timestamp.with_timezone(tz).date_naive())
        .filter(|day| *day <= today)
        .collect();

    let Some(&latest) = days.last() else {
        return 0;
    };

    let mut streak = 0;
    let mut day = latest;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}
