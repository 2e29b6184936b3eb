use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::entry::{Entry, EntryStatus};

/// Length of the consistency grid: a rolling window ending at the
/// dashboard's reference date, inclusive.
pub const HISTORY_WINDOW: usize = 14;

/// Projects sparse per-date entries onto a fixed-length completion
/// timeline, oldest first, ending at `reference`. A cell is 1 only when
/// an entry exists for that date with status `completed`; pending,
/// skipped, and missing dates all project to 0.
///
/// Pure over its inputs; the reference date may be in the future.
pub fn project(entries: &HashMap<NaiveDate, Entry>, reference: NaiveDate, window: usize) -> Vec<u8> {
    let mut bits = Vec::with_capacity(window);
    for offset in (0..window).rev() {
        let date = reference - Duration::days(offset as i64);
        let completed = entries
            .get(&date)
            .map(|entry| entry.status == EntryStatus::Completed)
            .unwrap_or(false);
        bits.push(u8::from(completed));
    }
    bits
}

/// First date covered by a window ending at `reference`.
pub fn window_start(reference: NaiveDate, window: usize) -> NaiveDate {
    reference - Duration::days(window as i64 - 1)
}

/// Absolute date of the grid cell at `index` (0-based, oldest first) for
/// a window ending at `reference`. `None` when the index falls outside
/// the window.
pub fn offset_to_date(reference: NaiveDate, window: usize, index: usize) -> Option<NaiveDate> {
    if index >= window {
        return None;
    }
    Some(reference - Duration::days((window - 1 - index) as i64))
}

/// Inverse of [`offset_to_date`]: grid index of `date` in a window ending
/// at `reference`, or `None` when the date falls outside the window.
pub fn date_to_offset(reference: NaiveDate, window: usize, date: NaiveDate) -> Option<usize> {
    let back = (reference - date).num_days();
    if back < 0 || back >= window as i64 {
        return None;
    }
    Some(window - 1 - back as usize)
}
