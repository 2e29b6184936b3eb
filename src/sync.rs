use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::handlers::dashboard::{DashboardHabit, DashboardResponse};
use crate::history;
use crate::models::daily_log::Mood;
use crate::models::entry::{Entry, EntryStatus};

/// Client-side mirror of one day's dashboard payload. Interactions mutate
/// it immediately; each mutator hands back the persistence call the
/// caller should issue asynchronously, so the UI never blocks on the
/// network. The server row stays the source of truth: echoes are merged
/// back via [`LocalDashboard::apply_entry`], and any failed persistence
/// call is reconciled by re-fetching and calling
/// [`LocalDashboard::refresh`].
#[derive(Debug)]
pub struct LocalDashboard {
    payload: DashboardResponse,
}

/// A pending `/entries/toggle` call produced by an optimistic mutation.
#[derive(Debug, PartialEq)]
pub struct ToggleCall {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub status: EntryStatus,
}

impl LocalDashboard {
    pub fn hydrate(payload: DashboardResponse) -> Self {
        Self { payload }
    }

    /// Full-replace reconciliation: drops every optimistic mutation in
    /// favor of a freshly fetched payload.
    pub fn refresh(&mut self, payload: DashboardResponse) {
        self.payload = payload;
    }

    pub fn date(&self) -> NaiveDate {
        self.payload.date
    }

    pub fn habits(&self) -> &[DashboardHabit] {
        &self.payload.habits
    }

    pub fn habit(&self, habit_id: i64) -> Option<&DashboardHabit> {
        self.payload.habits.iter().find(|h| h.id == habit_id)
    }

    /// Completion button: completed ↔ pending. Updates the status and the
    /// newest history cell together so the grid never disagrees with the
    /// card.
    pub fn cycle_complete(&mut self, habit_id: i64) -> Option<ToggleCall> {
        let date = self.payload.date;
        let habit = self.habit_mut(habit_id)?;
        let status = if habit.status == EntryStatus::Completed {
            EntryStatus::Pending
        } else {
            EntryStatus::Completed
        };
        habit.status = status.clone();
        if let Some(tail) = habit.history.last_mut() {
            *tail = u8::from(status == EntryStatus::Completed);
        }
        Some(ToggleCall {
            habit_id,
            date,
            status,
        })
    }

    /// Skip button: skipped ↔ pending (a completed habit can be skipped
    /// directly). Skipped days still render as 0 in the grid.
    pub fn cycle_skip(&mut self, habit_id: i64) -> Option<ToggleCall> {
        let date = self.payload.date;
        let habit = self.habit_mut(habit_id)?;
        let status = if habit.status == EntryStatus::Skipped {
            EntryStatus::Pending
        } else {
            EntryStatus::Skipped
        };
        habit.status = status.clone();
        if let Some(tail) = habit.history.last_mut() {
            *tail = 0;
        }
        Some(ToggleCall {
            habit_id,
            date,
            status,
        })
    }

    /// Grid cell click: flips the cell at `index` (0-based, oldest first)
    /// between completed and pending, resolving the index to its absolute
    /// calendar date for the persistence call. A wrong mapping here would
    /// edit a different day than the one clicked.
    pub fn toggle_cell(&mut self, habit_id: i64, index: usize) -> Option<ToggleCall> {
        let window = history::HISTORY_WINDOW;
        let date = history::offset_to_date(self.payload.date, window, index)?;
        let anchor = self.payload.date;
        let habit = self.habit_mut(habit_id)?;
        let cell = habit.history.get_mut(index)?;

        let status = if *cell == 1 {
            EntryStatus::Pending
        } else {
            EntryStatus::Completed
        };
        *cell = u8::from(status == EntryStatus::Completed);
        if date == anchor {
            habit.status = status.clone();
        }
        Some(ToggleCall {
            habit_id,
            date,
            status,
        })
    }

    /// Local note edit for the current date; persistence is debounced by
    /// the caller.
    pub fn set_note(&mut self, habit_id: i64, note: &str) -> bool {
        match self.habit_mut(habit_id) {
            Some(habit) => {
                habit.note = note.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.payload.daily_log.mood = Some(mood);
    }

    /// Local gratitude edit; persistence is debounced by the caller.
    pub fn set_gratitude(&mut self, gratitude: &str) {
        self.payload.daily_log.gratitude = gratitude.to_string();
    }

    /// Merges a server-confirmed entry row back into the local state.
    /// Returns false when the entry's date falls outside the visible
    /// window or the habit is not shown.
    pub fn apply_entry(&mut self, entry: &Entry) -> bool {
        let window = history::HISTORY_WINDOW;
        let anchor = self.payload.date;
        let Some(index) = history::date_to_offset(anchor, window, entry.date) else {
            return false;
        };
        let Some(habit) = self.habit_mut(entry.habit_id) else {
            return false;
        };

        if let Some(cell) = habit.history.get_mut(index) {
            *cell = u8::from(entry.status == EntryStatus::Completed);
        }
        if entry.date == anchor {
            habit.status = entry.status.clone();
            habit.note = entry.note.clone().unwrap_or_default();
        }
        true
    }

    /// Share of shown habits completed for the current date, rounded to
    /// a whole percent.
    pub fn progress_percent(&self) -> u8 {
        let total = self.payload.habits.len();
        if total == 0 {
            return 0;
        }
        let completed = self
            .payload
            .habits
            .iter()
            .filter(|h| h.status == EntryStatus::Completed)
            .count();
        ((completed as f64 / total as f64) * 100.0).round() as u8
    }

    fn habit_mut(&mut self, habit_id: i64) -> Option<&mut DashboardHabit> {
        self.payload.habits.iter_mut().find(|h| h.id == habit_id)
    }
}

/// Collapses rapid successive writes (keystrokes into a note or gratitude
/// field) into one persistence call after a quiet period. Clock is passed
/// in, never read.
#[derive(Debug)]
pub struct Debounce<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Stores `value` and restarts the quiet timer; any not-yet-flushed
    /// value is superseded.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Yields the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now);
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Yields the pending value immediately (field blur, page unload).
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}
