//! Calendar navigation state and its reducer.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Week,
    Month,
}

/// Navigation actions from the header and the sidebar mini-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "day", rename_all = "snake_case")]
pub enum NavAction {
    Today,
    Prev,
    Next,
    ShowWeek,
    ShowMonth,
    MiniPrev,
    MiniNext,
    SelectDay(u32),
}

/// What the calendar currently displays.
///
/// `week_start` is always a Monday and `selected_day` is always a valid day
/// of `(year, month)`. Months are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarViewState {
    pub view: ViewMode,
    pub year: i32,
    pub month: u32,
    pub week_start: NaiveDate,
    pub selected_day: u32,
}

impl CalendarViewState {
    /// Week view of the week containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        CalendarViewState {
            view: ViewMode::Week,
            year: today.year(),
            month: today.month(),
            week_start: monday_of(today),
            selected_day: today.day(),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.selected_day)
            .unwrap_or_else(|| first_of_month(self.year, self.month))
    }

    /// The seven days shown by the week view.
    pub fn week_days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.week_start + Duration::days(i as i64))
    }

    /// Return the state after `action`. `today` anchors the `Today` action.
    pub fn apply(self, action: NavAction, today: NaiveDate) -> Self {
        let mut next = self;

        match action {
            NavAction::Today => {
                next.year = today.year();
                next.month = today.month();
                next.selected_day = today.day();
                next.week_start = monday_of(today);
            }
            NavAction::Prev | NavAction::Next => {
                let forward = action == NavAction::Next;
                match self.view {
                    ViewMode::Week => {
                        let shift = Duration::days(if forward { 7 } else { -7 });
                        next.focus(self.week_start + shift);
                    }
                    ViewMode::Month => {
                        (next.year, next.month) = shift_month(self.year, self.month, forward);
                        next.selected_day = 1;
                    }
                }
            }
            NavAction::ShowWeek => {
                next.view = ViewMode::Week;
                next.week_start = monday_of(self.selected_date());
            }
            NavAction::ShowMonth => {
                next.view = ViewMode::Month;
            }
            NavAction::MiniPrev | NavAction::MiniNext => {
                (next.year, next.month) =
                    shift_month(self.year, self.month, action == NavAction::MiniNext);
                next.selected_day = self.selected_day.min(days_in_month(next.year, next.month));
            }
            NavAction::SelectDay(day) => {
                let Some(date) = NaiveDate::from_ymd_opt(self.year, self.month, day) else {
                    tracing::warn!(day, year = self.year, month = self.month, "ignoring invalid day");
                    return self;
                };
                next.selected_day = day;
                if self.view == ViewMode::Week {
                    next.week_start = monday_of(date);
                }
            }
        }

        next
    }

    /// Point the state at `date`: its month, its day and its week.
    pub fn focus(&mut self, date: NaiveDate) {
        self.year = date.year();
        self.month = date.month();
        self.selected_day = date.day();
        self.week_start = monday_of(date);
    }
}

pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, true);
    let first = first_of_month(year, month);
    let next_first = first_of_month(next_year, next_month);
    (next_first - first).num_days() as u32
}

fn shift_month(year: i32, month: u32, forward: bool) -> (i32, u32) {
    match (forward, month) {
        (true, 12) => (year + 1, 1),
        (true, m) => (year, m + 1),
        (false, 1) => (year - 1, 12),
        (false, m) => (year, m - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_invariants(state: &CalendarViewState) {
        assert_eq!(state.week_start.weekday(), Weekday::Mon);
        assert!(state.selected_day >= 1);
        assert!(state.selected_day <= days_in_month(state.year, state.month));
    }

    #[test]
    fn new_state_starts_on_monday() {
        // 2024-03-07 is a Thursday
        let state = CalendarViewState::new(date(2024, 3, 7));
        assert_eq!(state.week_start, date(2024, 3, 4));
        assert_eq!(state.selected_day, 7);
        assert_eq!(state.view, ViewMode::Week);
    }

    #[test]
    fn monday_of_sunday_is_previous_monday() {
        assert_eq!(monday_of(date(2024, 3, 10)), date(2024, 3, 4));
        assert_eq!(monday_of(date(2024, 3, 4)), date(2024, 3, 4));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn week_navigation_is_periodic() {
        let today = date(2024, 1, 1);
        let mut state = CalendarViewState::new(date(2023, 12, 28));
        for _ in 0..60 {
            let there_and_back = state.apply(NavAction::Next, today).apply(NavAction::Prev, today);
            assert_eq!(there_and_back.week_start, state.week_start);
            state = state.apply(NavAction::Next, today);
            assert_invariants(&state);
        }
    }

    #[test]
    fn week_navigation_follows_month_boundaries() {
        let state = CalendarViewState::new(date(2024, 2, 28));
        let next = state.apply(NavAction::Next, date(2024, 1, 1));
        assert_eq!(next.week_start, date(2024, 3, 4));
        assert_eq!((next.year, next.month, next.selected_day), (2024, 3, 4));
    }

    #[test]
    fn month_navigation_wraps_years_and_resets_day() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 12, 31)).apply(NavAction::ShowMonth, today);

        let next = state.apply(NavAction::Next, today);
        assert_eq!((next.year, next.month, next.selected_day), (2025, 1, 1));

        let back = next.apply(NavAction::Prev, today).apply(NavAction::Prev, today);
        assert_eq!((back.year, back.month, back.selected_day), (2024, 11, 1));
        assert_invariants(&back);
    }

    #[test]
    fn show_week_recomputes_week_start_from_selected_day() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 3, 7))
            .apply(NavAction::ShowMonth, today)
            .apply(NavAction::Next, today)
            .apply(NavAction::ShowWeek, today);

        assert_eq!(state.view, ViewMode::Week);
        assert_eq!(state.week_start, date(2024, 4, 1));
    }

    #[test]
    fn mini_navigation_clamps_selected_day() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 1, 31)).apply(NavAction::MiniNext, today);
        assert_eq!((state.month, state.selected_day), (2, 29));
        assert_invariants(&state);
    }

    #[test]
    fn select_day_in_week_view_moves_week() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 3, 7)).apply(NavAction::SelectDay(20), today);
        assert_eq!(state.selected_day, 20);
        assert_eq!(state.week_start, date(2024, 3, 18));
    }

    #[test]
    fn select_day_in_month_view_keeps_week() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 3, 7)).apply(NavAction::ShowMonth, today);
        let selected = state.apply(NavAction::SelectDay(20), today);
        assert_eq!(selected.week_start, state.week_start);
        assert_eq!(selected.selected_day, 20);
    }

    #[test]
    fn invalid_day_is_ignored() {
        let today = date(2024, 1, 1);
        let state = CalendarViewState::new(date(2024, 2, 7));
        assert_eq!(state.apply(NavAction::SelectDay(30), today), state);
    }

    #[test]
    fn today_resets_everything_but_the_view() {
        let today = date(2024, 3, 7);
        let state = CalendarViewState::new(date(2020, 6, 1))
            .apply(NavAction::ShowMonth, today)
            .apply(NavAction::Today, today);

        assert_eq!(state.view, ViewMode::Month);
        assert_eq!((state.year, state.month, state.selected_day), (2024, 3, 7));
        assert_eq!(state.week_start, date(2024, 3, 4));
    }
}
