//! Dashboard traffic analytics: window filtering and derived statistics.
//!
//! The stored series is a list of per-day visit counters. Everything here is
//! a pure function over that series so the numbers shown on the dashboard
//! can be unit-tested without a database.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::{DailyTraffic, Database};

/// Caller-selected time filter applied to the traffic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficWindow {
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "all")]
    AllTime,
}

impl TrafficWindow {
    /// Earliest date included in the window, `None` for all time.
    ///
    /// "7 days" means today and the six days before it, so the cutoff is
    /// `today - 6`; likewise `today - 29` for the 30-day window.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let span = match self {
            TrafficWindow::SevenDays => 6,
            TrafficWindow::ThirtyDays => 29,
            TrafficWindow::AllTime => return None,
        };
        Some(today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN))
    }
}

/// The day with the highest visit count in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub visits: u32,
}

/// Windowed series plus every statistic the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficReport {
    pub series: Vec<DailyTraffic>,
    pub today_visits: u32,
    pub total_visits: u64,
    pub average_daily_visits: u32,
    pub percentage_change: i32,
    pub peak_day: Option<PeakDay>,
    pub active_days: usize,
    pub engagement_rate: u32,
}

/// Keep only the records inside the window.
pub fn filter_window(
    mut records: Vec<DailyTraffic>,
    window: TrafficWindow,
    today: NaiveDate,
) -> Vec<DailyTraffic> {
    if let Some(cutoff) = window.cutoff(today) {
        records.retain(|r| r.date >= cutoff);
    }
    records
}

/// Compute every derived statistic over an already-filtered series.
pub fn build_report(series: Vec<DailyTraffic>, today: NaiveDate) -> TrafficReport {
    let total_visits: u64 = series.iter().map(|r| u64::from(r.visits)).sum();
    let today_visits = series
        .iter()
        .find(|r| r.date == today)
        .map(|r| r.visits)
        .unwrap_or(0);

    let average_daily_visits = if series.is_empty() {
        0
    } else {
        (total_visits as f64 / series.len() as f64).round() as u32
    };

    let percentage_change = percentage_change(&series);

    let peak_day = series
        .iter()
        .map(|r| r.visits)
        .max()
        .and_then(|max| series.iter().find(|r| r.visits == max))
        .map(|r| PeakDay {
            date: r.date,
            visits: r.visits,
        });

    let active_days = series.iter().filter(|r| r.visits > 0).count();
    let engagement_rate = if series.is_empty() {
        0
    } else {
        (active_days as f64 / series.len() as f64 * 100.0).round() as u32
    };

    TrafficReport {
        series,
        today_visits,
        total_visits,
        average_daily_visits,
        percentage_change,
        peak_day,
        active_days,
        engagement_rate,
    }
}

/// Change between the last two points of the series, in whole percent.
///
/// 0 when fewer than two points exist, and clamped to 0 when the
/// second-to-last count is zero (the division would be meaningless).
fn percentage_change(series: &[DailyTraffic]) -> i32 {
    let [.., second_last, last] = series else {
        return 0;
    };
    if second_last.visits == 0 {
        return 0;
    }
    let delta = f64::from(last.visits) - f64::from(second_last.visits);
    (delta / f64::from(second_last.visits) * 100.0).round() as i32
}

/// Read the stored series and build the report for one window.
///
/// A failed read degrades to an empty report rather than an error: the
/// dashboard still renders, just with zero counts.
pub fn window_report(db: &Database, window: TrafficWindow, today: NaiveDate) -> TrafficReport {
    let records = match db.all_traffic() {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Failed to read traffic history: {e}");
            Vec::new()
        }
    };
    build_report(filter_window(records, window, today), today)
}
