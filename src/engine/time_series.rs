//! Sliding-window activity trends
//!
//! Points older than the window are dropped as new points arrive. Daily
//! views always cover the last seven days: bucket 6 is today and bucket 0
//! is six days ago.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::Task;

/// Number of daily buckets reported
pub const DAYS: usize = 7;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DataPoint {
    timestamp: DateTime<Utc>,
    value: f64,
}

/// Direction of day-over-day change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeSeriesAnalyzer {
    window: Duration,
    points: Vec<DataPoint>,
}

impl TimeSeriesAnalyzer {
    /// Creates an analyzer retaining points younger than `window`
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            points: Vec::new(),
        }
    }

    /// Creates an analyzer with a window of whole days
    pub fn with_window_days(days: u32) -> Self {
        Self::new(Duration::days(i64::from(days)))
    }

    /// Seeds an analyzer with one point per completed task
    ///
    /// Completed tasks without a completion time count as completed `now`.
    pub fn from_completed_tasks<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let mut analyzer = Self::new(window);
        for task in tasks.into_iter().filter(|t| t.status.is_complete()) {
            analyzer.add_data_point_at(task.completed_at.unwrap_or(now), 1.0, now);
        }
        analyzer
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of retained points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Records a point, then drops everything older than the window
    pub fn add_data_point(&mut self, timestamp: DateTime<Utc>, value: f64) {
        self.add_data_point_at(timestamp, value, Utc::now());
    }

    /// Same as [`add_data_point`](Self::add_data_point) with an explicit clock
    ///
    /// A window reaching past the earliest representable time keeps every
    /// point.
    pub fn add_data_point_at(&mut self, timestamp: DateTime<Utc>, value: f64, now: DateTime<Utc>) {
        self.points.push(DataPoint { timestamp, value });
        if let Some(cutoff) = now.checked_sub_signed(self.window) {
            self.points.retain(|point| point.timestamp >= cutoff);
        }
    }

    /// Sums retained values per day
    pub fn daily_data(&self) -> [f64; DAYS] {
        self.daily_data_at(Utc::now())
    }

    pub fn daily_data_at(&self, now: DateTime<Utc>) -> [f64; DAYS] {
        let mut daily = [0.0; DAYS];

        for point in &self.points {
            let elapsed = (now - point.timestamp).num_seconds();
            if elapsed < 0 {
                continue;
            }
            let days_ago = (elapsed / SECONDS_PER_DAY) as usize;
            if days_ago < DAYS {
                daily[DAYS - 1 - days_ago] += point.value;
            }
        }

        daily
    }

    /// Mean of the daily buckets
    pub fn moving_average(&self) -> f64 {
        self.moving_average_at(Utc::now())
    }

    pub fn moving_average_at(&self, now: DateTime<Utc>) -> f64 {
        self.daily_data_at(now).iter().sum::<f64>() / DAYS as f64
    }

    /// Largest daily bucket, never below 1 (used to scale charts)
    pub fn max_value(&self) -> f64 {
        self.max_value_at(Utc::now())
    }

    pub fn max_value_at(&self, now: DateTime<Utc>) -> f64 {
        self.daily_data_at(now).iter().copied().fold(1.0, f64::max)
    }

    /// Compares day-over-day increases against decreases
    pub fn find_trend(&self) -> Trend {
        self.find_trend_at(Utc::now())
    }

    pub fn find_trend_at(&self, now: DateTime<Utc>) -> Trend {
        let daily = self.daily_data_at(now);
        let (mut increases, mut decreases) = (0, 0);

        for pair in daily.windows(2) {
            if pair[1] > pair[0] {
                increases += 1;
            } else if pair[1] < pair[0] {
                decreases += 1;
            }
        }

        match increases.cmp(&decreases) {
            std::cmp::Ordering::Greater => Trend::Increasing,
            std::cmp::Ordering::Less => Trend::Decreasing,
            std::cmp::Ordering::Equal => Trend::Stable,
        }
    }
}

/// Percentage of tasks that are completed (0 for an empty set)
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.status.is_complete()).count();
    completed as f64 / tasks.len() as f64 * 100.0
}
