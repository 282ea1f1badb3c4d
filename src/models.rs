// ABOUTME: UI-facing response models for daily metrics and sync status
// ABOUTME: Field names match the client application's camelCase expectations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response models produced by the aggregator and status reporter.
//!
//! Missing upstream data is always `null`, never an omitted date: a range
//! response carries exactly one record per calendar day in the window.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One calendar day of merged metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetricRecord {
    /// ISO-8601 calendar date
    pub date: String,
    /// Step count
    pub steps: Option<i64>,
    /// Calories burned
    pub calories_out: Option<i64>,
    /// Resting heart rate, bpm
    pub resting_heart_rate: Option<i64>,
    /// Sleep quality score or efficiency fallback
    pub sleep_quality_score: Option<f64>,
    /// Daily HRV RMSSD, ms
    pub hrv_daily_rmssd: Option<f64>,
    /// Deep-sleep HRV RMSSD, ms
    pub hrv_deep_rmssd: Option<f64>,
}

/// Multi-day range response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSummary {
    /// Number of days in the range (clamped)
    pub days: u32,
    /// First date, inclusive
    pub start: String,
    /// Last date, inclusive
    pub end: String,
    /// One record per date, in date order
    pub data: Vec<DailyMetricRecord>,
}

/// Single-day detail response with heart-rate-zone breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// ISO-8601 calendar date
    pub date: String,
    /// Step count
    pub steps: Option<i64>,
    /// Calories burned
    pub calories_out: Option<i64>,
    /// Resting heart rate, bpm
    pub resting_heart_rate: Option<i64>,
    /// Provider heart-rate-zone detail, passed through as-is
    pub heart_rate_zones: Option<Value>,
    /// Best sleep score among the day's sessions
    pub sleep_quality_score: Option<f64>,
    /// Daily HRV RMSSD, ms
    pub hrv_daily_rmssd: Option<f64>,
    /// Deep-sleep HRV RMSSD, ms
    pub hrv_deep_rmssd: Option<f64>,
}

/// One point of a single-metric series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesEntry {
    /// ISO-8601 calendar date
    pub date: String,
    /// Metric value for the date
    pub value: Option<f64>,
}

/// The three range-capable series, in parallel arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    /// Daily step counts
    pub steps: Vec<SeriesEntry>,
    /// Daily calories burned
    pub calories_out: Vec<SeriesEntry>,
    /// Daily resting heart rate
    pub resting_heart_rate: Vec<SeriesEntry>,
}

/// Response of the series endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of days in the range (clamped)
    pub days: u32,
    /// First date, inclusive
    pub start: String,
    /// Last date, inclusive
    pub end: String,
    /// The three series
    pub data: SeriesData,
}

/// Account connection status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Whether a usable token exists
    pub connected: bool,
    /// Most recent device sync timestamp, ISO-8601
    pub last_sync_time: Option<String>,
    /// Diagnostic detail when something upstream failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
