// ABOUTME: Fitbit Web API client with typed payload unwrapping
// ABOUTME: Normalizes non-2xx responses into errors carrying status and body
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fitbit Web API integration.
//!
//! The steps, calories and heart endpoints are range-capable (one call for a
//! whole window); sleep and HRV are per-day only. Different devices and
//! accounts populate different subsets of the sleep payload, so the sleep
//! score is probed through [`SLEEP_SCORE_EXTRACTORS`], an explicit ordered
//! fallback chain.
//!
//! # API Documentation
//! - [Fitbit Web API](https://dev.fitbit.com/build/reference/web-api/)

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Issues authenticated GETs against the provider's REST API
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    api_base: String,
}

/// Daily HRV measurement, both fields optional upstream
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HrvSample {
    /// RMSSD over the full day, ms
    pub daily_rmssd: Option<f64>,
    /// RMSSD during deep sleep, ms
    pub deep_rmssd: Option<f64>,
}

/// One day of a range-capable activity series
#[derive(Debug, Clone)]
pub struct SeriesPoint {
    /// ISO-8601 calendar date
    pub date: String,
    /// Metric value, absent when the payload is non-numeric
    pub value: Option<f64>,
}

/// One day of the heart series: resting HR plus zone detail
#[derive(Debug, Clone)]
pub struct HeartDay {
    /// ISO-8601 calendar date
    pub date: String,
    /// Resting heart rate, bpm
    pub resting_heart_rate: Option<f64>,
    /// Provider heart-rate-zone payload, passed through
    pub heart_rate_zones: Option<Value>,
}

/// Steps and calories totals for one day
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityTotals {
    /// Step count
    pub steps: Option<i64>,
    /// Calories burned
    pub calories_out: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    #[serde(rename = "lastSyncTime")]
    last_sync_time: Option<String>,
}

/// Coerce a JSON value to a number the way the client UI does: numbers pass
/// through, numeric strings parse, everything else is `None`. The activity
/// series endpoints return values as strings.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_at<'a>(root: &'a Value, path: &[&str]) -> Option<f64> {
    let mut cursor = root;
    for segment in path {
        cursor = match segment.parse::<usize>() {
            Ok(index) => cursor.get(index)?,
            Err(_) => cursor.get(segment)?,
        };
    }
    as_number(cursor)
}

fn score_from_levels_summary(payload: &Value) -> Option<f64> {
    number_at(payload, &["sleep", "0", "levels", "summary", "score"])
}

fn score_from_session(payload: &Value) -> Option<f64> {
    number_at(payload, &["sleep", "0", "score", "sleepScore"])
}

fn score_from_summary(payload: &Value) -> Option<f64> {
    number_at(payload, &["summary", "sleepScore"])
}

fn efficiency_from_session(payload: &Value) -> Option<f64> {
    number_at(payload, &["sleep", "0", "efficiency"])
}

fn efficiency_from_summary(payload: &Value) -> Option<f64> {
    number_at(payload, &["summary", "efficiency"])
}

/// Ordered sleep-quality fallback chain: score fields first, efficiency as a
/// last resort. The first extractor yielding a number wins.
pub const SLEEP_SCORE_EXTRACTORS: &[fn(&Value) -> Option<f64>] = &[
    score_from_levels_summary,
    score_from_session,
    score_from_summary,
    efficiency_from_session,
    efficiency_from_summary,
];

/// Apply the sleep-quality fallback chain to a per-day sleep payload
#[must_use]
pub fn extract_sleep_score(payload: &Value) -> Option<f64> {
    SLEEP_SCORE_EXTRACTORS.iter().find_map(|probe| probe(payload))
}

/// Best numeric session score among sleep-list sessions ending on `date`.
/// A user can log more than one sleep session per calendar day.
#[must_use]
pub fn best_same_day_score(sessions: &Value, date: &str) -> Option<f64> {
    let list = sessions.get("sleep")?.as_array()?;
    list.iter()
        .filter(|session| {
            session.get("dateOfSleep").and_then(Value::as_str) == Some(date)
        })
        .filter_map(|session| {
            let score = session.get("score")?;
            score
                .get("overall")
                .and_then(as_number)
                .or_else(|| score.get("score").and_then(as_number))
        })
        .fold(None, |best: Option<f64>, score| {
            Some(best.map_or(score, |b| b.max(score)))
        })
}

impl UpstreamClient {
    /// Create a client against the given API base (no trailing slash)
    #[must_use]
    pub fn new(client: Client, api_base: String) -> Self {
        let api_base = api_base.trim_end_matches('/').to_owned();
        Self { client, api_base }
    }

    /// Fetch a path as JSON with bearer authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UpstreamApi`] carrying the upstream status and
    /// body on non-2xx, [`AppError::UpstreamUnavailable`] on transport
    /// failure.
    pub async fn get_json(&self, access_token: &str, path: &str) -> AppResult<Value> {
        let response = self
            .client
            .get(format!("{}{path}", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::UpstreamApi {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(AppError::from)
    }

    /// Range-capable activity series: `resource` is `steps` or `calories`.
    /// The response nests the points under `activities-{resource}` with
    /// string-typed values.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn activity_series(
        &self,
        access_token: &str,
        resource: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<SeriesPoint>> {
        let path = format!("/1/user/-/activities/{resource}/date/{start}/{end}.json");
        let payload = self.get_json(access_token, &path).await?;
        let key = format!("activities-{resource}");

        let points = payload
            .get(&key)
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let date = entry.get("dateTime").and_then(Value::as_str)?;
                        Some(SeriesPoint {
                            date: date.to_owned(),
                            value: entry.get("value").and_then(as_number),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(points)
    }

    /// Range-capable heart series. Each day's value is nested as
    /// `{ value: { restingHeartRate, heartRateZones } }`, not a flat number.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn heart_series(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<HeartDay>> {
        let path = format!("/1/user/-/activities/heart/date/{start}/{end}.json");
        let payload = self.get_json(access_token, &path).await?;
        Ok(Self::parse_heart_days(&payload))
    }

    /// Single-day heart detail (resting HR and zones for one date).
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn heart_day(
        &self,
        access_token: &str,
        date: NaiveDate,
    ) -> AppResult<Option<HeartDay>> {
        let path = format!("/1/user/-/activities/heart/date/{date}/1d.json");
        let payload = self.get_json(access_token, &path).await?;
        Ok(Self::parse_heart_days(&payload).into_iter().next())
    }

    fn parse_heart_days(payload: &Value) -> Vec<HeartDay> {
        payload
            .get("activities-heart")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let date = entry.get("dateTime").and_then(Value::as_str)?;
                        let value = entry.get("value");
                        Some(HeartDay {
                            date: date.to_owned(),
                            resting_heart_rate: value
                                .and_then(|v| v.get("restingHeartRate"))
                                .and_then(as_number),
                            heart_rate_zones: value
                                .and_then(|v| v.get("heartRateZones"))
                                .cloned(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Day activity summary: steps and calories totals.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn activity_summary(
        &self,
        access_token: &str,
        date: NaiveDate,
    ) -> AppResult<ActivityTotals> {
        let path = format!("/1/user/-/activities/date/{date}.json");
        let payload = self.get_json(access_token, &path).await?;
        let summary = payload.get("summary");
        Ok(ActivityTotals {
            steps: summary
                .and_then(|s| s.get("steps"))
                .and_then(as_number)
                .map(|n| n as i64),
            calories_out: summary
                .and_then(|s| s.get("caloriesOut"))
                .and_then(as_number)
                .map(|n| n as i64),
        })
    }

    /// Per-day sleep payload, raw; run it through [`extract_sleep_score`].
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn sleep_by_date(&self, access_token: &str, date: NaiveDate) -> AppResult<Value> {
        let path = format!("/1.2/user/-/sleep/date/{date}.json");
        self.get_json(access_token, &path).await
    }

    /// Most recent sleep sessions ending on or before `date`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn sleep_sessions_before(
        &self,
        access_token: &str,
        date: NaiveDate,
    ) -> AppResult<Value> {
        let path =
            format!("/1.2/user/-/sleep/list.json?beforeDate={date}&sort=desc&offset=0&limit=10");
        self.get_json(access_token, &path).await
    }

    /// Per-day HRV summary. The payload nests the sample under
    /// `hrv[0].value`; an empty `hrv` array yields a default sample.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures; HRV is frequently absent
    /// upstream, so callers treat errors as "no data".
    pub async fn hrv_by_date(&self, access_token: &str, date: NaiveDate) -> AppResult<HrvSample> {
        let path = format!("/1/user/-/hrv/date/{date}.json");
        let payload = self.get_json(access_token, &path).await?;
        let value = payload.get("hrv").and_then(|h| h.get(0)).and_then(|first| first.get("value"));
        Ok(HrvSample {
            daily_rmssd: value.and_then(|v| v.get("dailyRmssd")).and_then(as_number),
            deep_rmssd: value.and_then(|v| v.get("deepRmssd")).and_then(as_number),
        })
    }

    /// Device list; `lastSyncTime` strings are ISO-8601 and sort
    /// lexicographically.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] failures.
    pub async fn last_sync_time(&self, access_token: &str) -> AppResult<Option<String>> {
        let payload = self.get_json(access_token, "/1/user/-/devices.json").await?;
        let devices: Vec<DeviceEntry> = serde_json::from_value(payload)?;
        Ok(devices
            .into_iter()
            .filter_map(|d| d.last_sync_time)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_beats_efficiency() {
        let payload = json!({
            "sleep": [{"levels": {"summary": {"score": 81}}, "efficiency": 93}],
            "summary": {"efficiency": 90}
        });
        assert_eq!(extract_sleep_score(&payload), Some(81.0));
    }

    #[test]
    fn test_efficiency_used_when_no_score_fields() {
        let payload = json!({
            "sleep": [{"efficiency": 93}],
            "summary": {"totalMinutesAsleep": 412}
        });
        assert_eq!(extract_sleep_score(&payload), Some(93.0));
    }

    #[test]
    fn test_non_numeric_fields_are_skipped() {
        let payload = json!({
            "sleep": [{"levels": {"summary": {"score": "n/a"}}, "efficiency": 88}]
        });
        assert_eq!(extract_sleep_score(&payload), Some(88.0));
    }

    #[test]
    fn test_no_usable_fields_yields_none() {
        let payload = json!({"sleep": [], "summary": {}});
        assert_eq!(extract_sleep_score(&payload), None);
    }

    #[test]
    fn test_best_same_day_score_takes_maximum() {
        let sessions = json!({
            "sleep": [
                {"dateOfSleep": "2024-03-10", "score": {"overall": 72}},
                {"dateOfSleep": "2024-03-10", "score": {"overall": 85}},
                {"dateOfSleep": "2024-03-09", "score": {"overall": 99}}
            ]
        });
        assert_eq!(best_same_day_score(&sessions, "2024-03-10"), Some(85.0));
    }

    #[test]
    fn test_best_same_day_score_falls_back_to_score_field() {
        let sessions = json!({
            "sleep": [{"dateOfSleep": "2024-03-10", "score": {"score": 70}}]
        });
        assert_eq!(best_same_day_score(&sessions, "2024-03-10"), Some(70.0));
    }

    #[test]
    fn test_as_number_accepts_numeric_strings() {
        assert_eq!(as_number(&json!("12345")), Some(12345.0));
        assert_eq!(as_number(&json!(61)), Some(61.0));
        assert_eq!(as_number(&json!("n/a")), None);
        assert_eq!(as_number(&json!(null)), None);
    }
}
