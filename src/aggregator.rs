// ABOUTME: Daily metric aggregation across the provider's per-metric endpoints
// ABOUTME: Fans out range and per-date calls, merges keyed by ISO date
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily metric aggregator.
//!
//! Produces a best-effort picture even under partial upstream degradation: a
//! failure local to one date or one metric becomes a `null` value in the
//! merged output, never an error for the whole request. Per-date sleep and
//! HRV calls run in fixed-size concurrent batches to bound load on the
//! rate-limited upstream API; the final output is ordered by the
//! deterministic date list regardless of fetch completion order.

use crate::dates;
use crate::errors::AppResult;
use crate::models::{
    DailyMetricRecord, DaySummary, RangeSummary, SeriesData, SeriesEntry, SeriesSummary,
};
use crate::providers::fitbit::HrvSample;
use crate::providers::UpstreamClient;
use chrono::NaiveDate;
use futures_util::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-date upstream calls in flight at a time
pub const BATCH_SIZE: usize = 6;

/// Outcome of one per-date fetch: the error-to-null downgrade happens here,
/// in one visible place, not through blanket suppression.
struct DateValue<T> {
    date: String,
    value: T,
}

/// Fans out to the provider's endpoints and merges per-date results
#[derive(Clone)]
pub struct DailyMetricAggregator {
    upstream: UpstreamClient,
}

impl DailyMetricAggregator {
    /// Create an aggregator over the given upstream client
    #[must_use]
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Aggregated range summary: exactly one record per calendar date in the
    /// inclusive window ending at `end`, in date order.
    pub async fn range_summary(&self, access_token: &str, days: u32, end: NaiveDate) -> RangeSummary {
        let (start, end) = dates::range_from_end(days, end);
        let date_list = dates::enumerate_range(start, end);

        let (steps, calories, heart, sleep, hrv) = tokio::join!(
            self.upstream.activity_series(access_token, "steps", start, end),
            self.upstream
                .activity_series(access_token, "calories", start, end),
            self.upstream.heart_series(access_token, start, end),
            self.sweep_sleep(access_token, &date_list),
            self.sweep_hrv(access_token, &date_list),
        );

        let steps_map = series_map("steps", steps);
        let calories_map = series_map("calories", calories);
        let rhr_map = match heart {
            Ok(entries) => entries
                .into_iter()
                .map(|day| (day.date, day.resting_heart_rate))
                .collect(),
            Err(err) => {
                warn!(metric = "heart", error = %err, "range fetch failed; yielding nulls");
                HashMap::new()
            }
        };
        let sleep_map: HashMap<String, Option<f64>> =
            sleep.into_iter().map(|dv| (dv.date, dv.value)).collect();
        let hrv_map: HashMap<String, HrvSample> =
            hrv.into_iter().map(|dv| (dv.date, dv.value)).collect();

        let data = date_list
            .iter()
            .map(|&date| {
                let iso = dates::iso(date);
                let hrv = hrv_map.get(&iso).copied().unwrap_or_default();
                DailyMetricRecord {
                    steps: lookup_int(&steps_map, &iso),
                    calories_out: lookup_int(&calories_map, &iso),
                    resting_heart_rate: lookup_int(&rhr_map, &iso),
                    sleep_quality_score: sleep_map.get(&iso).copied().flatten(),
                    hrv_daily_rmssd: hrv.daily_rmssd,
                    hrv_deep_rmssd: hrv.deep_rmssd,
                    date: iso,
                }
            })
            .collect();

        RangeSummary {
            days,
            start: dates::iso(start),
            end: dates::iso(end),
            data,
        }
    }

    /// Single-day summary with heart-rate-zone detail. The day's sleep score
    /// is the best numeric score among the most recent sessions ending on
    /// the target date.
    pub async fn day_summary(&self, access_token: &str, date: NaiveDate) -> DaySummary {
        let iso = dates::iso(date);

        let (totals, heart, sessions, hrv) = tokio::join!(
            self.upstream.activity_summary(access_token, date),
            self.upstream.heart_day(access_token, date),
            self.upstream.sleep_sessions_before(access_token, date),
            self.upstream.hrv_by_date(access_token, date),
        );

        let totals = absorb("activity", totals).unwrap_or_default();
        let heart = absorb("heart", heart).flatten();
        let sleep_quality_score = absorb("sleep-sessions", sessions)
            .and_then(|list| crate::providers::fitbit::best_same_day_score(&list, &iso));
        let hrv = absorb("hrv", hrv).unwrap_or_default();

        DaySummary {
            date: iso,
            steps: totals.steps,
            calories_out: totals.calories_out,
            resting_heart_rate: heart
                .as_ref()
                .and_then(|h| h.resting_heart_rate)
                .map(|n| n as i64),
            heart_rate_zones: heart.and_then(|h| h.heart_rate_zones),
            sleep_quality_score,
            hrv_daily_rmssd: hrv.daily_rmssd,
            hrv_deep_rmssd: hrv.deep_rmssd,
        }
    }

    /// The three range-capable series as parallel arrays, one entry per
    /// date in the window ending at `today`.
    pub async fn series_summary(&self, access_token: &str, days: u32, end: NaiveDate) -> SeriesSummary {
        let (start, end) = dates::range_from_end(days, end);
        let date_list = dates::enumerate_range(start, end);

        let (steps, calories, heart) = tokio::join!(
            self.upstream.activity_series(access_token, "steps", start, end),
            self.upstream
                .activity_series(access_token, "calories", start, end),
            self.upstream.heart_series(access_token, start, end),
        );

        let steps_map = series_map("steps", steps);
        let calories_map = series_map("calories", calories);
        let rhr_map: HashMap<String, Option<f64>> = match heart {
            Ok(entries) => entries
                .into_iter()
                .map(|day| (day.date, day.resting_heart_rate))
                .collect(),
            Err(err) => {
                warn!(metric = "heart", error = %err, "range fetch failed; yielding nulls");
                HashMap::new()
            }
        };

        let entries = |map: &HashMap<String, Option<f64>>| -> Vec<SeriesEntry> {
            date_list
                .iter()
                .map(|&date| {
                    let iso = dates::iso(date);
                    SeriesEntry {
                        value: map.get(&iso).copied().flatten(),
                        date: iso,
                    }
                })
                .collect()
        };

        SeriesSummary {
            days,
            start: dates::iso(start),
            end: dates::iso(end),
            data: SeriesData {
                steps: entries(&steps_map),
                calories_out: entries(&calories_map),
                resting_heart_rate: entries(&rhr_map),
            },
        }
    }

    /// Per-date sleep sweep in batches of [`BATCH_SIZE`]. Batches are issued
    /// in date order and fully joined before the next begins; one bad date
    /// never aborts its batch.
    async fn sweep_sleep(&self, access_token: &str, date_list: &[NaiveDate]) -> Vec<DateValue<Option<f64>>> {
        let mut out = Vec::with_capacity(date_list.len());
        for batch in date_list.chunks(BATCH_SIZE) {
            let fetches = batch.iter().map(|&date| async move {
                let iso = dates::iso(date);
                let value = match self.upstream.sleep_by_date(access_token, date).await {
                    Ok(payload) => crate::providers::fitbit::extract_sleep_score(&payload),
                    Err(err) => {
                        debug!(date = %iso, error = %err, "sleep fetch failed for date");
                        None
                    }
                };
                DateValue { date: iso, value }
            });
            out.extend(join_all(fetches).await);
        }
        out
    }

    /// Per-date HRV sweep, same batching discipline as sleep
    async fn sweep_hrv(&self, access_token: &str, date_list: &[NaiveDate]) -> Vec<DateValue<HrvSample>> {
        let mut out = Vec::with_capacity(date_list.len());
        for batch in date_list.chunks(BATCH_SIZE) {
            let fetches = batch.iter().map(|&date| async move {
                let iso = dates::iso(date);
                let value = match self.upstream.hrv_by_date(access_token, date).await {
                    Ok(sample) => sample,
                    Err(err) => {
                        debug!(date = %iso, error = %err, "hrv fetch failed for date");
                        HrvSample::default()
                    }
                };
                DateValue { date: iso, value }
            });
            out.extend(join_all(fetches).await);
        }
        out
    }
}

fn series_map(
    metric: &str,
    result: AppResult<Vec<crate::providers::fitbit::SeriesPoint>>,
) -> HashMap<String, Option<f64>> {
    match result {
        Ok(points) => points.into_iter().map(|p| (p.date, p.value)).collect(),
        Err(err) => {
            warn!(metric, error = %err, "range fetch failed; yielding nulls");
            HashMap::new()
        }
    }
}

fn lookup_int(map: &HashMap<String, Option<f64>>, iso: &str) -> Option<i64> {
    map.get(iso).copied().flatten().map(|n| n as i64)
}

fn absorb<T>(what: &str, result: AppResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(call = what, error = %err, "upstream call failed; treating as missing");
            None
        }
    }
}
