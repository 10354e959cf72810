//! Chart window selection layered on top of the sampler.
//!
//! A [`ChartPeriod`] (the week/month/90-day/all tabs) decides the sampling
//! window and spacing; the result is split at "now" into the solid
//! historical segment and the dashed projected segment.

use crate::sampler::sample;
use crate::{DecayParameters, DosingEvent, Error, EstimatedLevelPoint, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// History range shown on the chart
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartPeriod {
    #[default]
    Week,
    Month,
    NinetyDays,
    All,
}

impl ChartPeriod {
    /// How far back from "now" the chart reaches (`None` means from the first dose)
    fn lookback(self) -> Option<Duration> {
        match self {
            ChartPeriod::Week => Some(Duration::days(7)),
            ChartPeriod::Month => Some(Duration::days(30)),
            ChartPeriod::NinetyDays => Some(Duration::days(90)),
            ChartPeriod::All => None,
        }
    }

    fn base_interval(self) -> Duration {
        match self {
            ChartPeriod::Week => Duration::hours(6),
            ChartPeriod::Month | ChartPeriod::NinetyDays | ChartPeriod::All => Duration::hours(24),
        }
    }

    /// Compute the sampling window for this period.
    ///
    /// The interval starts at the period's base spacing and is widened to
    /// whole hours until the grid fits in `max_points`. Returns `None` for
    /// [`ChartPeriod::All`] with no events, since there is nothing to anchor it.
    pub fn window(
        self,
        events: &[DosingEvent],
        now: DateTime<Utc>,
        projection: Duration,
        max_points: usize,
    ) -> Result<Option<ChartWindow>> {
        if max_points == 0 {
            return Err(Error::InvalidInput("max_points must be at least 1".into()));
        }
        if projection < Duration::zero() {
            return Err(Error::InvalidInput(format!(
                "projection must not be negative, got {}",
                projection
            )));
        }

        let start = match self.lookback() {
            Some(lookback) => now.checked_sub_signed(lookback).ok_or_else(|| {
                Error::InvalidInput(format!("chart start is out of range: {} - {}", now, lookback))
            })?,
            None => match events.iter().map(DosingEvent::administered_at).min() {
                Some(first) => first.min(now),
                None => return Ok(None),
            },
        };
        let end = now.checked_add_signed(projection).ok_or_else(|| {
            Error::InvalidInput(format!("chart end is out of range: {} + {}", now, projection))
        })?;

        let span_ms = (end - start).num_milliseconds();
        let min_ms = span_ms / max_points as i64 + 1;
        let min_hours = (min_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR;
        let interval = self.base_interval().max(Duration::hours(min_hours));

        Ok(Some(ChartWindow {
            start,
            end,
            interval,
        }))
    }
}

impl FromStr for ChartPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" | "7d" => Ok(ChartPeriod::Week),
            "month" | "30d" => Ok(ChartPeriod::Month),
            "90d" | "ninety-days" | "ninety_days" => Ok(ChartPeriod::NinetyDays),
            "all" => Ok(ChartPeriod::All),
            other => Err(Error::InvalidInput(format!("unknown chart period: {}", other))),
        }
    }
}

/// Sampling parameters handed to the sampler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: Duration,
}

/// A sampled curve split at "now"
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    /// Points at or before now (drawn solid)
    pub historical: Vec<EstimatedLevelPoint>,
    /// Points after now, assuming no further doses (drawn dashed)
    pub projected: Vec<EstimatedLevelPoint>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.historical.len() + self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.historical.is_empty() && self.projected.is_empty()
    }

    /// All points in ascending order
    pub fn points(&self) -> impl Iterator<Item = &EstimatedLevelPoint> {
        self.historical.iter().chain(self.projected.iter())
    }
}

/// Sample the chart for `period` and split it at `now`.
pub fn render_series(
    events: &[DosingEvent],
    period: ChartPeriod,
    now: DateTime<Utc>,
    projection: Duration,
    max_points: usize,
    params: &DecayParameters,
) -> Result<ChartSeries> {
    let Some(window) = period.window(events, now, projection, max_points)? else {
        tracing::debug!("No events to anchor {:?} chart", period);
        return Ok(ChartSeries::default());
    };

    let points = sample(events, window.start, window.end, window.interval, params)?;
    let (historical, projected): (Vec<_>, Vec<_>) =
        points.into_iter().partition(|p| p.at <= now);

    Ok(ChartSeries {
        historical,
        projected,
    })
}
