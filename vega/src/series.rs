use crate::{Timed, error::SeriesError};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

/// Normalised OHLCV bar, stamped with the bar close time.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize, Constructor)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Construct a [`Bar`] from a close price only. Open, high and low equal the close and
    /// volume is zero.
    pub fn from_close(time: DateTime<Utc>, close: f64) -> Self {
        Self {
            time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|value| value.is_finite())
    }
}

/// Ordered, time-indexed sequence of [`Bar`]s. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Construct a [`PriceSeries`] without validation.
    ///
    /// Computations assume bars are in strictly increasing time order.
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Construct a [`PriceSeries`], rejecting empty input, out of order timestamps and
    /// non-finite values.
    pub fn try_new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        Self::new(bars).validated()
    }

    /// Construct a close-only [`PriceSeries`] from `(time, close)` pairs.
    pub fn from_closes<Iter>(closes: Iter) -> Self
    where
        Iter: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self::new(
            closes
                .into_iter()
                .map(|(time, close)| Bar::from_close(time, close))
                .collect(),
        )
    }

    /// Validate this series, returning it unchanged on success.
    pub fn validated(self) -> Result<Self, SeriesError> {
        self.validate().map(|_| self)
    }

    /// Check the series is non-empty, strictly time-ordered and contains only finite values.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, bar) in self.bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    time: bar.time,
                });
            }
            if index > 0 && bar.time <= self.bars[index - 1].time {
                return Err(SeriesError::Unordered {
                    index,
                    time: bar.time,
                });
            }
        }

        Ok(())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Trailing `count` bars, or every bar if fewer are available.
    pub fn tail(&self, count: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(count)..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }

    /// Percent-change [`ReturnSeries`] of close prices.
    pub fn returns(&self) -> ReturnSeries {
        ReturnSeries::from_prices(&self.bars)
    }

    /// Pairs of bars from `self` and `other` sharing the same timestamp, in time order.
    pub fn align<'a>(&'a self, other: &'a PriceSeries) -> Vec<(&'a Bar, &'a Bar)> {
        inner_join_by_time(&self.bars, &other.bars, |bar| bar.time)
    }

    /// Element-wise ratio of close prices over timestamps shared with `denominator`.
    ///
    /// Non-finite ratios (eg/ zero denominator) are dropped.
    pub fn ratio(&self, denominator: &PriceSeries) -> Vec<Timed<f64>> {
        self.align(denominator)
            .into_iter()
            .map(|(numerator, denominator)| {
                Timed::new(numerator.close / denominator.close, numerator.time)
            })
            .filter(|ratio| ratio.value.is_finite())
            .collect()
    }
}

/// Percent-change returns derived from a [`PriceSeries`].
///
/// Each return is stamped with the time of the later bar. Undefined returns (eg/ from a zero
/// price) are dropped rather than padded.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ReturnSeries {
    points: Vec<Timed<f64>>,
}

impl ReturnSeries {
    pub fn from_prices(bars: &[Bar]) -> Self {
        Self {
            points: bars
                .windows(2)
                .map(|pair| Timed::new(pair[1].close / pair[0].close - 1.0, pair[1].time))
                .filter(|point| point.value.is_finite())
                .collect(),
        }
    }

    pub fn points(&self) -> &[Timed<f64>] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(self, other)` return pairs sharing the same timestamp, in time order.
    pub fn align(&self, other: &ReturnSeries) -> Vec<Timed<(f64, f64)>> {
        inner_join_by_time(&self.points, &other.points, |point| point.time)
            .into_iter()
            .map(|(left, right)| Timed::new((left.value, right.value), left.time))
            .collect()
    }
}

/// Inner join two time-ordered slices on their timestamps.
fn inner_join_by_time<'a, T, FnTime>(
    left: &'a [T],
    right: &'a [T],
    time: FnTime,
) -> Vec<(&'a T, &'a T)>
where
    FnTime: Fn(&T) -> DateTime<Utc>,
{
    left.iter()
        .merge_join_by(right.iter(), |l, r| time(*l).cmp(&time(*r)))
        .filter_map(|joined| match joined {
            EitherOrBoth::Both(l, r) => Some((l, r)),
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => None,
        })
        .collect()
}
