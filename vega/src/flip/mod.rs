use crate::{FnvIndexMap, series::PriceSeries, sink::AlertSink};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// Rule 2: EMA momentum zero cross confirmed by volume.
pub mod ema_cross;

/// Rule 1: relative-return sign flip against an index.
pub mod rel;

/// Rule that produced a [`FlipEvent`].
///
/// Declaration order is the evaluation order for events sharing a timestamp.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Display,
)]
pub enum FlipRule {
    #[serde(rename = "rel_flip")]
    #[display("rel_flip")]
    RelFlip,
    #[serde(rename = "ema_cross_vol")]
    #[display("ema_cross_vol")]
    EmaCrossVol,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum FlipDirection {
    #[serde(rename = "up")]
    #[display("up")]
    Up,
    #[serde(rename = "down")]
    #[display("down")]
    Down,
}

/// Rule parameters in effect when a [`FlipEvent`] fired.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub enum FlipDetail {
    RelFlip {
        window_minutes: usize,
        threshold: f64,
    },
    EmaCrossVol {
        fast: usize,
        slow: usize,
        volume_multiplier: f64,
        /// Volume over its rolling average. `NaN` when the average is zero.
        #[serde(with = "crate::serde_util::nan_as_null")]
        volume_ratio: f64,
    },
}

/// Intraday sector flip alert. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlipEvent {
    pub time: DateTime<Utc>,
    pub sector: SmolStr,
    pub direction: FlipDirection,
    /// Relative return for [`FlipRule::RelFlip`], EMA momentum for [`FlipRule::EmaCrossVol`].
    pub magnitude: f64,
    pub detail: FlipDetail,
}

impl FlipEvent {
    pub fn rule(&self) -> FlipRule {
        match self.detail {
            FlipDetail::RelFlip { .. } => FlipRule::RelFlip,
            FlipDetail::EmaCrossVol { .. } => FlipRule::EmaCrossVol,
        }
    }
}

/// [`FlipDetector`] parameters.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlipParams {
    /// Bar shift used for the window return of Rule 1.
    pub window_minutes: usize,
    pub threshold: f64,
    pub volume_multiplier: f64,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub volume_window: usize,
}

impl Default for FlipParams {
    fn default() -> Self {
        Self {
            window_minutes: 15,
            threshold: 0.006,
            volume_multiplier: 1.2,
            ema_fast: 10,
            ema_slow: 30,
            volume_window: 20,
        }
    }
}

/// Evaluates both flip rules over many sectors.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FlipDetector {
    pub params: FlipParams,
}

impl FlipDetector {
    pub fn new(params: FlipParams) -> Self {
        Self { params }
    }

    /// Evaluate every sector of `sectors`.
    ///
    /// Rule 1 needs an `index`; without one only Rule 2 is evaluated. Events are ordered by
    /// time, then rule, then sector insertion order.
    pub fn evaluate(
        &self,
        sectors: &FnvIndexMap<SmolStr, PriceSeries>,
        index: Option<&PriceSeries>,
    ) -> Vec<FlipEvent> {
        let mut events = sectors
            .iter()
            .flat_map(|(sector, series)| {
                let relative = index
                    .map(|index| rel::rel_flip_events(sector, series, index, &self.params))
                    .unwrap_or_default();
                let momentum = ema_cross::ema_cross_events(sector, series, &self.params);

                debug!(
                    %sector,
                    rel_flip = relative.len(),
                    ema_cross_vol = momentum.len(),
                    "evaluated sector flips"
                );

                relative.into_iter().chain(momentum)
            })
            .collect::<Vec<_>>();

        events.sort_by_key(|event| (event.time, event.rule()));
        events
    }

    /// [`Self::evaluate`], then publish the events to `sink`.
    pub fn evaluate_and_publish<Sink>(
        &self,
        sectors: &FnvIndexMap<SmolStr, PriceSeries>,
        index: Option<&PriceSeries>,
        sink: &Sink,
    ) -> Result<Vec<FlipEvent>, Sink::Error>
    where
        Sink: AlertSink,
    {
        let events = self.evaluate(sectors, index);
        sink.publish(&events)?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sink::VecAlertSink, test_utils::minute_bars};

    fn sector_flipping_up() -> PriceSeries {
        let closes = [100.0; 15]
            .into_iter()
            .chain([99.7; 5])
            .chain([100.8; 5])
            .collect::<Vec<_>>();
        minute_bars(&closes, &vec![0.0; closes.len()])
    }

    #[test]
    fn test_evaluate_orders_by_time_then_rule_then_sector() {
        let index = minute_bars(&[100.0; 25], &[0.0; 25]);
        let sectors = FnvIndexMap::from_iter([
            (SmolStr::new("XLK"), sector_flipping_up()),
            (SmolStr::new("XLF"), minute_bars(&[100.0; 25], &[0.0; 25])),
            (SmolStr::new("XLE"), sector_flipping_up()),
        ]);

        let events = FlipDetector::default().evaluate(&sectors, Some(&index));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sector, "XLK");
        assert_eq!(events[1].sector, "XLE");
        assert!(events.iter().all(|event| event.rule() == FlipRule::RelFlip));
        assert_eq!(events[0].time, sectors["XLK"].bars()[20].time);
    }

    /// Flat at 100 then steps down to 99 on bar 40 with a volume spike, so both rules fire
    /// "down" on bar 40.
    fn sector_firing_both_rules() -> PriceSeries {
        let closes = [100.0; 40].into_iter().chain([99.0; 20]).collect::<Vec<_>>();
        let volumes = (0..closes.len())
            .map(|bar| if bar == 40 { 5.0 } else { 1.0 })
            .collect::<Vec<_>>();
        minute_bars(&closes, &volumes)
    }

    #[test]
    fn test_evaluate_orders_rel_flip_before_ema_cross_on_same_bar() {
        let index = minute_bars(&[100.0; 60], &[0.0; 60]);
        let sectors = FnvIndexMap::from_iter([
            (SmolStr::new("XLK"), sector_firing_both_rules()),
            (SmolStr::new("XLE"), sector_firing_both_rules()),
        ]);
        let time = sectors["XLK"].bars()[40].time;

        let actual = FlipDetector::default()
            .evaluate(&sectors, Some(&index))
            .into_iter()
            .map(|event| (event.time, event.rule(), event.sector, event.direction))
            .collect::<Vec<_>>();

        let expected = vec![
            (time, FlipRule::RelFlip, SmolStr::new("XLK"), FlipDirection::Down),
            (time, FlipRule::RelFlip, SmolStr::new("XLE"), FlipDirection::Down),
            (time, FlipRule::EmaCrossVol, SmolStr::new("XLK"), FlipDirection::Down),
            (time, FlipRule::EmaCrossVol, SmolStr::new("XLE"), FlipDirection::Down),
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let index = minute_bars(&[100.0; 25], &[0.0; 25]);
        let sectors = FnvIndexMap::from_iter([(SmolStr::new("XLK"), sector_flipping_up())]);
        let detector = FlipDetector::default();

        assert_eq!(
            detector.evaluate(&sectors, Some(&index)),
            detector.evaluate(&sectors, Some(&index))
        );
    }

    #[test]
    fn test_evaluate_and_publish() {
        let index = minute_bars(&[100.0; 25], &[0.0; 25]);
        let sectors = FnvIndexMap::from_iter([(SmolStr::new("XLK"), sector_flipping_up())]);
        let sink = VecAlertSink::default();

        let events = FlipDetector::default()
            .evaluate_and_publish(&sectors, Some(&index), &sink)
            .unwrap();

        assert_eq!(sink.snapshot(), events);
    }

    #[test]
    fn test_flip_event_serde() {
        let event = FlipEvent {
            time: crate::test_utils::time_base(),
            sector: SmolStr::new("XLK"),
            direction: FlipDirection::Down,
            magnitude: -0.5,
            detail: FlipDetail::EmaCrossVol {
                fast: 10,
                slow: 30,
                volume_multiplier: 1.2,
                volume_ratio: f64::NAN,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["direction"], "down");
        assert!(json["detail"]["EmaCrossVol"]["volume_ratio"].is_null());
        assert_eq!(event.rule().to_string(), "ema_cross_vol");
    }
}
