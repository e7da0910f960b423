use crate::{
    defensive::DefensiveIndexRecord, flip::FlipEvent, momentum::GradeTransition,
};
use parking_lot::Mutex;
use std::convert::Infallible;

/// Receives the [`FlipEvent`]s of a flip detection run.
pub trait AlertSink {
    type Error: std::error::Error;

    fn publish(&self, events: &[FlipEvent]) -> Result<(), Self::Error>;
}

/// Receives the [`GradeTransition`]s between two momentum snapshots.
pub trait TransitionSink {
    type Error: std::error::Error;

    fn publish(&self, transitions: &[GradeTransition]) -> Result<(), Self::Error>;
}

/// Receives every [`DefensiveIndexRecord`] computed.
pub trait HistorySink {
    type Error: std::error::Error;

    fn append(&self, record: &DefensiveIndexRecord) -> Result<(), Self::Error>;
}

/// [`AlertSink`] that discards events.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct NoAlertSink;

impl AlertSink for NoAlertSink {
    type Error = Infallible;

    fn publish(&self, _: &[FlipEvent]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// [`TransitionSink`] that discards transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct NoTransitionSink;

impl TransitionSink for NoTransitionSink {
    type Error = Infallible;

    fn publish(&self, _: &[GradeTransition]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// [`HistorySink`] that discards records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct NoHistorySink;

impl HistorySink for NoHistorySink {
    type Error = Infallible;

    fn append(&self, _: &DefensiveIndexRecord) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Simple sink that stores everything it receives in a vector.
#[derive(Debug)]
pub struct VecSink<T> {
    pub items: Mutex<Vec<T>>,
}

impl<T> Default for VecSink<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T> VecSink<T>
where
    T: Clone,
{
    /// Copy of everything received so far.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

pub type VecAlertSink = VecSink<FlipEvent>;
pub type VecTransitionSink = VecSink<GradeTransition>;
pub type VecHistorySink = VecSink<DefensiveIndexRecord>;

impl AlertSink for VecSink<FlipEvent> {
    type Error = Infallible;

    fn publish(&self, events: &[FlipEvent]) -> Result<(), Self::Error> {
        self.items.lock().extend_from_slice(events);
        Ok(())
    }
}

impl TransitionSink for VecSink<GradeTransition> {
    type Error = Infallible;

    fn publish(&self, transitions: &[GradeTransition]) -> Result<(), Self::Error> {
        self.items.lock().extend_from_slice(transitions);
        Ok(())
    }
}

impl HistorySink for VecSink<DefensiveIndexRecord> {
    type Error = Infallible;

    fn append(&self, record: &DefensiveIndexRecord) -> Result<(), Self::Error> {
        self.items.lock().push(*record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flip::{FlipDetail, FlipDirection},
        test_utils::time_base,
    };
    use smol_str::SmolStr;

    fn event(sector: &str) -> FlipEvent {
        FlipEvent {
            time: time_base(),
            sector: SmolStr::new(sector),
            direction: FlipDirection::Up,
            magnitude: 0.01,
            detail: FlipDetail::RelFlip {
                window_minutes: 15,
                threshold: 0.006,
            },
        }
    }

    #[test]
    fn test_vec_alert_sink_accumulates_across_runs() {
        let sink = VecAlertSink::default();

        sink.publish(&[event("XLK")]).unwrap();
        sink.publish(&[]).unwrap();
        sink.publish(&[event("XLE"), event("XLF")]).unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.snapshot()
                .iter()
                .map(|event| event.sector.as_str())
                .collect::<Vec<_>>(),
            vec!["XLK", "XLE", "XLF"]
        );
    }

    #[test]
    fn test_no_sinks_accept_everything() {
        assert!(NoAlertSink.publish(&[event("XLK")]).is_ok());
        assert!(NoTransitionSink.publish(&[]).is_ok());
    }
}
