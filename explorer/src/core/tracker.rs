use tracing::debug;

use crate::data::poi::Coordinate;
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::LocationProvider;

/// Append-only record of where the agent has been, oldest first. The origin
/// is always the first entry so the path is never empty.
#[derive(Debug, Clone)]
pub struct PathTracker {
    path: Vec<Coordinate>,
}

impl PathTracker {
    pub fn new(origin: Coordinate) -> Self {
        Self { path: vec![origin] }
    }

    /// Non-finite fixes are dropped; returns whether the point was recorded.
    pub fn append(&mut self, coordinate: Coordinate) -> bool {
        if !coordinate.is_finite() {
            debug!("Ignoring non-finite fix {:?}", coordinate);
            return false;
        }
        self.path.push(coordinate);
        true
    }

    /// Polls the provider once and records the fix, if any.
    pub fn tick(&mut self, provider: &mut dyn LocationProvider) -> Option<Coordinate> {
        let _timing = logging::start_timing("tracker_tick", OperationCategory::Tracking);

        let coordinate = provider.next_position()?;
        if self.append(coordinate) {
            Some(coordinate)
        } else {
            None
        }
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn origin(&self) -> Coordinate {
        self.path[0]
    }

    pub fn latest(&self) -> Coordinate {
        self.path[self.path.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::provider::ScriptedProvider;

    #[test]
    fn test_seeded_with_origin() {
        let origin = Coordinate::new(15.335, 76.46);
        let tracker = PathTracker::new(origin);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.origin(), origin);
        assert_eq!(tracker.latest(), origin);
    }

    #[test]
    fn test_tick_appends_in_order() {
        let mut tracker = PathTracker::new(Coordinate::new(0.0, 0.0));
        let mut provider = ScriptedProvider::new(vec![
            Coordinate::new(0.1, 0.1),
            Coordinate::new(f64::NAN, 0.2),
            Coordinate::new(0.3, 0.3),
        ]);

        assert_eq!(tracker.tick(&mut provider), Some(Coordinate::new(0.1, 0.1)));
        assert_eq!(tracker.tick(&mut provider), None);
        assert_eq!(tracker.tick(&mut provider), Some(Coordinate::new(0.3, 0.3)));
        assert_eq!(tracker.tick(&mut provider), None);

        assert_eq!(tracker.path(), &[
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.1, 0.1),
            Coordinate::new(0.3, 0.3),
        ]);
    }
}
