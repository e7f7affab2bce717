//! Geofence test and the discovered-quest bookkeeping it feeds.
//!
//! The geofence is an axis-aligned box in degrees, not a geodesic radius. At
//! the default 0.005° it spans roughly 500 m of latitude; its east-west extent
//! shrinks with the cosine of latitude and the box corners reach further than
//! its edges. Those characteristics are kept as-is.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::config::constants::GEOFENCE_THRESHOLD_DEG;
use crate::data::poi::{Coordinate, POI};
use crate::data::quest::{Quest, QuestId};
use crate::utils::logging::{self, OperationCategory};

/// Quest ids that have matched the geofence. Grows only; iteration follows
/// discovery order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSet {
    ids: HashSet<QuestId>,
    order: Vec<QuestId>,
}

impl DiscoveredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &QuestId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestId> {
        self.order.iter()
    }

    // Only the geofence promotes quests
    fn insert(&mut self, id: QuestId) -> bool {
        if self.ids.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }
}

/// Discovered count against the number of known quests, shown as `d/t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscoveryProgress {
    pub discovered: usize,
    pub total: usize,
}

impl fmt::Display for DiscoveryProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.discovered, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestState {
    Hidden,
    Discovered,
    Marked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    threshold_deg: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Self::new(GEOFENCE_THRESHOLD_DEG)
    }
}

impl Geofence {
    pub fn new(threshold_deg: f64) -> Self {
        Self { threshold_deg: threshold_deg.abs() }
    }

    /// False for anything without a usable position.
    pub fn contains(&self, position: &Coordinate, poi: &impl POI) -> bool {
        match poi.get_coordinate() {
            Some(target) => target.within_box(position, self.threshold_deg),
            None => false,
        }
    }

    /// Promotes every matching, not yet discovered quest into `discovered` and
    /// returns just those, in quest-list order.
    pub fn check(
        &self,
        position: &Coordinate,
        quests: &[Quest],
        discovered: &mut DiscoveredSet,
    ) -> Vec<Quest> {
        let _timing = logging::start_timing("proximity_check", OperationCategory::Proximity);

        let mut newly_discovered = Vec::new();
        for quest in quests {
            if discovered.contains(&quest.id) || !self.contains(position, quest) {
                continue;
            }
            if discovered.insert(quest.id.clone()) {
                debug!("Quest {} entered geofence at ({:.5}, {:.5})", quest.id, position.lat, position.lng);
                newly_discovered.push(quest.clone());
            }
        }
        newly_discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temple() -> Quest {
        Quest::new("temple", "Virupaksha Temple", 15.3350, 76.4600, 50)
    }

    #[test]
    fn test_inside_and_outside_box() {
        let fence = Geofence::default();
        let quest = temple();
        for (d_lat, d_lng) in [(0.004, 0.004), (-0.004, 0.004), (0.004, -0.004), (-0.004, -0.004)] {
            let mut discovered = DiscoveredSet::new();
            let position = Coordinate::new(15.3350 + d_lat, 76.4600 + d_lng);
            assert_eq!(fence.check(&position, &[quest.clone()], &mut discovered).len(), 1);
        }
        for (d_lat, d_lng) in [(0.006, 0.0), (0.0, -0.006), (0.006, 0.006)] {
            let mut discovered = DiscoveredSet::new();
            let position = Coordinate::new(15.3350 + d_lat, 76.4600 + d_lng);
            assert!(fence.check(&position, &[quest.clone()], &mut discovered).is_empty());
        }
    }

    #[test]
    fn test_check_is_idempotent() {
        let fence = Geofence::default();
        let quests = vec![temple()];
        let mut discovered = DiscoveredSet::new();
        let position = Coordinate::new(15.3351, 76.4601);

        assert_eq!(fence.check(&position, &quests, &mut discovered).len(), 1);
        assert!(fence.check(&position, &quests, &mut discovered).is_empty());
        assert_eq!(discovered.len(), 1);
    }

    #[test]
    fn test_unplaced_quests_are_skipped() {
        let fence = Geofence::new(180.0);
        let mut quest = temple();
        quest.lat = None;
        let mut discovered = DiscoveredSet::new();
        assert!(fence.check(&Coordinate::new(15.335, 76.46), &[quest], &mut discovered).is_empty());
        assert!(discovered.is_empty());
    }

    #[test]
    fn test_duplicate_ids_promoted_once() {
        let fence = Geofence::default();
        let quests = vec![temple(), temple()];
        let mut discovered = DiscoveredSet::new();
        let found = fence.check(&Coordinate::new(15.335, 76.46), &quests, &mut discovered);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_progress_display() {
        let progress = DiscoveryProgress { discovered: 1, total: 3 };
        assert_eq!(progress.to_string(), "1/3");
    }
}
