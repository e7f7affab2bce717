use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::constants::QUEST_MARKER_COLOR;
use crate::data::poi::Coordinate;
use crate::data::quest::{Quest, QuestId};
use crate::geo::projection::{PixelPoint, Projection};
use crate::utils::logging::{self, OperationCategory};

/// Map pin for a discovered quest. Positions are geographic so the pin
/// follows the map through any camera change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub quest_id: QuestId,
    pub position: Coordinate,
    pub popup: String,
    pub xp: i64,
    pub color: [u8; 3],
}

impl Marker {
    pub fn screen_position(&self, projection: &Projection) -> PixelPoint {
        projection.project(&self.position)
    }
}

/// Markers keyed by quest id; entries are only ever added.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    index: HashMap<QuestId, usize>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a marker for `quest` unless one already exists or the quest has
    /// no position.
    pub fn add_if_new(&mut self, quest: &Quest) -> Option<&Marker> {
        let _timing = logging::start_timing("add_marker", OperationCategory::Markers);

        if self.index.contains_key(&quest.id) {
            debug!("Marker for quest {} already placed", quest.id);
            return None;
        }
        let Some(position) = quest.location() else {
            debug!("Quest {} has no position, no marker placed", quest.id);
            return None;
        };

        let marker = Marker {
            quest_id: quest.id.clone(),
            position,
            popup: quest.popup_text(),
            xp: quest.xp,
            color: QUEST_MARKER_COLOR,
        };
        info!("Placed marker for {} at ({:.5}, {:.5})", quest.name, position.lat, position.lng);

        let slot = self.markers.len();
        self.index.insert(quest.id.clone(), slot);
        self.markers.push(marker);
        self.markers.last()
    }

    pub fn get(&self, id: &QuestId) -> Option<&Marker> {
        self.index.get(id).and_then(|slot| self.markers.get(*slot))
    }

    pub fn contains(&self, id: &QuestId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}
