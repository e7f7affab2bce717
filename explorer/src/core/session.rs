//! One exploration session: visited path, discovered quests, markers and the
//! map/fog handle, all owned here and mutated from a single thread.

use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::map_handle::{MapHandle, MapInitError};
use super::tracker::PathTracker;
use crate::config::explorer_config::ExplorerConfig;
use crate::data::poi::Coordinate;
use crate::data::quest::{Quest, QuestId};
use crate::discovery::proximity::{DiscoveredSet, DiscoveryProgress, Geofence, QuestState};
use crate::geo::projection::{Camera, PixelPoint};
use crate::render::export::render_frame;
use crate::render::fog::{FogCompositor, RedrawKind, RedrawStats};
use crate::render::markers::MarkerLayer;
use crate::utils::traits::LocationProvider;

/// User interaction with the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// Pixel offset; positive `dx` looks east, positive `dy` looks south.
    Pan { dx: f64, dy: f64 },
    /// Zoom step, optionally anchored at a screen point.
    Zoom { delta: f64, anchor: Option<PixelPoint> },
    JumpTo { center: Coordinate, zoom: Option<f64> },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// The recorded fix; `None` when the provider had nothing.
    pub position: Option<Coordinate>,
    pub discovered: Vec<Quest>,
    pub redraw: RedrawKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredEntry {
    pub id: QuestId,
    pub name: String,
    pub xp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub path_length: usize,
    pub progress: DiscoveryProgress,
    pub total_xp: i64,
    pub discovered: Vec<DiscoveredEntry>,
    pub redraws: RedrawStats,
    pub provider: String,
}

pub struct ExplorerSession {
    config: ExplorerConfig,
    quests: Vec<Quest>,
    tracker: PathTracker,
    discovered: DiscoveredSet,
    markers: MarkerLayer,
    geofence: Geofence,
    compositor: FogCompositor,
    provider: Box<dyn LocationProvider>,
    map: Option<MapHandle>,
    // Last camera, kept so a re-opened map resumes the same view
    camera: Camera,
    ticks: u64,
}

impl ExplorerSession {
    pub fn new(config: ExplorerConfig, quests: Vec<Quest>, provider: Box<dyn LocationProvider>) -> Self {
        let compositor = FogCompositor::new(config.fog.reveal_radius_px, config.fog.alpha, config.fog.mode);
        let geofence = Geofence::new(config.geofence_threshold_deg);
        let camera = config.initial_camera();

        Self {
            tracker: PathTracker::new(config.origin),
            quests,
            discovered: DiscoveredSet::new(),
            markers: MarkerLayer::new(),
            geofence,
            compositor,
            provider,
            map: None,
            camera,
            ticks: 0,
            config,
        }
    }

    /// Opens the map and fog surface. `Ok(false)` when a map is already live.
    pub fn init_map(&mut self) -> Result<bool, MapInitError> {
        if self.map.is_some() {
            debug!("Map already initialised, ignoring second init");
            return Ok(false);
        }

        let handle = MapHandle::open(self.camera, self.config.fog.color, &self.config.tile_url_template)?;
        self.map = Some(handle);
        self.compositor.invalidate();
        self.redraw();
        Ok(true)
    }

    /// Like [`init_map`](Self::init_map) but logs failures instead of
    /// returning them. Tracking keeps working without a map.
    pub fn attach_map(&mut self) -> bool {
        match self.init_map() {
            Ok(_) => true,
            Err(err) => {
                warn!("Map initialisation failed, fog rendering disabled: {}", err);
                false
            }
        }
    }

    /// Drops the map and its surface together. Returns whether one was live.
    pub fn release_map(&mut self) -> bool {
        let released = self.map.take().is_some();
        if released {
            self.compositor.invalidate();
            info!("Map released after {} ticks", self.ticks);
        }
        released
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;

        let Some(position) = self.tracker.tick(self.provider.as_mut()) else {
            debug!("Tick {}: no position fix", self.ticks);
            return TickOutcome {
                position: None,
                discovered: Vec::new(),
                redraw: RedrawKind::Skipped,
            };
        };

        let redraw = self.redraw();
        let discovered = self.check_proximity(&position);

        TickOutcome {
            position: Some(position),
            discovered,
            redraw,
        }
    }

    // Skipped while no map is live, so every discovery gets its marker
    fn check_proximity(&mut self, position: &Coordinate) -> Vec<Quest> {
        if self.map.is_none() {
            return Vec::new();
        }

        let newly_discovered = self.geofence.check(position, &self.quests, &mut self.discovered);
        for quest in &newly_discovered {
            self.markers.add_if_new(quest);
            info!(
                "Discovered {} (+{} XP), progress {}",
                quest.name, quest.xp, self.progress()
            );
        }
        newly_discovered
    }

    pub fn handle_camera(&mut self, event: CameraEvent) -> RedrawKind {
        let camera = match event {
            CameraEvent::Pan { dx, dy } => self.camera.pan_by(dx, dy),
            CameraEvent::Zoom { delta, anchor } => self.camera.zoom_by(delta, anchor),
            CameraEvent::JumpTo { center, zoom } => {
                let camera = self.camera.with_center(center);
                match zoom {
                    Some(zoom) => camera.with_zoom(zoom),
                    None => camera,
                }
            }
            CameraEvent::Resize { width, height } => self.camera.with_size(width, height),
        };

        self.camera = camera;
        if let Some(map) = self.map.as_mut() {
            map.set_camera(camera);
        }
        self.redraw()
    }

    pub fn redraw(&mut self) -> RedrawKind {
        let Some(map) = self.map.as_mut() else {
            return RedrawKind::Skipped;
        };
        let (surface, projection) = map.draw_parts();
        self.compositor.redraw(surface, self.tracker.path(), projection)
    }

    /// Current frame as an image, or `None` while no map is live.
    pub fn render_frame(&self) -> Option<RgbaImage> {
        let map = self.map.as_ref()?;
        Some(render_frame(
            map.surface(),
            &self.markers,
            map.projection(),
            Some(self.tracker.latest()),
        ))
    }

    pub fn quest_state(&self, id: &QuestId) -> QuestState {
        if self.markers.contains(id) {
            QuestState::Marked
        } else if self.discovered.contains(id) {
            QuestState::Discovered
        } else {
            QuestState::Hidden
        }
    }

    pub fn progress(&self) -> DiscoveryProgress {
        DiscoveryProgress {
            discovered: self.discovered.len(),
            total: self.quests.len(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let discovered: Vec<DiscoveredEntry> = self
            .discovered
            .iter()
            .filter_map(|id| self.quests.iter().find(|quest| &quest.id == id))
            .map(|quest| DiscoveredEntry {
                id: quest.id.clone(),
                name: quest.name.clone(),
                xp: quest.xp,
            })
            .collect();

        SessionSummary {
            ticks: self.ticks,
            path_length: self.tracker.len(),
            progress: self.progress(),
            total_xp: discovered.iter().map(|entry| entry.xp).sum(),
            discovered,
            redraws: self.compositor.stats(),
            provider: self.provider.describe(),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn path(&self) -> &[Coordinate] {
        self.tracker.path()
    }

    pub fn agent_position(&self) -> Coordinate {
        self.tracker.latest()
    }

    pub fn discovered(&self) -> &DiscoveredSet {
        &self.discovered
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn map(&self) -> Option<&MapHandle> {
        self.map.as_ref()
    }

    pub fn is_map_live(&self) -> bool {
        self.map.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
