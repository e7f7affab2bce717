//! Fog-of-war compositor.
//!
//! Each redraw covers the surface with near-opaque fog, then erases a soft
//! disc around the screen position of every visited coordinate. Erasure is
//! destination-out with a linear radial falloff: full strength at the centre,
//! nothing at `radius`.
//!
//! Because destination-out multiplies the existing alpha by `1 - strength`,
//! holes commute. In [`RevealMode::Incremental`] the compositor exploits that
//! and only punches the newest holes into the retained surface as long as the
//! camera has not moved; any camera change falls back to a full replay.

use rayon::iter::ParallelIterator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::constants::{FOG_ALPHA, REVEAL_RADIUS_PX};
use crate::data::poi::Coordinate;
use crate::geo::projection::{Camera, PixelPoint, Projection};
use crate::utils::logging::{self, OperationCategory, RenderType};
use super::surface::FogSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Replay the whole path on every redraw.
    #[default]
    Replay,
    /// Keep the surface and add only new holes while the camera is unchanged.
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    SourceOver,
    DestinationOut,
}

impl CompositeOp {
    /// Resulting destination alpha after painting a source of alpha `src`.
    pub fn blend(self, dst: f32, src: f32) -> f32 {
        match self {
            CompositeOp::SourceOver => src + dst * (1.0 - src),
            CompositeOp::DestinationOut => dst * (1.0 - src),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawKind {
    Full { holes: usize },
    Incremental { holes: usize },
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedrawStats {
    pub full_replays: u64,
    pub incremental_updates: u64,
    pub holes_painted: u64,
}

#[derive(Debug, Clone, Copy)]
struct Retained {
    camera: Camera,
    painted: usize,
}

pub struct FogCompositor {
    radius: f64,
    fog_alpha: f32,
    mode: RevealMode,
    retained: Option<Retained>,
    stats: RedrawStats,
}

impl Default for FogCompositor {
    fn default() -> Self {
        Self::new(REVEAL_RADIUS_PX, FOG_ALPHA, RevealMode::Replay)
    }
}

impl FogCompositor {
    pub fn new(radius: f64, fog_alpha: f32, mode: RevealMode) -> Self {
        Self {
            radius: radius.max(0.0),
            fog_alpha: fog_alpha.clamp(0.0, 1.0),
            mode,
            retained: None,
            stats: RedrawStats::default(),
        }
    }

    pub fn stats(&self) -> RedrawStats {
        self.stats
    }

    /// Erasure strength at `distance` pixels from a hole centre.
    pub fn reveal_strength(&self, distance: f64) -> f32 {
        if self.radius <= 0.0 || distance >= self.radius {
            0.0
        } else {
            (1.0 - distance / self.radius) as f32
        }
    }

    /// Forgets the retained surface so the next redraw replays the full path.
    pub fn invalidate(&mut self) {
        self.retained = None;
    }

    pub fn redraw(
        &mut self,
        surface: &mut FogSurface,
        path: &[Coordinate],
        projection: &Projection,
    ) -> RedrawKind {
        let camera = *projection.camera();
        if surface.resize(camera.width(), camera.height()) {
            self.retained = None;
        }
        if surface.is_empty() {
            self.retained = None;
            return RedrawKind::Skipped;
        }

        let incremental_from = match (self.mode, self.retained) {
            (RevealMode::Incremental, Some(retained))
                if retained.camera == camera && retained.painted <= path.len() =>
            {
                Some(retained.painted)
            }
            _ => None,
        };

        let kind = match incremental_from {
            Some(start) => {
                let _timing = logging::start_timing("fog_redraw_incremental",
                    OperationCategory::Rendering { subcategory: RenderType::Incremental });
                let holes = self.project_holes(&path[start..], projection);
                self.paint(surface, &holes, false);
                self.stats.incremental_updates += 1;
                RedrawKind::Incremental { holes: holes.len() }
            }
            None => {
                let _timing = logging::start_timing("fog_redraw_full",
                    OperationCategory::Rendering { subcategory: RenderType::FullReplay });
                let holes = self.project_holes(path, projection);
                self.paint(surface, &holes, true);
                self.stats.full_replays += 1;
                RedrawKind::Full { holes: holes.len() }
            }
        };

        if let RedrawKind::Full { holes } | RedrawKind::Incremental { holes } = kind {
            self.stats.holes_painted += holes as u64;
        }
        self.retained = Some(Retained { camera, painted: path.len() });
        debug!("Fog redraw {:?} over {} path points", kind, path.len());
        kind
    }

    // Holes whose disc misses the viewport entirely are dropped
    fn project_holes(&self, path: &[Coordinate], projection: &Projection) -> Vec<PixelPoint> {
        path.iter()
            .map(|coordinate| projection.project(coordinate))
            .filter(|point| projection.is_visible(point, self.radius))
            .collect()
    }

    fn paint(&self, surface: &mut FogSurface, holes: &[PixelPoint], fill: bool) {
        let width = surface.width() as usize;
        let radius = self.radius;
        let fog_alpha = self.fog_alpha;

        if fill {
            let op = CompositeOp::SourceOver;
            surface.rows_mut().for_each(|(_, row)| {
                for alpha in row.iter_mut() {
                    *alpha = op.blend(0.0, fog_alpha);
                }
            });
        }

        if holes.is_empty() || radius <= 0.0 {
            return;
        }

        let op = CompositeOp::DestinationOut;
        surface.rows_mut().for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for hole in holes {
                let dy = py - hole.y;
                if dy.abs() >= radius {
                    continue;
                }
                let x_start = (hole.x - radius).floor().max(0.0) as usize;
                let x_end = ((hole.x + radius).ceil().max(0.0) as usize).min(width);
                for (x, alpha) in row.iter_mut().enumerate().take(x_end).skip(x_start) {
                    let dx = x as f64 + 0.5 - hole.x;
                    let strength = self.reveal_strength((dx * dx + dy * dy).sqrt());
                    if strength > 0.0 {
                        *alpha = op.blend(*alpha, strength);
                    }
                }
            }
        });
    }
}
