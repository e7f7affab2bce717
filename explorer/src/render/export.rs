use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::config::constants::{AGENT_MARKER_COLOR, MAP_BACKGROUND, MARKER_RADIUS_PX};
use crate::data::poi::Coordinate;
use crate::geo::projection::{PixelPoint, Projection};
use crate::utils::logging::{self, OperationCategory, RenderType};
use super::markers::MarkerLayer;
use super::surface::FogSurface;

/// Flattens the fog over a plain map background and draws quest pins and the
/// agent on top.
pub fn render_frame(
    surface: &FogSurface,
    markers: &MarkerLayer,
    projection: &Projection,
    agent: Option<Coordinate>,
) -> RgbaImage {
    let _timing = logging::start_timing("render_frame",
        OperationCategory::Rendering { subcategory: RenderType::Export });

    let [fr, fg, fb] = surface.color();
    let [br, bg, bb] = MAP_BACKGROUND;
    let mix = |fog: u8, base: u8, alpha: f32| -> u8 {
        (fog as f32 * alpha + base as f32 * (1.0 - alpha)).round() as u8
    };

    let mut frame = RgbaImage::from_fn(surface.width(), surface.height(), |x, y| {
        let alpha = surface.alpha_at(x, y).unwrap_or(0.0).clamp(0.0, 1.0);
        Rgba([mix(fr, br, alpha), mix(fg, bg, alpha), mix(fb, bb, alpha), 255])
    });

    for marker in markers.iter() {
        let point = marker.screen_position(projection);
        draw_disc(&mut frame, point, MARKER_RADIUS_PX + 2.0, [255, 255, 255]);
        draw_disc(&mut frame, point, MARKER_RADIUS_PX, marker.color);
    }
    if let Some(agent) = agent {
        let point = projection.project(&agent);
        draw_disc(&mut frame, point, MARKER_RADIUS_PX * 0.75 + 2.0, [255, 255, 255]);
        draw_disc(&mut frame, point, MARKER_RADIUS_PX * 0.75, AGENT_MARKER_COLOR);
    }
    frame
}

pub fn save_frame_png(frame: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    frame
        .save(path.as_ref())
        .with_context(|| format!("failed to write frame to {}", path.as_ref().display()))
}

fn draw_disc(frame: &mut RgbaImage, center: PixelPoint, radius: f64, color: [u8; 3]) {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let x_min = (center.x - radius).floor().max(0.0) as u32;
    let y_min = (center.y - radius).floor().max(0.0) as u32;
    let x_max = ((center.x + radius).ceil().max(0.0) as u32).min(width - 1);
    let y_max = ((center.y + radius).ceil().max(0.0) as u32).min(height - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius * radius {
                frame.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
            }
        }
    }
}
