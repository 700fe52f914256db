//! One frame of the overlay: resolve, project, draw
//!
//! The render step never fails outward. A body that cannot be resolved is
//! listed in [`FrameReport::failed`] and simply not drawn; a body behind the
//! camera lands in [`FrameReport::out_of_view`].

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::algorithms::Frustum;
use crate::core::{FieldOfView, Heading, HorizontalPosition, Observer, ScreenPoint, Viewport};
use crate::hardware::RenderSurface;
use crate::processing::resolver::CelestialResolver;
use crate::processing::selection::BodySelection;
use crate::utils::OverlayStyle;

/// A body drawn this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub body: String,
    pub position: HorizontalPosition,
    pub point: ScreenPoint,
}

/// A body skipped this frame because it could not be resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyFailure {
    pub body: String,
    pub reason: String,
}

/// Outcome of one frame step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time: DateTime<Utc>,
    pub viewport: Viewport,
    pub heading: Heading,
    pub observer: Observer,
    pub markers: Vec<Marker>,
    /// Resolved bodies outside the visible frustum
    pub out_of_view: Vec<String>,
    pub failed: Vec<BodyFailure>,
    /// Set when the canvas was resized at the start of this frame
    pub resized_from: Option<Viewport>,
}

impl FrameReport {
    pub fn marker(&self, body: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.body == body)
    }

    pub fn is_visible(&self, body: &str) -> bool {
        self.marker(body).is_some()
    }
}

/// State read by one frame step
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub time: DateTime<Utc>,
    pub heading: Heading,
    pub observer: Observer,
    pub fov: FieldOfView,
    /// Current video frame dimensions
    pub video: Viewport,
}

/// Draws frames onto a [`RenderSurface`]
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    style: OverlayStyle,
    backdrop_stars: u32,
    frames_rendered: u64,
}

impl RenderLoop {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn set_backdrop_stars(&mut self, count: u32) {
        self.backdrop_stars = count;
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Render one frame.
    ///
    /// The canvas is resized to the video frame before anything is projected
    /// so markers are placed against the current geometry.
    pub fn render_frame(
        &mut self,
        surface: &mut dyn RenderSurface,
        resolver: &mut CelestialResolver,
        selection: &BodySelection,
        inputs: &FrameInputs,
    ) -> FrameReport {
        let resized_from = sync_canvas(surface, inputs.video);
        let viewport = surface.size();
        let frustum = Frustum::new(inputs.heading, inputs.fov, viewport);

        let mut markers = Vec::new();
        let mut out_of_view = Vec::new();
        let mut failed = Vec::new();

        for body in selection.iter() {
            let position = match resolver.resolve_tracked(body, inputs.time, &inputs.observer) {
                Ok(position) => position,
                Err(err) => {
                    failed.push(BodyFailure {
                        body: body.to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match frustum.as_ref().and_then(|f| f.project(&position)) {
                Some(point) => markers.push(Marker {
                    body: body.to_string(),
                    position,
                    point,
                }),
                None => out_of_view.push(body.to_string()),
            }
        }

        surface.clear();
        if self.backdrop_stars > 0 {
            self.draw_backdrop(surface, viewport);
        }
        for marker in &markers {
            self.draw_marker(surface, marker);
        }

        self.frames_rendered += 1;
        FrameReport {
            frame: self.frames_rendered,
            time: inputs.time,
            viewport,
            heading: inputs.heading,
            observer: inputs.observer,
            markers,
            out_of_view,
            failed,
            resized_from,
        }
    }

    fn draw_marker(&self, surface: &mut dyn RenderSurface, marker: &Marker) {
        let style = &self.style;
        surface.stroke_circle(marker.point, style.marker_radius_px, &style.marker_color, style.marker_line_width_px);
        let label_anchor = marker.point.offset(0.0, -(style.marker_radius_px + style.label_offset_px));
        surface.fill_text(&marker.body, label_anchor, &style.label_color, style.font_px);
    }

    fn draw_backdrop(&self, surface: &mut dyn RenderSurface, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        let mut rng = rand::thread_rng();
        for _ in 0..self.backdrop_stars {
            let center = ScreenPoint::new(
                rng.gen::<f64>() * viewport.width as f64,
                rng.gen::<f64>() * viewport.height as f64,
            );
            let brightness: f64 = rng.gen_range(0.0..1.0);
            let radius = rng.gen::<f64>() * self.style.backdrop_max_radius_px;
            surface.fill_circle(center, radius, &format!("rgba(255, 255, 255, {:.2})", brightness));
        }
    }
}

/// Resize the canvas to the video frame; returns the old size if it changed
fn sync_canvas(surface: &mut dyn RenderSurface, video: Viewport) -> Option<Viewport> {
    let current = surface.size();
    if video.is_empty() || video == current {
        return None;
    }

    if current.is_empty() {
        info!("Canvas sized to video frame {}", video);
    } else {
        debug!("Canvas resized {} -> {}", current, video);
    }
    surface.resize(video);
    Some(current)
}
