//! Frustum projection from horizontal coordinates to overlay pixels
//!
//! Maps a body's azimuth/altitude onto the screen given where the device is
//! pointed. The mapping is linear in angle (pixels per degree are constant
//! across the frame), which is a small-angle approximation of a pinhole
//! camera:
//! - adequate for the modest fields of view of phone cameras
//! - wide-angle distortion is not modelled
//! - bodies outside the frustum are dropped, not clamped to the edge

use crate::core::{wrap_delta, FieldOfView, Heading, HorizontalPosition, ScreenPoint, Viewport};

/// Angular offset of a body from the view center (degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularOffset {
    /// Signed azimuth difference in `(-180, 180]`, positive to the right
    pub delta_azimuth: f64,
    /// Signed altitude difference, positive upward
    pub delta_altitude: f64,
}

impl AngularOffset {
    /// Offset of `object` relative to the device `heading`
    pub fn between(object: &HorizontalPosition, heading: &Heading) -> Self {
        Self {
            delta_azimuth: wrap_delta(object.azimuth - heading.azimuth),
            delta_altitude: object.altitude - heading.altitude,
        }
    }
}

/// Visible angular window for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    heading: Heading,
    viewport: Viewport,
    half_horizontal_deg: f64,
    half_vertical_deg: f64,
}

impl Frustum {
    /// Build the frustum for a heading, FOV and viewport.
    ///
    /// Returns `None` for an empty viewport or a non-positive FOV, where no
    /// body can be placed on screen.
    pub fn new(heading: Heading, fov: FieldOfView, viewport: Viewport) -> Option<Self> {
        if viewport.is_empty() || !fov.horizontal_deg.is_finite() || fov.horizontal_deg <= 0.0 {
            return None;
        }

        let vertical_deg = fov.vertical_deg(viewport);

        Some(Self {
            heading,
            viewport,
            half_horizontal_deg: fov.horizontal_deg / 2.0,
            half_vertical_deg: vertical_deg / 2.0,
        })
    }

    pub fn vertical_fov_deg(&self) -> f64 {
        self.half_vertical_deg * 2.0
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether an angular offset falls inside the window (edges inclusive)
    pub fn contains(&self, offset: &AngularOffset) -> bool {
        offset.delta_azimuth.abs() <= self.half_horizontal_deg
            && offset.delta_altitude.abs() <= self.half_vertical_deg
    }

    /// Screen position of a body, or `None` when it is out of view
    pub fn project(&self, object: &HorizontalPosition) -> Option<ScreenPoint> {
        let offset = AngularOffset::between(object, &self.heading);
        if !self.contains(&offset) {
            return None;
        }

        let half_width = self.viewport.width as f64 / 2.0;
        let half_height = self.viewport.height as f64 / 2.0;

        let x = half_width + (offset.delta_azimuth / self.half_horizontal_deg) * half_width;
        let y = half_height - (offset.delta_altitude / self.half_vertical_deg) * half_height;

        Some(ScreenPoint::new(x, y))
    }
}

/// Project a single body for the current heading, FOV and viewport
pub fn project(
    object: &HorizontalPosition,
    heading: &Heading,
    fov: &FieldOfView,
    viewport: Viewport,
) -> Option<ScreenPoint> {
    Frustum::new(*heading, *fov, viewport)?.project(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800, 600)
    }

    #[test]
    fn test_center_of_frame() {
        for (heading, fov, vp) in [
            (Heading::new(0.0, 0.0), 60.0, Viewport::new(800, 600)),
            (Heading::new(123.4, 35.0), 45.0, Viewport::new(1280, 720)),
            (Heading::new(359.9, -20.0), 90.0, Viewport::new(480, 640)),
        ] {
            let object = HorizontalPosition::new(heading.azimuth, heading.altitude);
            let point = project(&object, &heading, &FieldOfView::new(fov), vp).unwrap();
            assert!((point.x - vp.width as f64 / 2.0).abs() < 1e-9);
            assert!((point.y - vp.height as f64 / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_visibility_boundary() {
        let heading = Heading::new(0.0, 0.0);
        let fov = FieldOfView::new(60.0);

        let edge = HorizontalPosition::new(30.0, 0.0);
        assert!(project(&edge, &heading, &fov, viewport()).is_some());

        let outside = HorizontalPosition::new(30.1, 0.0);
        assert!(project(&outside, &heading, &fov, viewport()).is_none());

        let left_outside = HorizontalPosition::new(-30.1, 0.0);
        assert!(project(&left_outside, &heading, &fov, viewport()).is_none());
    }

    #[test]
    fn test_edge_mapping() {
        let heading = Heading::new(100.0, 10.0);
        let fov = FieldOfView::new(60.0);

        let right = project(&HorizontalPosition::new(130.0, 10.0), &heading, &fov, viewport()).unwrap();
        assert!((right.x - 800.0).abs() < 1e-9);
        assert!((right.y - 300.0).abs() < 1e-9);

        let left = project(&HorizontalPosition::new(70.0, 10.0), &heading, &fov, viewport()).unwrap();
        assert!(left.x.abs() < 1e-9);
    }

    #[test]
    fn test_vertical_edges_use_aspect_fov() {
        // 800x600 at 60 deg horizontal gives 45 deg vertical
        let heading = Heading::new(0.0, 0.0);
        let fov = FieldOfView::new(60.0);

        let top = project(&HorizontalPosition::new(0.0, 22.5), &heading, &fov, viewport()).unwrap();
        assert!(top.y.abs() < 1e-9);

        let bottom = project(&HorizontalPosition::new(0.0, -22.5), &heading, &fov, viewport()).unwrap();
        assert!((bottom.y - 600.0).abs() < 1e-9);

        assert!(project(&HorizontalPosition::new(0.0, 22.6), &heading, &fov, viewport()).is_none());
    }

    #[test]
    fn test_wraps_across_north() {
        let heading = Heading::new(350.0, 0.0);
        let fov = FieldOfView::new(60.0);

        // 20 deg to the right of the heading, across north
        let point = project(&HorizontalPosition::new(10.0, 0.0), &heading, &fov, viewport()).unwrap();
        let expected_x = 400.0 + (20.0 / 30.0) * 400.0;
        assert!((point.x - expected_x).abs() < 1e-9);
    }

    #[test]
    fn test_behind_viewer_not_visible() {
        let heading = Heading::new(0.0, 0.0);
        let fov = FieldOfView::new(60.0);
        assert!(project(&HorizontalPosition::new(180.0, 0.0), &heading, &fov, viewport()).is_none());
    }

    #[test]
    fn test_degenerate_inputs() {
        let heading = Heading::new(0.0, 0.0);
        let object = HorizontalPosition::new(0.0, 0.0);
        assert!(project(&object, &heading, &FieldOfView::new(60.0), Viewport::new(0, 600)).is_none());
        assert!(project(&object, &heading, &FieldOfView::new(0.0), viewport()).is_none());
        assert!(project(&object, &heading, &FieldOfView::new(f64::NAN), viewport()).is_none());
    }

    #[test]
    fn test_angular_offset() {
        let offset = AngularOffset::between(&HorizontalPosition::new(5.0, 40.0), &Heading::new(355.0, 30.0));
        assert!((offset.delta_azimuth - 10.0).abs() < 1e-9);
        assert!((offset.delta_altitude - 10.0).abs() < 1e-9);

        let frustum = Frustum::new(Heading::new(0.0, 0.0), FieldOfView::new(60.0), viewport()).unwrap();
        assert!((frustum.vertical_fov_deg() - 45.0).abs() < 1e-12);
        assert!(frustum.contains(&offset));
    }
}
