//! 2D drawing surface the overlay is painted on

use serde::Serialize;

use crate::core::{ScreenPoint, Viewport};

/// Drawing target layered over the video, sized in pixels
pub trait RenderSurface {
    fn size(&self) -> Viewport;

    fn resize(&mut self, size: Viewport);

    /// Erase everything drawn in the previous frame
    fn clear(&mut self);

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, color: &str, line_width: f64);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: &str);

    /// Draw text horizontally centered on `anchor`
    fn fill_text(&mut self, text: &str, anchor: ScreenPoint, color: &str, font_px: f64);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear,
    Resize(Viewport),
    StrokeCircle {
        center: ScreenPoint,
        radius: f64,
        color: String,
        line_width: f64,
    },
    FillCircle {
        center: ScreenPoint,
        radius: f64,
        color: String,
    },
    FillText {
        text: String,
        anchor: ScreenPoint,
        color: String,
        font_px: f64,
    },
}

/// Headless surface that records the calls made on it.
///
/// Only the current frame is retained: `clear` drops everything drawn
/// before it, so memory stays flat over long sessions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Viewport,
    commands: Vec<DrawCommand>,
    resizes: usize,
    frames_cleared: u64,
}

impl RecordingSurface {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Retained commands; earlier frames are dropped on `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands issued since the last `clear`
    pub fn frame_commands(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .position(|cmd| matches!(cmd, DrawCommand::Clear))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Labels drawn since the last `clear`
    pub fn frame_labels(&self) -> Vec<&str> {
        self.frame_commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn frames_cleared(&self) -> u64 {
        self.frames_cleared
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, size: Viewport) {
        self.size = size;
        self.resizes += 1;
        self.commands.push(DrawCommand::Resize(size));
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.frames_cleared += 1;
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, color: &str, line_width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, anchor: ScreenPoint, color: &str, font_px: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            anchor,
            color: color.to_string(),
            font_px,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_commands_start_at_last_clear() {
        let mut surface = RecordingSurface::new(Viewport::new(100, 100));
        surface.clear();
        surface.fill_text("Moon", ScreenPoint::new(50.0, 40.0), "#fff", 14.0);
        surface.clear();
        surface.fill_text("Mars", ScreenPoint::new(10.0, 10.0), "#fff", 14.0);

        assert_eq!(surface.frame_labels(), vec!["Mars"]);
        assert_eq!(surface.frame_commands()[0], DrawCommand::Clear);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.frames_cleared(), 2);
    }

    #[test]
    fn test_resize_count_survives_clear() {
        let mut surface = RecordingSurface::new(Viewport::new(640, 480));
        surface.resize(Viewport::new(1280, 720));
        surface.clear();
        surface.resize(Viewport::new(800, 600));
        surface.clear();

        assert_eq!(surface.resize_count(), 2);
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_resize_updates_size() {
        let mut surface = RecordingSurface::new(Viewport::new(640, 480));
        surface.resize(Viewport::new(1280, 720));
        assert_eq!(surface.size(), Viewport::new(1280, 720));
        assert_eq!(surface.resize_count(), 1);
    }
}
