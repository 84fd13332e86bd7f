// crates/skyfire_game/src/hud.rs
//! Debug overlay text (frame rate, object count) and the pause banner.

use glam::{Vec2, Vec4};
use skyfire_shared::services::{TextStyle, BLACK};
use skyfire_shared::{Device, DrawCall, DrawableId, FontInfo, Shading, Transform};

/// Seconds of frame times averaged into one FPS reading.
const FPS_PERIOD: f32 = 0.3;
const DEBUG_TEXT_SCALE: f32 = 0.0024;
const BANNER_HEIGHT_PX: f32 = 50.0;

/// A text drawable with its own placement, kept outside the scene.
#[derive(Debug, Clone, Copy)]
pub struct TextLabel {
    pub drawable: DrawableId,
    pub transform: Transform,
    pub style: TextStyle,
}

impl TextLabel {
    pub fn draw_call(&self) -> DrawCall {
        DrawCall {
            drawable: self.drawable,
            model: self.transform.matrix(),
            shading: Shading::Text(self.style),
        }
    }
}

/// Averages instantaneous frame rates over `FPS_PERIOD` windows.
#[derive(Debug, Default)]
pub struct FpsCounter {
    sum: f32,
    samples: u32,
    window: f32,
    current: Option<f32>,
    shown: Option<f32>,
}

impl FpsCounter {
    /// Feeds one frame time. Returns the reading when it differs from the
    /// one last returned.
    pub fn sample(&mut self, frame_time: f32) -> Option<f32> {
        if frame_time <= 0.0 {
            return None;
        }
        let fps = 1.0 / frame_time;
        self.sum += fps;
        self.samples += 1;
        self.window += frame_time;

        if self.current.is_none() {
            self.current = Some(fps);
        }
        if self.window > FPS_PERIOD {
            self.window -= FPS_PERIOD;
            self.current = Some(self.sum / self.samples as f32);
            self.sum = 0.0;
            self.samples = 0;
        }

        let current = self.current?;
        if self.shown == Some(current) {
            return None;
        }
        self.shown = Some(current);
        Some(current)
    }
}

pub fn format_fps(fps: f32) -> String {
    format!("FPS {:.0} ms {:.3}", fps, 1000.0 / fps)
}

pub fn format_object_count(count: usize) -> String {
    format!("OBJ {:03}", count)
}

#[derive(Debug)]
pub struct Hud {
    pub fps: TextLabel,
    pub objects: TextLabel,
    pub paused: TextLabel,
    fps_counter: FpsCounter,
    shown_count: Option<usize>,
}

impl Hud {
    /// `window_height` is the reference height the banner size is given in.
    pub fn new<D: Device>(device: &mut D, font: FontInfo, aspect: f32, window_height: u32) -> Self {
        let debug_style = TextStyle {
            color: Vec4::new(0.87, 0.87, 0.87, 1.0),
            outline_color: BLACK,
            outline_thickness: 1.0,
        };
        let debug_scale = Vec2::new(DEBUG_TEXT_SCALE, -DEBUG_TEXT_SCALE);

        let fps = TextLabel {
            drawable: device.upload_text(font.id, &format_fps(0.0)),
            transform: Transform {
                position: Vec2::new(-0.99 * aspect, -0.99),
                scale: debug_scale,
                rotation: 0.0,
            },
            style: debug_style,
        };
        let objects = TextLabel {
            drawable: device.upload_text(font.id, &format_object_count(0)),
            transform: Transform {
                position: Vec2::new(0.68 * aspect, -0.99),
                scale: debug_scale,
                rotation: 0.0,
            },
            style: debug_style,
        };

        let banner = "PAUSED";
        let size = (1.0 / font.pixel_height) * (BANNER_HEIGHT_PX / window_height as f32);
        let width = device.layout_text(font.id, banner).width;
        let paused = TextLabel {
            drawable: device.upload_text(font.id, banner),
            transform: Transform {
                position: Vec2::new(-size * width / 2.0, 0.0),
                scale: Vec2::new(size, -size),
                rotation: 0.0,
            },
            style: TextStyle::default(),
        };

        Self {
            fps,
            objects,
            paused,
            fps_counter: FpsCounter::default(),
            shown_count: None,
        }
    }

    /// Re-uploads the FPS text only when the reading changed.
    pub fn update_fps<D: Device>(&mut self, device: &mut D, frame_time: f32) {
        if let Some(fps) = self.fps_counter.sample(frame_time) {
            device.update_text(self.fps.drawable, &format_fps(fps));
        }
    }

    pub fn update_object_count<D: Device>(&mut self, device: &mut D, count: usize) {
        if self.shown_count == Some(count) {
            return;
        }
        self.shown_count = Some(count);
        device.update_text(self.objects.drawable, &format_object_count(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_reports_first_sample_then_window_average() {
        let mut counter = FpsCounter::default();
        assert_eq!(counter.sample(0.125), Some(8.0));
        // Same reading, nothing new to show.
        assert_eq!(counter.sample(0.125), None);
        // Window closes: average of 8, 8 and 4.
        let average = counter.sample(0.25).unwrap();
        assert!((average - 20.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn zero_frame_time_is_ignored() {
        let mut counter = FpsCounter::default();
        assert_eq!(counter.sample(0.0), None);
    }

    #[test]
    fn labels_are_formatted() {
        assert_eq!(format_fps(125.0), "FPS 125 ms 8.000");
        assert_eq!(format_object_count(7), "OBJ 007");
        assert_eq!(format_object_count(1234), "OBJ 1234");
    }
}
