//! On-screen scale bar and the zoom-in limit it imposes.

use crate::scene::{ArcBallCamera, Viewport};
use crate::settings::ScaleBarSettings;

/// Round a world length to a step that reads well on a scale bar
pub fn rounded_length(length: f64) -> f64 {
    if length < 1.0 {
        (length * 20.0).round() / 20.0
    } else if length < 10.0 {
        (length * 2.0).round() / 2.0
    } else if length < 100.0 {
        (length / 5.0).round() * 5.0
    } else if length < 1000.0 {
        (length / 50.0).round() * 50.0
    } else {
        (length / 100.0).round() * 100.0
    }
}

/// Result of a zoom step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomOutcome {
    Applied,
    /// The bar would have dropped below its minimum; the camera was put back
    Reverted,
}

#[derive(Debug, Clone)]
pub struct ScaleBar {
    settings: ScaleBarSettings,
    last_valid_distance: f64,
    /// Rounded world length shown by the bar
    length: f64,
    /// On-screen length of the bar for `length`
    bar_pixels: f64,
}

impl ScaleBar {
    pub fn new(settings: ScaleBarSettings, camera: &ArcBallCamera, viewport: &Viewport) -> Self {
        let mut bar = Self {
            settings,
            last_valid_distance: camera.distance,
            length: 0.0,
            bar_pixels: 0.0,
        };
        bar.update(camera, viewport);
        bar
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn bar_pixels(&self) -> f64 {
        self.bar_pixels
    }

    pub fn label(&self) -> String {
        format!("{:.2} {}", self.length, self.settings.unit)
    }

    /// Recompute from the camera. Lengths below the minimum leave the bar as it was.
    pub fn update(&mut self, camera: &ArcBallCamera, viewport: &Viewport) -> bool {
        let scale = camera.world_per_pixel(viewport);
        if scale <= 0.0 || !scale.is_finite() {
            return false;
        }
        let length = rounded_length(scale * self.settings.pixel_length);
        if length < self.settings.min_length {
            return false;
        }
        self.length = length;
        self.bar_pixels = length / scale;
        true
    }

    /// Zoom the camera by `delta` (positive zooms in), enforcing the minimum bar length
    pub fn zoom(&mut self, camera: &mut ArcBallCamera, viewport: &Viewport, delta: f64) -> ZoomOutcome {
        camera.zoom(delta);
        let candidate = rounded_length(camera.world_per_pixel(viewport) * self.settings.pixel_length);
        if delta > 0.0 && candidate <= self.settings.min_length {
            camera.distance = self.last_valid_distance;
            tracing::debug!("Zoom limit reached, camera distance reverted");
            return ZoomOutcome::Reverted;
        }
        self.last_valid_distance = camera.distance;
        self.update(camera, viewport);
        ZoomOutcome::Applied
    }

    /// Accept the camera's current distance as valid (after framing a new mesh)
    pub fn reset(&mut self, camera: &ArcBallCamera, viewport: &Viewport) {
        self.last_valid_distance = camera.distance;
        self.update(camera, viewport);
    }
}
