//! Headless harness for driving the inspector without a window.
//!
//! Wraps an `Inspector` over the in-memory scene so tests and the JSON
//! command protocol can load meshes, click at world positions and read
//! back the state the toolbar would show.

use glam::{DVec2, DVec3};
use shared::{MeasurementMode, MeshDescription, RepresentationLayer, SliceAxis, VisibilityFlags};

use crate::error::Result;
use crate::geometry::MeshData;
use crate::handle::OrientedBox;
use crate::inspector::Inspector;
use crate::measure::SessionEvent;
use crate::scale_bar::ZoomOutcome;
use crate::scene::{MemoryScene, Scene};
use crate::settings::InspectorSettings;
use crate::validation::MeshValidator;

/// Headless inspector over a `MemoryScene`
pub struct InspectorHarness {
    pub inspector: Inspector<MemoryScene>,
}

impl InspectorHarness {
    /// Create a harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(InspectorSettings::default())
    }

    pub fn with_settings(settings: InspectorSettings) -> Self {
        let scene = MemoryScene::from_settings(&settings);
        Self {
            inspector: Inspector::new(scene, settings),
        }
    }

    pub fn scene(&self) -> &MemoryScene {
        self.inspector.backend()
    }

    // ── Loading ───────────────────────────────────────────────

    pub fn load_mesh(&mut self, desc: &MeshDescription) -> Result<()> {
        self.inspector.load_mesh(desc)
    }

    /// Load a mesh from a JSON `MeshDescription`
    pub fn load_mesh_json(&mut self, json: &str) -> std::result::Result<(), String> {
        let desc: MeshDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_mesh(&desc).map_err(|e| e.to_string())
    }

    pub fn set_z_scale(&mut self, z_scale: f64) -> Result<()> {
        self.inspector.set_z_scale(z_scale)
    }

    // ── Measurement ───────────────────────────────────────────

    pub fn set_mode(&mut self, mode: MeasurementMode) {
        self.inspector.set_mode(mode);
    }

    /// Click at a screen position
    pub fn click(&mut self, x: f64, y: f64) -> SessionEvent {
        self.inspector.on_click(x, y)
    }

    /// Click the middle of the viewport
    pub fn click_center(&mut self) -> SessionEvent {
        let c = self.scene().viewport().center();
        self.click(c.x, c.y)
    }

    /// Click where a world point appears on screen. `None` if it is behind the camera.
    pub fn click_world(&mut self, point: DVec3) -> Option<SessionEvent> {
        let screen = self.screen_position(point)?;
        Some(self.click(screen.x, screen.y))
    }

    pub fn screen_position(&self, point: DVec3) -> Option<DVec2> {
        self.scene().project(point)
    }

    pub fn clear(&mut self) {
        self.inspector.clear();
    }

    pub fn picked_points(&self) -> &[DVec3] {
        self.inspector.session().points()
    }

    pub fn point_count(&self) -> usize {
        self.inspector.session().len()
    }

    pub fn measurement_text(&self) -> Option<&str> {
        self.inspector.measurement_text()
    }

    /// Markers and connecting segments currently in the scene
    pub fn marker_count(&self) -> usize {
        self.scene().marker_count()
    }

    // ── Clipping and slicing ──────────────────────────────────

    pub fn set_clip_enabled(&mut self, on: bool) {
        self.inspector.set_clip_enabled(on);
    }

    pub fn move_clip_box(&mut self, shape: OrientedBox) -> Result<()> {
        self.inspector.move_clip_box(shape)
    }

    pub fn clip_box(&self) -> OrientedBox {
        self.inspector.clip().current_box()
    }

    pub fn show_slice(&mut self, axis: SliceAxis) -> Result<()> {
        self.inspector.show_slice(axis)
    }

    pub fn hide_slice(&mut self) {
        self.inspector.hide_slice();
    }

    /// Current clipped copy of the mesh
    pub fn clipped_mesh(&self) -> Option<&MeshData> {
        let id = self.inspector.clip().clipped_mesh()?;
        self.scene().mesh(id)
    }

    /// Current slice geometry
    pub fn slice_mesh(&self) -> Option<&MeshData> {
        let id = self.inspector.slice().slice_mesh()?;
        self.scene().mesh(id)
    }

    /// Processed mesh of the loaded model
    pub fn model_mesh(&self) -> Option<&MeshData> {
        let model = self.inspector.model()?;
        self.scene().mesh(model.mesh)
    }

    pub fn validate_clipped(&self) -> Option<MeshValidator<'_>> {
        self.clipped_mesh().map(MeshValidator::new)
    }

    pub fn validate_slice(&self) -> Option<MeshValidator<'_>> {
        self.slice_mesh().map(MeshValidator::new)
    }

    // ── Display ───────────────────────────────────────────────

    pub fn set_layer_visible(&mut self, layer: RepresentationLayer, on: bool) -> Result<()> {
        self.inspector.set_layer_visible(layer, on)
    }

    pub fn set_bounding_box_visible(&mut self, on: bool) {
        self.inspector.set_bounding_box_visible(on);
    }

    pub fn zoom(&mut self, delta: f64) -> ZoomOutcome {
        self.inspector.zoom(delta)
    }

    pub fn scale_bar_label(&self) -> String {
        self.inspector.scale_bar().label()
    }

    pub fn visibility(&self) -> VisibilityFlags {
        self.inspector.visibility()
    }
}

impl Default for InspectorHarness {
    fn default() -> Self {
        Self::new()
    }
}
