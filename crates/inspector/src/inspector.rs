//! The inspector facade: routes UI commands to the measurement session and
//! the clip and slice controllers, and keeps drawable visibility consistent
//! across them.

use shared::{MeasurementMode, MeshDescription, RepresentationLayer, SliceAxis, VisibilityFlags};

use crate::clip::ClipRegionController;
use crate::error::{InspectError, Result};
use crate::events::{EventQueue, InspectorEvent};
use crate::geometry::MeshData;
use crate::handle::{BoxWidget, HandleRegistry, HandleTarget, OrientedBox};
use crate::measure::{MeasurementPresenter, PickingSession, SessionEvent};
use crate::pipeline::{self, LoadedModel};
use crate::scale_bar::{ScaleBar, ZoomOutcome};
use crate::scene::{is_displayed, Backend};
use crate::settings::InspectorSettings;
use crate::slice::SliceController;

/// User-chosen visibility of the representation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    pub surface: bool,
    pub wireframe: bool,
    pub points: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            surface: true,
            wireframe: true,
            points: true,
        }
    }
}

impl LayerVisibility {
    pub fn get(&self, layer: RepresentationLayer) -> bool {
        match layer {
            RepresentationLayer::Surface => self.surface,
            RepresentationLayer::Wireframe => self.wireframe,
            RepresentationLayer::Points => self.points,
        }
    }

    pub fn set(&mut self, layer: RepresentationLayer, on: bool) {
        match layer {
            RepresentationLayer::Surface => self.surface = on,
            RepresentationLayer::Wireframe => self.wireframe = on,
            RepresentationLayer::Points => self.points = on,
        }
    }
}

const LAYERS: [RepresentationLayer; 3] = [
    RepresentationLayer::Surface,
    RepresentationLayer::Wireframe,
    RepresentationLayer::Points,
];

pub struct Inspector<B: Backend> {
    backend: B,
    settings: InspectorSettings,
    session: PickingSession,
    presenter: MeasurementPresenter,
    clip: ClipRegionController,
    slice: SliceController,
    handles: HandleRegistry,
    events: EventQueue,
    scale_bar: ScaleBar,
    model: Option<LoadedModel>,
    layers: LayerVisibility,
    bounding_box_visible: bool,
}

impl<B: Backend> Inspector<B> {
    pub fn new(backend: B, settings: InspectorSettings) -> Self {
        let mut handles = HandleRegistry::new();
        let clip_handle = handles.register(HandleTarget::ClipRegion);
        let scale_bar = ScaleBar::new(
            settings.scale_bar.clone(),
            backend.camera(),
            &backend.viewport(),
        );
        Self {
            presenter: MeasurementPresenter::new(
                settings.measurement.clone(),
                settings.markers.clone(),
            ),
            clip: ClipRegionController::new(clip_handle, Box::new(BoxWidget::new())),
            slice: SliceController::new(settings.slice.clone()),
            session: PickingSession::new(),
            handles,
            events: EventQueue::new(),
            scale_bar,
            model: None,
            layers: LayerVisibility::default(),
            bounding_box_visible: true,
            backend,
            settings,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn settings(&self) -> &InspectorSettings {
        &self.settings
    }

    pub fn session(&self) -> &PickingSession {
        &self.session
    }

    pub fn presenter(&self) -> &MeasurementPresenter {
        &self.presenter
    }

    pub fn clip(&self) -> &ClipRegionController {
        &self.clip
    }

    pub fn slice(&self) -> &SliceController {
        &self.slice
    }

    pub fn scale_bar(&self) -> &ScaleBar {
        &self.scale_bar
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    /// Measurement text block, `None` while hidden
    pub fn measurement_text(&self) -> Option<&str> {
        self.presenter.text()
    }

    // ── Measurement ───────────────────────────────────────────

    pub fn set_mode(&mut self, mode: MeasurementMode) {
        let previous = self.session.mode();
        let dropped = self.session.set_mode(mode);
        if mode == MeasurementMode::None || dropped {
            self.presenter.clear(&mut self.backend);
        } else {
            self.presenter.sync(&mut self.backend, &self.session);
        }
        if previous != mode {
            tracing::info!("Measurement mode: {}", mode.display_name());
        }
    }

    /// Resolve a click and feed it to the measurement session
    pub fn on_click(&mut self, screen_x: f64, screen_y: f64) -> SessionEvent {
        if self.session.mode() == MeasurementMode::None {
            tracing::debug!("Click ignored: measurement mode is None");
            return SessionEvent::Ignored;
        }

        let hit = self.backend.pick_surface_point(screen_x, screen_y);
        let event = self.session.on_pick_result(hit);
        match event {
            SessionEvent::PickMiss => {
                tracing::debug!("No geometry at ({screen_x}, {screen_y})");
            }
            SessionEvent::PointAdded {
                count, complete, ..
            } => {
                tracing::info!(
                    "Picked point {} of {} in {} mode",
                    count,
                    self.session.quota(),
                    self.session.mode().display_name()
                );
                if complete {
                    tracing::info!("Measurement complete");
                }
                self.presenter.sync(&mut self.backend, &self.session);
            }
            SessionEvent::Ignored => {}
        }
        event
    }

    pub fn clear(&mut self) {
        self.session.clear();
        self.presenter.clear(&mut self.backend);
    }

    // ── Clipping ──────────────────────────────────────────────

    pub fn set_clip_enabled(&mut self, on: bool) {
        self.clip.set_enabled(&mut self.backend, on);
        self.apply_layers();
    }

    /// Deliver a change notification from the clip box handle
    pub fn on_clip_handle_changed(&mut self) -> Result<()> {
        self.events
            .push(InspectorEvent::HandleChanged(self.clip.handle_id()));
        self.process_events()
    }

    /// Reshape the clip box as a user drag would, then deliver the change
    pub fn move_clip_box(&mut self, shape: OrientedBox) -> Result<()> {
        self.clip.reshape_handle(shape);
        self.on_clip_handle_changed()
    }

    /// Dispatch every pending event to the controller registered for it
    pub fn process_events(&mut self) -> Result<()> {
        while let Some(event) = self.events.pop() {
            match event {
                InspectorEvent::HandleChanged(id) => match self.handles.target(id)? {
                    HandleTarget::ClipRegion => {
                        self.clip.on_handle_changed(&mut self.backend)?;
                    }
                },
            }
        }
        Ok(())
    }

    // ── Slicing ───────────────────────────────────────────────

    pub fn show_slice(&mut self, axis: SliceAxis) -> Result<()> {
        self.slice.show_slice(&mut self.backend, axis)?;
        self.apply_layers();
        Ok(())
    }

    pub fn hide_slice(&mut self) {
        self.slice.hide_slice(&mut self.backend);
        self.apply_layers();
    }

    // ── Model ─────────────────────────────────────────────────

    /// Replace the current mesh. Measurements are cleared, any slice is
    /// hidden and clipping is switched off before the new mesh is bound.
    pub fn load_mesh(&mut self, desc: &MeshDescription) -> Result<()> {
        let data = MeshData::from_description(desc)?;
        let model = pipeline::build(
            &mut self.backend,
            data,
            desc.kind,
            1.0,
            &self.settings.viewport,
        )?;

        self.clear();
        self.replace_model(model)?;

        let bounds = self
            .model
            .as_ref()
            .and_then(|m| self.backend.mesh_bounds(m.mesh));
        if let Some(bounds) = bounds {
            self.backend.camera_mut().frame(&bounds);
            let viewport = self.backend.viewport();
            self.scale_bar.reset(self.backend.camera(), &viewport);
        }
        self.backend.request_redraw();
        Ok(())
    }

    /// Rebuild the processed mesh with a new Z stretch factor
    pub fn set_z_scale(&mut self, z_scale: f64) -> Result<()> {
        let current = self
            .model
            .as_ref()
            .ok_or(InspectError::InvalidState("no mesh loaded"))?;
        let reslice = self.slice.is_visible().then(|| self.slice.axis()).flatten();

        let model = pipeline::build(
            &mut self.backend,
            current.source.clone(),
            current.kind,
            z_scale,
            &self.settings.viewport,
        )?;

        // Picked points refer to the old geometry
        self.clear();
        self.replace_model(model)?;

        if let Some(axis) = reslice {
            self.show_slice(axis)?;
        }
        self.backend.request_redraw();
        Ok(())
    }

    /// Swap in a freshly built model and bind both controllers to it
    fn replace_model(&mut self, model: LoadedModel) -> Result<()> {
        if self.slice.is_visible() {
            self.slice.hide_slice(&mut self.backend);
        }
        self.clip.set_enabled(&mut self.backend, false);
        self.clip.unbind(&mut self.backend);
        self.slice.unbind(&mut self.backend);

        if let Some(old) = self.model.take() {
            pipeline::teardown(&mut self.backend, &old);
        }

        self.clip.bind_mesh(
            &mut self.backend,
            model.mesh,
            model.representation,
            self.settings.viewport.mesh_color,
        )?;
        self.slice.update_mesh(model.mesh);
        self.slice.set_original(model.representation);
        self.model = Some(model);
        self.apply_layers();
        Ok(())
    }

    // ── Display toggles ───────────────────────────────────────

    pub fn set_layer_visible(&mut self, layer: RepresentationLayer, on: bool) -> Result<()> {
        let model = self
            .model
            .as_ref()
            .ok_or(InspectError::InvalidState("no mesh loaded"))?;
        if model.representation.layer(layer).is_none() {
            return Err(InspectError::InvalidState(
                "layer not present in this representation",
            ));
        }
        self.layers.set(layer, on);
        self.apply_layers();
        self.backend.request_redraw();
        Ok(())
    }

    pub fn set_bounding_box_visible(&mut self, on: bool) {
        self.bounding_box_visible = on;
        self.apply_layers();
        self.backend.request_redraw();
    }

    /// Zoom by `delta` (positive zooms in), bounded by the scale bar minimum
    pub fn zoom(&mut self, delta: f64) -> ZoomOutcome {
        let viewport = self.backend.viewport();
        let outcome = self
            .scale_bar
            .zoom(self.backend.camera_mut(), &viewport, delta);
        self.backend.request_redraw();
        outcome
    }

    /// Derive drawable visibility from the layer toggles and the active
    /// concerns: a shown slice hides the primary drawable, enabled clipping
    /// hides the companion overlays.
    fn apply_layers(&mut self) {
        let Some(model) = &self.model else {
            return;
        };
        let rep = model.representation;
        let slice_shown = self.slice.is_visible();
        let clip_on = self.clip.is_enabled();

        for layer in LAYERS {
            if let Some(id) = rep.layer(layer) {
                let wanted = self.layers.get(layer);
                let visible = if id == rep.primary() {
                    wanted && !slice_shown
                } else {
                    wanted && !clip_on
                };
                self.backend.set_visible(id, visible);
            }
        }
        self.backend.set_visible(model.outline, self.bounding_box_visible);
    }

    /// Flags for the toolbar toggle buttons to mirror
    pub fn visibility(&self) -> VisibilityFlags {
        let rep = self.model.as_ref().map(|m| m.representation);
        let layer_shown = |layer| {
            rep.and_then(|r| r.layer(layer))
                .is_some_and(|id| is_displayed(&self.backend, id))
        };
        VisibilityFlags {
            mode: self.session.mode(),
            original_visible: rep.is_some_and(|r| is_displayed(&self.backend, r.primary())),
            clip_enabled: self.clip.is_enabled(),
            slice_visible: self.slice.is_visible(),
            slice_axis: if self.slice.is_visible() {
                self.slice.axis()
            } else {
                None
            },
            measurement_visible: self.presenter.is_visible(),
            bounding_box_visible: self
                .model
                .as_ref()
                .is_some_and(|m| is_displayed(&self.backend, m.outline)),
            surface_visible: layer_shown(RepresentationLayer::Surface),
            wireframe_visible: layer_shown(RepresentationLayer::Wireframe),
            points_visible: layer_shown(RepresentationLayer::Points),
        }
    }
}
