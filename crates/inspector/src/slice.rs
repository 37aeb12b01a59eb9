//! Axis-aligned plane sections through the current mesh.

use glam::DVec3;
use shared::SliceAxis;

use crate::error::{InspectError, Result};
use crate::geometry::Plane;
use crate::scene::{Backend, DrawableId, DrawableSpec, MeshId, MeshRepresentation, RenderStyle};
use crate::settings::SliceSettings;

#[derive(Debug, Default)]
pub struct SliceController {
    style: SliceSettings,
    mesh: Option<MeshId>,
    original: Option<MeshRepresentation>,
    plane: Option<Plane>,
    axis: Option<SliceAxis>,
    slice_mesh: Option<MeshId>,
    slice_drawable: Option<DrawableId>,
    visible: bool,
}

impl SliceController {
    pub fn new(style: SliceSettings) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Source for future slices; visibility is left alone
    pub fn update_mesh(&mut self, mesh: MeshId) {
        self.mesh = Some(mesh);
    }

    /// Drawables hidden while a slice is shown
    pub fn set_original(&mut self, original: MeshRepresentation) {
        self.original = Some(original);
    }

    pub fn plane(&self) -> Option<Plane> {
        self.plane
    }

    pub fn axis(&self) -> Option<SliceAxis> {
        self.axis
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn slice_mesh(&self) -> Option<MeshId> {
        self.slice_mesh
    }

    pub fn slice_drawable(&self) -> Option<DrawableId> {
        self.slice_drawable
    }

    /// Cut the mesh through its bounding-box centre, perpendicular to `axis`
    pub fn show_slice<B: Backend>(&mut self, backend: &mut B, axis: SliceAxis) -> Result<()> {
        let mesh = self
            .mesh
            .ok_or(InspectError::InvalidState("no mesh bound for slicing"))?;
        let bounds = backend.mesh_bounds(mesh).ok_or(InspectError::UnknownMesh)?;
        tracing::info!("Slice source bounds: {:?}", bounds.to_array());

        let origin = bounds.center();
        let normal = DVec3::from_array(axis.normal());
        let cut = backend.compute_slice(mesh, origin, normal)?;
        if let Some(old) = self.slice_mesh.replace(cut) {
            backend.release_mesh(old);
        }
        tracing::info!(
            "Slice along {:?} at {:?}: {} points",
            axis,
            origin.to_array(),
            backend.point_count(cut).unwrap_or(0)
        );

        let style = match self.original {
            Some(MeshRepresentation::Points { .. }) => RenderStyle::Points,
            _ => RenderStyle::Lines,
        };
        let spec = DrawableSpec::Mesh {
            mesh: cut,
            style,
            color: self.style.color,
            line_width: self.style.line_width,
        };
        let reused = self
            .slice_drawable
            .is_some_and(|id| backend.update_drawable(id, spec.clone()));
        if !reused {
            self.slice_drawable = Some(backend.create_drawable(spec));
        }

        if let Some(original) = self.original {
            backend.set_visible(original.primary(), false);
        }
        if let Some(id) = self.slice_drawable {
            if backend.contains_drawable(id) {
                tracing::debug!("Slice drawable already in scene");
            } else {
                backend.add_drawable(id);
            }
        }

        self.plane = Some(Plane::new(origin, normal));
        self.axis = Some(axis);
        self.visible = true;
        backend.request_redraw();
        Ok(())
    }

    /// Restore the original drawable and take the slice out of the scene
    pub fn hide_slice<B: Backend>(&mut self, backend: &mut B) {
        if let Some(original) = self.original {
            backend.set_visible(original.primary(), true);
        }
        if let Some(id) = self.slice_drawable {
            if backend.contains_drawable(id) {
                backend.remove_drawable(id);
            }
        }
        self.visible = false;
        backend.request_redraw();
    }

    /// Drop the slice drawable and mesh along with the bound source
    pub fn unbind<B: Backend>(&mut self, backend: &mut B) {
        if let Some(id) = self.slice_drawable.take() {
            backend.destroy_drawable(id);
        }
        if let Some(mesh) = self.slice_mesh.take() {
            backend.release_mesh(mesh);
        }
        self.mesh = None;
        self.original = None;
        self.visible = false;
    }
}
