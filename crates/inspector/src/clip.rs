//! Box clipping: keeps a clipped copy of the current mesh in step with an
//! interactive box handle and swaps it in for the original drawable.

use crate::error::{InspectError, Result};
use crate::geometry::Plane;
use crate::handle::{BoxHandle, HandleId, OrientedBox};
use crate::scene::{Backend, DrawableId, DrawableSpec, MeshId, MeshRepresentation, RenderStyle, Rgb};

/// Mesh being clipped and the drawables that currently display it
#[derive(Debug, Clone, Copy)]
struct ClipSource {
    mesh: MeshId,
    original: MeshRepresentation,
    color: Rgb,
}

pub struct ClipRegionController {
    handle_id: HandleId,
    handle: Box<dyn BoxHandle>,
    source: Option<ClipSource>,
    region: Option<[Plane; 6]>,
    /// Handle revision the region was last read at
    synced_revision: Option<u64>,
    clipped_mesh: Option<MeshId>,
    clipped_drawable: Option<DrawableId>,
    enabled: bool,
}

impl ClipRegionController {
    pub fn new(handle_id: HandleId, handle: Box<dyn BoxHandle>) -> Self {
        Self {
            handle_id,
            handle,
            source: None,
            region: None,
            synced_revision: None,
            clipped_mesh: None,
            clipped_drawable: None,
            enabled: false,
        }
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    pub fn region(&self) -> Option<&[Plane; 6]> {
        self.region.as_ref()
    }

    pub fn current_box(&self) -> OrientedBox {
        self.handle.current_box()
    }

    pub fn clipped_mesh(&self) -> Option<MeshId> {
        self.clipped_mesh
    }

    pub fn clipped_drawable(&self) -> Option<DrawableId> {
        self.clipped_drawable
    }

    /// Track a new mesh: fit the box to its bounds and clip right away
    pub fn bind_mesh<B: Backend>(
        &mut self,
        backend: &mut B,
        mesh: MeshId,
        original: MeshRepresentation,
        color: Rgb,
    ) -> Result<()> {
        let bounds = backend.mesh_bounds(mesh).ok_or(InspectError::UnknownMesh)?;

        let was_enabled = self.enabled;
        if was_enabled {
            self.set_enabled(backend, false);
        }

        self.source = Some(ClipSource {
            mesh,
            original,
            color,
        });
        self.handle.place(&bounds);
        self.sync_region();
        self.recompute(backend)?;

        if was_enabled {
            self.set_enabled(backend, true);
        }
        Ok(())
    }

    /// Forget the tracked mesh and release the clipped copy
    pub fn unbind<B: Backend>(&mut self, backend: &mut B) {
        if self.enabled {
            self.set_enabled(backend, false);
        }
        if let Some(id) = self.clipped_drawable.take() {
            backend.destroy_drawable(id);
        }
        if let Some(mesh) = self.clipped_mesh.take() {
            backend.release_mesh(mesh);
        }
        self.source = None;
    }

    /// Reshape the box as a user drag would; the change still has to be delivered
    pub fn reshape_handle(&mut self, shape: OrientedBox) {
        self.handle.reshape(shape);
    }

    /// Re-read the box and recompute the clipped mesh.
    ///
    /// Events raised by this controller's own placement of the handle are
    /// recognised by revision and dropped, so a recompute never feeds back
    /// into another one.
    pub fn on_handle_changed<B: Backend>(&mut self, backend: &mut B) -> Result<bool> {
        if self.source.is_none() {
            tracing::debug!("Clip handle changed with no mesh bound");
            return Ok(false);
        }
        if self.synced_revision == Some(self.handle.revision()) {
            tracing::debug!("Clip handle event already applied, skipping");
            return Ok(false);
        }
        self.sync_region();
        self.recompute(backend)?;
        Ok(true)
    }

    /// Swap between the original and the clipped drawable
    pub fn set_enabled<B: Backend>(&mut self, backend: &mut B, on: bool) {
        let (Some(source), Some(clipped)) = (self.source, self.clipped_drawable) else {
            tracing::debug!("Clip toggle ignored: no mesh bound");
            return;
        };

        self.handle.set_enabled(on);
        let primary = source.original.primary();
        if on {
            backend.remove_drawable(primary);
            backend.add_drawable(clipped);
        } else {
            backend.remove_drawable(clipped);
            backend.add_drawable(primary);
        }
        self.enabled = on;
        tracing::info!("Box clipping {}", if on { "enabled" } else { "disabled" });
        backend.request_redraw();
    }

    fn sync_region(&mut self) {
        self.region = Some(self.handle.current_halfspaces());
        self.synced_revision = Some(self.handle.revision());
    }

    fn recompute<B: Backend>(&mut self, backend: &mut B) -> Result<()> {
        let (Some(source), Some(region)) = (self.source, self.region) else {
            return Ok(());
        };

        let clipped = backend.compute_clip(source.mesh, &region, true)?;
        if let Some(old) = self.clipped_mesh.replace(clipped) {
            backend.release_mesh(old);
        }

        let style = match source.original {
            MeshRepresentation::Points { .. } => RenderStyle::Points,
            MeshRepresentation::SurfaceWireframePoints { .. } => RenderStyle::Surface,
        };
        let spec = DrawableSpec::Mesh {
            mesh: clipped,
            style,
            color: source.color,
            line_width: 1.0,
        };
        let reused = self
            .clipped_drawable
            .is_some_and(|id| backend.update_drawable(id, spec.clone()));
        if !reused {
            self.clipped_drawable = Some(backend.create_drawable(spec));
        }

        tracing::info!(
            "Clip region recomputed: {} -> {} points",
            backend.point_count(source.mesh).unwrap_or(0),
            backend.point_count(clipped).unwrap_or(0)
        );
        if self.enabled {
            backend.request_redraw();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh;
    use crate::handle::BoxWidget;
    use crate::scene::{GeometryEngine, MemoryScene, Scene};

    fn setup() -> (MemoryScene, ClipRegionController, MeshId, MeshRepresentation) {
        let mut scene = MemoryScene::default();
        let mesh = scene.insert_mesh(mesh::point_lattice(5, 2.0));
        let points = scene.create_drawable(DrawableSpec::Mesh {
            mesh,
            style: RenderStyle::Points,
            color: [1.0; 3],
            line_width: 1.0,
        });
        scene.add_drawable(points);
        let ctrl = ClipRegionController::new(HandleId(0), Box::new(BoxWidget::new()));
        (scene, ctrl, mesh, MeshRepresentation::Points { points })
    }

    #[test]
    fn test_enable_without_mesh_is_noop() {
        let mut scene = MemoryScene::default();
        let mut ctrl = ClipRegionController::new(HandleId(0), Box::new(BoxWidget::new()));
        ctrl.set_enabled(&mut scene, true);
        assert!(!ctrl.is_enabled());
        assert!(scene.render_list().is_empty());
    }

    #[test]
    fn test_bind_clips_immediately_and_keeps_all_points() {
        let (mut scene, mut ctrl, mesh, rep) = setup();
        ctrl.bind_mesh(&mut scene, mesh, rep, [1.0; 3]).unwrap();
        let clipped = ctrl.clipped_mesh().unwrap();
        assert_eq!(scene.point_count(clipped), scene.point_count(mesh));
    }

    #[test]
    fn test_enable_swaps_drawables() {
        let (mut scene, mut ctrl, mesh, rep) = setup();
        ctrl.bind_mesh(&mut scene, mesh, rep, [1.0; 3]).unwrap();
        let clipped = ctrl.clipped_drawable().unwrap();

        ctrl.set_enabled(&mut scene, true);
        assert!(!scene.contains_drawable(rep.primary()));
        assert!(scene.contains_drawable(clipped));

        ctrl.set_enabled(&mut scene, false);
        assert!(scene.contains_drawable(rep.primary()));
        assert!(!scene.contains_drawable(clipped));
    }

    #[test]
    fn test_handle_change_recomputes_inside() {
        let (mut scene, mut ctrl, mesh, rep) = setup();
        ctrl.bind_mesh(&mut scene, mesh, rep, [1.0; 3]).unwrap();
        ctrl.reshape_handle(OrientedBox {
            center: [0.0; 3],
            half_extents: [1.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
        });
        assert!(ctrl.on_handle_changed(&mut scene).unwrap());
        let clipped = ctrl.clipped_mesh().unwrap();
        assert_eq!(scene.point_count(clipped), Some(27));
        // Old clipped mesh was released
        assert_eq!(scene.mesh_count(), 2);
    }

    #[test]
    fn test_own_placement_event_is_dropped() {
        let (mut scene, mut ctrl, mesh, rep) = setup();
        ctrl.bind_mesh(&mut scene, mesh, rep, [1.0; 3]).unwrap();
        let before = ctrl.clipped_mesh();
        assert!(!ctrl.on_handle_changed(&mut scene).unwrap());
        assert_eq!(ctrl.clipped_mesh(), before);
    }
}
