use glam::{DVec2, DVec3};
use slotmap::SlotMap;

use super::{
    ArcBallCamera, DrawableId, DrawableSpec, GeometryEngine, MeshId, RenderStyle, Scene, Viewport,
};
use crate::error::{InspectError, Result};
use crate::geometry::{clip, picking, section, Aabb, MeshData, Plane};
use crate::settings::InspectorSettings;

#[derive(Clone, Debug)]
struct DrawableEntry {
    spec: DrawableSpec,
    visible: bool,
}

/// In-memory scene and geometry engine.
///
/// Drawables and meshes live in slot-map arenas; the render list keeps
/// insertion order so repeated insertion would be observable.
pub struct MemoryScene {
    meshes: SlotMap<MeshId, MeshData>,
    drawables: SlotMap<DrawableId, DrawableEntry>,
    render_list: Vec<DrawableId>,
    camera: ArcBallCamera,
    viewport: Viewport,
    /// Screen-space radius within which a vertex counts as picked
    pick_tolerance_px: f64,
    /// Half-thickness of a point-cloud slice, as a fraction of the bounds diagonal
    point_slab: f64,
    redraws: u64,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::from_settings(&InspectorSettings::default())
    }
}

impl MemoryScene {
    pub fn from_settings(settings: &InspectorSettings) -> Self {
        Self {
            meshes: SlotMap::with_key(),
            drawables: SlotMap::with_key(),
            render_list: Vec::new(),
            camera: ArcBallCamera::new(),
            viewport: Viewport {
                width: settings.viewport.width,
                height: settings.viewport.height,
            },
            pick_tolerance_px: settings.viewport.pick_tolerance_px,
            point_slab: settings.slice.point_slab,
            redraws: 0,
        }
    }

    // ── Inspection ─────────────────────────────────────────────

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&DrawableSpec> {
        self.drawables.get(id).map(|e| &e.spec)
    }

    /// Mesh shown by a mesh drawable
    pub fn drawable_mesh(&self, id: DrawableId) -> Option<&MeshData> {
        self.drawable(id)?.mesh().and_then(|m| self.meshes.get(m))
    }

    pub fn render_list(&self) -> &[DrawableId] {
        &self.render_list
    }

    /// Number of times `id` appears in the render list
    pub fn occurrences(&self, id: DrawableId) -> usize {
        self.render_list.iter().filter(|d| **d == id).count()
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Marker spheres and edge segments currently in the render list
    pub fn marker_count(&self) -> usize {
        self.render_list
            .iter()
            .filter_map(|id| self.drawables.get(*id))
            .filter(|e| {
                matches!(
                    e.spec,
                    DrawableSpec::Marker { .. } | DrawableSpec::Segment { .. }
                )
            })
            .count()
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Screen position of a world point under the current camera
    pub fn project(&self, point: DVec3) -> Option<DVec2> {
        self.camera.project(point, &self.viewport)
    }

    fn pickable(&self) -> impl Iterator<Item = (RenderStyle, &MeshData)> + '_ {
        self.render_list.iter().filter_map(move |id| {
            let entry = self.drawables.get(*id)?;
            if !entry.visible {
                return None;
            }
            match &entry.spec {
                DrawableSpec::Mesh { mesh, style, .. } => {
                    Some((*style, self.meshes.get(*mesh)?))
                }
                _ => None,
            }
        })
    }
}

impl Scene for MemoryScene {
    fn create_drawable(&mut self, spec: DrawableSpec) -> DrawableId {
        self.drawables.insert(DrawableEntry {
            spec,
            visible: true,
        })
    }

    fn update_drawable(&mut self, id: DrawableId, spec: DrawableSpec) -> bool {
        match self.drawables.get_mut(id) {
            Some(entry) => {
                entry.spec = spec;
                true
            }
            None => false,
        }
    }

    fn destroy_drawable(&mut self, id: DrawableId) {
        self.render_list.retain(|d| *d != id);
        self.drawables.remove(id);
    }

    fn add_drawable(&mut self, id: DrawableId) {
        if self.drawables.contains_key(id) && !self.render_list.contains(&id) {
            self.render_list.push(id);
        }
    }

    fn remove_drawable(&mut self, id: DrawableId) {
        self.render_list.retain(|d| *d != id);
    }

    fn contains_drawable(&self, id: DrawableId) -> bool {
        self.render_list.contains(&id)
    }

    fn set_visible(&mut self, id: DrawableId, visible: bool) {
        if let Some(entry) = self.drawables.get_mut(id) {
            entry.visible = visible;
        }
    }

    fn is_visible(&self, id: DrawableId) -> bool {
        self.drawables.get(id).is_some_and(|e| e.visible)
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn pick_surface_point(&self, screen_x: f64, screen_y: f64) -> Option<DVec3> {
        let ray = self
            .camera
            .screen_ray(DVec2::new(screen_x, screen_y), &self.viewport);
        if ray.direction == DVec3::ZERO {
            return None;
        }

        let mut best: Option<(f64, DVec3)> = None;
        for (style, mesh) in self.pickable() {
            let hit = match style {
                RenderStyle::Surface | RenderStyle::Wireframe => {
                    picking::pick_triangle(&ray, mesh).map(|t| (t, ray.at(t)))
                }
                RenderStyle::Points => picking::pick_vertex(&ray, mesh, |t| {
                    self.pick_tolerance_px * self.camera.world_per_pixel_at(t, &self.viewport)
                }),
                RenderStyle::Lines => None,
            };
            if let Some((t, p)) = hit {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, p));
                }
            }
        }
        best.map(|(_, p)| p)
    }

    fn camera(&self) -> &ArcBallCamera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut ArcBallCamera {
        &mut self.camera
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl GeometryEngine for MemoryScene {
    fn insert_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.insert(mesh)
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(mesh);
    }

    fn mesh_bounds(&self, mesh: MeshId) -> Option<Aabb> {
        self.meshes.get(mesh)?.bounds()
    }

    fn point_count(&self, mesh: MeshId) -> Option<usize> {
        self.meshes.get(mesh).map(MeshData::point_count)
    }

    fn compute_clip(&mut self, mesh: MeshId, halfspaces: &[Plane], inside_out: bool) -> Result<MeshId> {
        let source = self.meshes.get(mesh).ok_or(InspectError::UnknownMesh)?;
        let clipped = clip::clip_mesh(source, halfspaces, inside_out);
        Ok(self.meshes.insert(clipped))
    }

    fn compute_slice(&mut self, mesh: MeshId, origin: DVec3, normal: DVec3) -> Result<MeshId> {
        let source = self.meshes.get(mesh).ok_or(InspectError::UnknownMesh)?;
        let plane = Plane::new(origin, normal);
        let cut = if source.has_surface() {
            section::section_surface(source, &plane)
        } else {
            let diagonal = source.bounds().map_or(0.0, |b| b.diagonal());
            section::section_points(source, &plane, self.point_slab * diagonal)
        };
        Ok(self.meshes.insert(cut))
    }
}
