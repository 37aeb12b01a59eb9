//! Boundary to the rendering collaborator: drawables, picking, and the
//! geometry filters that derive clipped and sliced meshes.
//!
//! The scene owns every drawable and mesh; controllers only hold the
//! arena keys handed out here.

pub mod camera;
pub mod memory;

use glam::DVec3;
use shared::RepresentationLayer;
use slotmap::new_key_type;

use crate::error::Result;
use crate::geometry::{Aabb, MeshData, Plane};

pub use camera::{ArcBallCamera, Viewport};
pub use memory::MemoryScene;

new_key_type! {
    /// Drawable object owned by the scene
    pub struct DrawableId;
    /// Mesh registered with the geometry engine
    pub struct MeshId;
}

/// Linear RGB colour
pub type Rgb = [f32; 3];

/// How a mesh drawable is rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStyle {
    Surface,
    Wireframe,
    Points,
    /// Line cells, used for section curves and outlines
    Lines,
}

/// Description of a drawable; the scene builds the render resources
#[derive(Clone, Debug, PartialEq)]
pub enum DrawableSpec {
    Mesh {
        mesh: MeshId,
        style: RenderStyle,
        color: Rgb,
        line_width: f64,
    },
    /// Sphere highlighting a picked point
    Marker { center: DVec3, radius: f64, color: Rgb },
    /// Straight edge between two picked points
    Segment {
        from: DVec3,
        to: DVec3,
        width: f64,
        color: Rgb,
    },
}

impl DrawableSpec {
    pub fn mesh(&self) -> Option<MeshId> {
        match self {
            DrawableSpec::Mesh { mesh, .. } => Some(*mesh),
            _ => None,
        }
    }
}

/// The drawables that together display one loaded mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshRepresentation {
    /// Bare point cloud, a single drawable
    Points { points: DrawableId },
    /// Triangulated surface with wireframe and vertex overlays
    SurfaceWireframePoints {
        surface: DrawableId,
        wireframe: DrawableId,
        points: DrawableId,
    },
}

impl MeshRepresentation {
    /// Drawable swapped out when clipping or slicing
    pub fn primary(&self) -> DrawableId {
        match self {
            MeshRepresentation::Points { points } => *points,
            MeshRepresentation::SurfaceWireframePoints { surface, .. } => *surface,
        }
    }

    /// Overlays shown next to the primary
    pub fn companions(&self) -> Vec<DrawableId> {
        match self {
            MeshRepresentation::Points { .. } => Vec::new(),
            MeshRepresentation::SurfaceWireframePoints {
                wireframe, points, ..
            } => vec![*wireframe, *points],
        }
    }

    pub fn drawables(&self) -> Vec<DrawableId> {
        let mut all = vec![self.primary()];
        all.extend(self.companions());
        all
    }

    /// Drawable showing `layer`, if this representation has one
    pub fn layer(&self, layer: RepresentationLayer) -> Option<DrawableId> {
        match (self, layer) {
            (MeshRepresentation::Points { points }, RepresentationLayer::Points) => Some(*points),
            (MeshRepresentation::Points { .. }, _) => None,
            (MeshRepresentation::SurfaceWireframePoints { surface, .. }, RepresentationLayer::Surface) => {
                Some(*surface)
            }
            (MeshRepresentation::SurfaceWireframePoints { wireframe, .. }, RepresentationLayer::Wireframe) => {
                Some(*wireframe)
            }
            (MeshRepresentation::SurfaceWireframePoints { points, .. }, RepresentationLayer::Points) => {
                Some(*points)
            }
        }
    }

    /// Layer the primary drawable shows
    pub fn primary_layer(&self) -> RepresentationLayer {
        match self {
            MeshRepresentation::Points { .. } => RepresentationLayer::Points,
            MeshRepresentation::SurfaceWireframePoints { .. } => RepresentationLayer::Surface,
        }
    }
}

/// Scene graph and picking
pub trait Scene {
    fn create_drawable(&mut self, spec: DrawableSpec) -> DrawableId;
    /// Replace the description of an existing drawable. Returns `false` if it is gone.
    fn update_drawable(&mut self, id: DrawableId, spec: DrawableSpec) -> bool;
    /// Drop the drawable entirely; unknown ids are ignored
    fn destroy_drawable(&mut self, id: DrawableId);

    /// Insert into the render list (no-op if already present)
    fn add_drawable(&mut self, id: DrawableId);
    /// Take out of the render list; unknown or absent ids are ignored
    fn remove_drawable(&mut self, id: DrawableId);
    fn contains_drawable(&self, id: DrawableId) -> bool;

    fn set_visible(&mut self, id: DrawableId, visible: bool);
    fn is_visible(&self, id: DrawableId) -> bool;

    fn request_redraw(&mut self);

    /// Resolve a screen position to a point on visible geometry
    fn pick_surface_point(&self, screen_x: f64, screen_y: f64) -> Option<DVec3>;

    fn camera(&self) -> &ArcBallCamera;
    fn camera_mut(&mut self) -> &mut ArcBallCamera;
    fn viewport(&self) -> Viewport;
}

/// Mesh storage and the derived-mesh filters
pub trait GeometryEngine {
    fn insert_mesh(&mut self, mesh: MeshData) -> MeshId;
    fn release_mesh(&mut self, mesh: MeshId);

    fn mesh_bounds(&self, mesh: MeshId) -> Option<Aabb>;
    fn point_count(&self, mesh: MeshId) -> Option<usize>;

    /// Clip against half-spaces with outward normals; `inside_out` keeps the interior
    fn compute_clip(&mut self, mesh: MeshId, halfspaces: &[Plane], inside_out: bool) -> Result<MeshId>;
    /// Intersection of the mesh with the plane through `origin`
    fn compute_slice(&mut self, mesh: MeshId, origin: DVec3, normal: DVec3) -> Result<MeshId>;
}

/// Everything the inspector needs from its rendering collaborator
pub trait Backend: Scene + GeometryEngine {}

impl<T: Scene + GeometryEngine> Backend for T {}

/// Shown only when it is in the render list and flagged visible
pub fn is_displayed<S: Scene + ?Sized>(scene: &S, id: DrawableId) -> bool {
    scene.contains_drawable(id) && scene.is_visible(id)
}
