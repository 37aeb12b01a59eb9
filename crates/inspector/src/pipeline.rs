//! Model pipeline: turns a loaded mesh into the processed mesh and the
//! drawables that display it.

use glam::DVec3;
use shared::MeshKind;

use crate::error::{InspectError, Result};
use crate::geometry::{mesh, MeshData};
use crate::scene::{Backend, DrawableId, DrawableSpec, MeshId, MeshRepresentation, RenderStyle};
use crate::settings::ViewportSettings;

const WIREFRAME_COLOR: [f32; 3] = [0.2, 0.2, 0.2];

/// Everything created in the scene for one loaded mesh
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Mesh as loaded, before centring and stretching
    pub source: MeshData,
    pub kind: MeshKind,
    pub z_scale: f64,
    /// Processed mesh the controllers operate on
    pub mesh: MeshId,
    pub representation: MeshRepresentation,
    pub outline: DrawableId,
    outline_mesh: MeshId,
}

/// Centre the mesh's bounding box on the origin, then stretch along Z
pub fn process(source: &MeshData, z_scale: f64) -> MeshData {
    let center = source.bounds().map_or(DVec3::ZERO, |b| b.center());
    let scale = DVec3::new(1.0, 1.0, z_scale);
    source.map_positions(|p| (p - center) * scale)
}

/// Register the processed mesh and create its drawables, all added to the scene
pub fn build<B: Backend>(
    backend: &mut B,
    source: MeshData,
    kind: MeshKind,
    z_scale: f64,
    style: &ViewportSettings,
) -> Result<LoadedModel> {
    if !z_scale.is_finite() || z_scale <= 0.0 {
        return Err(InspectError::InvalidMesh(format!(
            "z scale must be positive, got {z_scale}"
        )));
    }
    if kind == MeshKind::Surface && !source.has_surface() {
        return Err(InspectError::InvalidMesh(
            "surface mesh has no triangles".into(),
        ));
    }

    let processed = process(&source, z_scale);
    let bounds = processed
        .bounds()
        .ok_or_else(|| InspectError::InvalidMesh("mesh has no vertices".into()))?;
    let outline_data = mesh::box_outline(&bounds);
    let mesh = backend.insert_mesh(processed);

    let mut layer = |style: RenderStyle, color: [f32; 3]| {
        let id = backend.create_drawable(DrawableSpec::Mesh {
            mesh,
            style,
            color,
            line_width: 1.0,
        });
        backend.add_drawable(id);
        id
    };

    let representation = match kind {
        MeshKind::PointCloud => MeshRepresentation::Points {
            points: layer(RenderStyle::Points, style.mesh_color),
        },
        MeshKind::Surface => MeshRepresentation::SurfaceWireframePoints {
            surface: layer(RenderStyle::Surface, style.mesh_color),
            wireframe: layer(RenderStyle::Wireframe, WIREFRAME_COLOR),
            points: layer(RenderStyle::Points, style.mesh_color),
        },
    };

    let outline_mesh = backend.insert_mesh(outline_data);
    let outline = backend.create_drawable(DrawableSpec::Mesh {
        mesh: outline_mesh,
        style: RenderStyle::Lines,
        color: style.outline_color,
        line_width: 1.0,
    });
    backend.add_drawable(outline);

    tracing::info!(
        "Model built: {:?}, {} points, {} triangles, z scale {}",
        kind,
        source.point_count(),
        source.triangle_count(),
        z_scale
    );

    Ok(LoadedModel {
        source,
        kind,
        z_scale,
        mesh,
        representation,
        outline,
        outline_mesh,
    })
}

/// Remove the model's drawables and meshes from the scene
pub fn teardown<B: Backend>(backend: &mut B, model: &LoadedModel) {
    for id in model.representation.drawables() {
        backend.destroy_drawable(id);
    }
    backend.destroy_drawable(model.outline);
    backend.release_mesh(model.mesh);
    backend.release_mesh(model.outline_mesh);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GeometryEngine, MemoryScene, Scene};

    #[test]
    fn test_process_centres_and_stretches() {
        let cube = mesh::cube(2.0, 2.0, 2.0).map_positions(|p| p + DVec3::new(10.0, 20.0, 30.0));
        let out = process(&cube, 3.0);
        let b = out.bounds().unwrap();
        assert_eq!(b.to_array(), [-1.0, 1.0, -1.0, 1.0, -3.0, 3.0]);
    }

    #[test]
    fn test_build_surface_creates_three_layers_and_outline() {
        let mut scene = MemoryScene::default();
        let model = build(
            &mut scene,
            mesh::cube(2.0, 2.0, 2.0),
            MeshKind::Surface,
            1.0,
            &ViewportSettings::default(),
        )
        .unwrap();
        assert_eq!(model.representation.drawables().len(), 3);
        assert_eq!(scene.render_list().len(), 4);
        assert!(scene.contains_drawable(model.outline));

        teardown(&mut scene, &model);
        assert_eq!(scene.drawable_count(), 0);
        assert_eq!(scene.mesh_count(), 0);
    }

    #[test]
    fn test_build_rejects_bad_scale_and_missing_triangles() {
        let mut scene = MemoryScene::default();
        let style = ViewportSettings::default();
        assert!(build(&mut scene, mesh::cube(1.0, 1.0, 1.0), MeshKind::Surface, 0.0, &style).is_err());
        assert!(build(&mut scene, mesh::point_lattice(2, 1.0), MeshKind::Surface, 1.0, &style).is_err());
        assert_eq!(scene.mesh_count(), 0);
    }

    #[test]
    fn test_point_cloud_has_single_drawable() {
        let mut scene = MemoryScene::default();
        let model = build(
            &mut scene,
            mesh::point_lattice(3, 1.0),
            MeshKind::PointCloud,
            2.0,
            &ViewportSettings::default(),
        )
        .unwrap();
        assert!(matches!(model.representation, MeshRepresentation::Points { .. }));
        assert_eq!(scene.mesh_bounds(model.mesh).unwrap().to_array()[5], 2.0);
    }
}
