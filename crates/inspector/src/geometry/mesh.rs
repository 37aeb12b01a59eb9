use glam::DVec3;
use shared::MeshDescription;

use super::picking::Aabb;
use crate::error::{InspectError, Result};

/// CPU-side mesh: positions plus optional triangle and line cells.
/// A mesh without cells is a point cloud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub lines: Vec<[u32; 2]>,
}

impl MeshData {
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Mesh has surface cells to intersect against
    pub fn has_surface(&self) -> bool {
        !self.triangles.is_empty()
    }

    /// Build from a loader description, rejecting out-of-range indices and
    /// non-finite coordinates.
    pub fn from_description(desc: &MeshDescription) -> Result<Self> {
        if desc.vertices.is_empty() {
            return Err(InspectError::InvalidMesh("mesh has no vertices".into()));
        }
        let positions: Vec<DVec3> = desc.vertices.iter().map(|v| DVec3::from_array(*v)).collect();
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(InspectError::InvalidMesh(format!(
                "vertex {i} has a non-finite coordinate"
            )));
        }
        let count = positions.len() as u32;
        if let Some(t) = desc.triangles.iter().find(|t| t.iter().any(|&i| i >= count)) {
            return Err(InspectError::InvalidMesh(format!(
                "triangle {:?} references a vertex beyond {}",
                t, count
            )));
        }
        Ok(Self {
            positions,
            triangles: desc.triangles.clone(),
            lines: Vec::new(),
        })
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Copy of this mesh with every position mapped through `f`
    pub fn map_positions(&self, f: impl Fn(DVec3) -> DVec3) -> Self {
        Self {
            positions: self.positions.iter().map(|p| f(*p)).collect(),
            triangles: self.triangles.clone(),
            lines: self.lines.clone(),
        }
    }

    /// Corner positions of triangle `idx`
    pub fn triangle(&self, idx: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[idx];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }
}

// ── Primitive generation ─────────────────────────────────────

/// Axis-aligned box surface centred at the origin, 8 shared corners
pub fn cube(w: f64, h: f64, d: f64) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let positions = vec![
        DVec3::new(-hw, -hh, -hd),
        DVec3::new(hw, -hh, -hd),
        DVec3::new(hw, hh, -hd),
        DVec3::new(-hw, hh, -hd),
        DVec3::new(-hw, -hh, hd),
        DVec3::new(hw, -hh, hd),
        DVec3::new(hw, hh, hd),
        DVec3::new(-hw, hh, hd),
    ];

    let triangles = vec![
        // Front (+Z)
        [4, 5, 6],
        [4, 6, 7],
        // Back (-Z)
        [1, 0, 3],
        [1, 3, 2],
        // Right (+X)
        [5, 1, 2],
        [5, 2, 6],
        // Left (-X)
        [0, 4, 7],
        [0, 7, 3],
        // Top (+Y)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (-Y)
        [0, 1, 5],
        [0, 5, 4],
    ];

    MeshData {
        positions,
        triangles,
        lines: Vec::new(),
    }
}

/// Flat square in the XY plane (z = 0), `divisions` cells per side
pub fn plane_xy(size: f64, divisions: u32) -> MeshData {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f64;
    let row = divisions + 1;

    let mut positions = Vec::with_capacity((row * row) as usize);
    for j in 0..row {
        for i in 0..row {
            positions.push(DVec3::new(-half + i as f64 * step, -half + j as f64 * step, 0.0));
        }
    }

    let mut triangles = Vec::with_capacity((divisions * divisions * 2) as usize);
    for j in 0..divisions {
        for i in 0..divisions {
            let i0 = j * row + i;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;
            triangles.push([i0, i1, i3]);
            triangles.push([i0, i3, i2]);
        }
    }

    MeshData {
        positions,
        triangles,
        lines: Vec::new(),
    }
}

pub fn sphere(radius: f64, rings: u32, sectors: u32) -> MeshData {
    let rings = rings.max(2);
    let sectors = sectors.max(3);
    let mut positions = Vec::new();
    let mut triangles = Vec::new();

    for r in 0..=rings {
        let phi = std::f64::consts::PI * r as f64 / rings as f64;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f64::consts::TAU * s as f64 / sectors as f64;
            positions.push(DVec3::new(
                radius * sp * theta.cos(),
                radius * cp,
                radius * sp * theta.sin(),
            ));
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            triangles.push([i0, i2, i1]);
            triangles.push([i1, i2, i3]);
        }
    }

    MeshData {
        positions,
        triangles,
        lines: Vec::new(),
    }
}

/// Regular `n × n × n` lattice of points spanning `[-extent, extent]` on each axis
pub fn point_lattice(n: u32, extent: f64) -> MeshData {
    let n = n.max(2);
    let step = 2.0 * extent / (n - 1) as f64;
    let mut positions = Vec::with_capacity((n * n * n) as usize);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                positions.push(DVec3::new(
                    -extent + i as f64 * step,
                    -extent + j as f64 * step,
                    -extent + k as f64 * step,
                ));
            }
        }
    }
    MeshData {
        positions,
        triangles: Vec::new(),
        lines: Vec::new(),
    }
}

/// The 12 edges of a bounding box as a line mesh
pub fn box_outline(aabb: &Aabb) -> MeshData {
    let positions = aabb.corners().to_vec();
    // Corner order matches `Aabb::corners`: bit 0 = x, bit 1 = y, bit 2 = z
    let lines = vec![
        [0, 1],
        [2, 3],
        [4, 5],
        [6, 7],
        [0, 2],
        [1, 3],
        [4, 6],
        [5, 7],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];
    MeshData {
        positions,
        triangles: Vec::new(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MeshKind;

    #[test]
    fn test_cube_counts() {
        let m = cube(2.0, 2.0, 2.0);
        assert_eq!(m.point_count(), 8);
        assert_eq!(m.triangle_count(), 12);
        let b = m.bounds().unwrap();
        assert_eq!(b.min, DVec3::splat(-1.0));
        assert_eq!(b.max, DVec3::splat(1.0));
    }

    #[test]
    fn test_plane_counts() {
        let m = plane_xy(10.0, 4);
        assert_eq!(m.point_count(), 25);
        assert_eq!(m.triangle_count(), 32);
        assert!(m.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_lattice_counts() {
        let m = point_lattice(3, 5.0);
        assert_eq!(m.point_count(), 27);
        assert!(!m.has_surface());
        let b = m.bounds().unwrap();
        assert_eq!(b.to_array(), [-5.0, 5.0, -5.0, 5.0, -5.0, 5.0]);
    }

    #[test]
    fn test_box_outline_edges_are_axis_aligned() {
        let aabb = Aabb::new(DVec3::splat(-1.0), DVec3::new(2.0, 3.0, 4.0));
        let m = box_outline(&aabb);
        assert_eq!(m.line_count(), 12);
        for [a, b] in &m.lines {
            let d = m.positions[*b as usize] - m.positions[*a as usize];
            let nonzero = [d.x, d.y, d.z].iter().filter(|c| **c != 0.0).count();
            assert_eq!(nonzero, 1);
        }
    }

    #[test]
    fn test_from_description_rejects_bad_index() {
        let desc = MeshDescription {
            kind: MeshKind::Surface,
            vertices: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 3]],
        };
        assert!(matches!(
            MeshData::from_description(&desc),
            Err(InspectError::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_from_description_rejects_nan() {
        let desc = MeshDescription::point_cloud(vec![[0.0, f64::NAN, 0.0]]);
        assert!(MeshData::from_description(&desc).is_err());
    }

    #[test]
    fn test_from_description_rejects_empty() {
        let desc = MeshDescription::point_cloud(Vec::new());
        assert!(MeshData::from_description(&desc).is_err());
    }
}
