//! Clipping meshes against convex sets of half-spaces.
//!
//! Triangles are clipped polygon-wise (Sutherland-Hodgman) and fan
//! triangulated; line cells are clipped as segments; bare points are filtered.
//! Source vertices that survive keep their relative order in the output, so
//! clipping against a region that contains the whole mesh is lossless.

use std::collections::HashMap;

use glam::DVec3;

use super::mesh::MeshData;
use super::Plane;

/// Points within this fraction of the mesh's coordinate magnitude of a
/// boundary count as inside it
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Absolute boundary tolerance for `mesh`, never below `BOUNDARY_TOLERANCE`
fn boundary_tolerance(mesh: &MeshData) -> f64 {
    let magnitude = mesh
        .bounds()
        .map_or(1.0, |b| b.min.abs().max(b.max.abs()).max_element());
    BOUNDARY_TOLERANCE * magnitude.max(1.0)
}

#[derive(Clone, Copy, Debug)]
struct ClipVertex {
    pos: DVec3,
    /// Index in the source mesh, `None` for vertices created on a boundary
    source: Option<u32>,
}

fn inside(planes: &[Plane], p: DVec3, tolerance: f64) -> bool {
    planes
        .iter()
        .all(|pl| pl.signed_distance(p) <= tolerance)
}

/// Clip a convex polygon against one plane, keeping the non-positive side
fn clip_polygon(polygon: &[ClipVertex], plane: &Plane, tolerance: f64) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, cur) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let dc = plane.signed_distance(cur.pos);
        let dn = plane.signed_distance(next.pos);
        let cur_in = dc <= tolerance;
        let next_in = dn <= tolerance;

        if cur_in {
            out.push(*cur);
        }
        if cur_in != next_in {
            let t = dc / (dc - dn);
            out.push(ClipVertex {
                pos: cur.pos + (next.pos - cur.pos) * t,
                source: None,
            });
        }
    }
    out
}

/// Clip a segment against a convex region, returning the retained part
fn clip_segment(
    mut a: ClipVertex,
    mut b: ClipVertex,
    planes: &[Plane],
    tolerance: f64,
) -> Option<(ClipVertex, ClipVertex)> {
    for plane in planes {
        let da = plane.signed_distance(a.pos);
        let db = plane.signed_distance(b.pos);
        match (da <= tolerance, db <= tolerance) {
            (true, true) => {}
            (false, false) => return None,
            (a_in, _) => {
                let t = da / (da - db);
                let cut = ClipVertex {
                    pos: a.pos + (b.pos - a.pos) * t,
                    source: None,
                };
                if a_in {
                    b = cut;
                } else {
                    a = cut;
                }
            }
        }
    }
    Some((a, b))
}

/// Accumulates output vertices, mapping surviving source vertices once
struct ClipBuilder {
    positions: Vec<DVec3>,
    remap: HashMap<u32, u32>,
    triangles: Vec<[u32; 3]>,
    lines: Vec<[u32; 2]>,
    tolerance: f64,
}

impl ClipBuilder {
    fn new(mesh: &MeshData, tolerance: f64, keep: impl Fn(DVec3) -> bool) -> Self {
        let mut positions = Vec::new();
        let mut remap = HashMap::new();
        for (i, p) in mesh.positions.iter().enumerate() {
            if keep(*p) {
                remap.insert(i as u32, positions.len() as u32);
                positions.push(*p);
            }
        }
        Self {
            positions,
            remap,
            triangles: Vec::new(),
            lines: Vec::new(),
            tolerance,
        }
    }

    fn index(&mut self, v: ClipVertex) -> u32 {
        if let Some(src) = v.source {
            if let Some(&idx) = self.remap.get(&src) {
                return idx;
            }
        }
        let idx = self.positions.len() as u32;
        self.positions.push(v.pos);
        if let Some(src) = v.source {
            self.remap.insert(src, idx);
        }
        idx
    }

    /// Clip every cell of `mesh` against one convex region
    fn add_region(&mut self, mesh: &MeshData, region: &[Plane]) {
        for tri in &mesh.triangles {
            let mut polygon: Vec<ClipVertex> = tri
                .iter()
                .map(|&i| ClipVertex {
                    pos: mesh.positions[i as usize],
                    source: Some(i),
                })
                .collect();
            for plane in region {
                polygon = clip_polygon(&polygon, plane, self.tolerance);
                if polygon.len() < 3 {
                    break;
                }
            }
            if polygon.len() < 3 {
                continue;
            }
            let indices: Vec<u32> = polygon.into_iter().map(|v| self.index(v)).collect();
            for k in 1..indices.len() - 1 {
                self.triangles.push([indices[0], indices[k], indices[k + 1]]);
            }
        }

        for [i0, i1] in &mesh.lines {
            let a = ClipVertex {
                pos: mesh.positions[*i0 as usize],
                source: Some(*i0),
            };
            let b = ClipVertex {
                pos: mesh.positions[*i1 as usize],
                source: Some(*i1),
            };
            if let Some((a, b)) = clip_segment(a, b, region, self.tolerance) {
                let ia = self.index(a);
                let ib = self.index(b);
                self.lines.push([ia, ib]);
            }
        }
    }

    fn finish(self) -> MeshData {
        MeshData {
            positions: self.positions,
            triangles: self.triangles,
            lines: self.lines,
        }
    }
}

/// Clip `mesh` against the box described by `planes` (outward normals).
///
/// With `inside_out` the interior of the box is retained; otherwise the
/// exterior. The exterior of a convex region is split into disjoint convex
/// pieces: outside plane `i` and inside every plane before it.
pub fn clip_mesh(mesh: &MeshData, planes: &[Plane], inside_out: bool) -> MeshData {
    let tolerance = boundary_tolerance(mesh);
    if inside_out {
        let mut builder = ClipBuilder::new(mesh, tolerance, |p| inside(planes, p, tolerance));
        builder.add_region(mesh, planes);
        return builder.finish();
    }

    let mut builder = ClipBuilder::new(mesh, tolerance, |p| !inside(planes, p, tolerance));
    for i in 0..planes.len() {
        let mut region = Vec::with_capacity(i + 1);
        region.push(planes[i].flipped());
        region.extend_from_slice(&planes[..i]);
        builder.add_region(mesh, &region);
    }
    builder.finish()
}
