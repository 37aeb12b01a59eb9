//! Interactive box handle and the handle-to-controller routing table.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{InspectError, Result};
use crate::geometry::{Aabb, Plane};

/// Opaque token identifying a registered handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u32);

/// Box in world space: centre, half extents along its local axes, orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: [f64; 3],
    pub half_extents: [f64; 3],
    /// Rotation quaternion `[x, y, z, w]`
    #[serde(default = "identity_rotation")]
    pub rotation: [f64; 4],
}

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl OrientedBox {
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center().to_array(),
            half_extents: (aabb.size() * 0.5).to_array(),
            rotation: identity_rotation(),
        }
    }

    fn quat(&self) -> DQuat {
        let q = DQuat::from_array(self.rotation);
        if q.length_squared() > 0.0 {
            q.normalize()
        } else {
            DQuat::IDENTITY
        }
    }

    /// The six bounding planes with outward normals
    pub fn halfspaces(&self) -> [Plane; 6] {
        let q = self.quat();
        let center = DVec3::from_array(self.center);
        let half = DVec3::from_array(self.half_extents).abs();
        let axes = [q * DVec3::X, q * DVec3::Y, q * DVec3::Z];
        std::array::from_fn(|i| {
            let axis = axes[i / 2];
            let extent = half[i / 2];
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            Plane::new(center + axis * (extent * sign), axis * sign)
        })
    }
}

/// Interactive box widget as seen by the clip controller.
///
/// Every placement or reshape bumps `revision`; observers compare revisions
/// to tell their own updates apart from user edits.
pub trait BoxHandle {
    /// Fit the box to `bounds`
    fn place(&mut self, bounds: &Aabb);
    fn reshape(&mut self, shape: OrientedBox);
    fn current_box(&self) -> OrientedBox;
    fn current_halfspaces(&self) -> [Plane; 6] {
        self.current_box().halfspaces()
    }
    fn revision(&self) -> u64;
    fn set_enabled(&mut self, on: bool);
    fn is_enabled(&self) -> bool;
}

/// In-memory box widget
#[derive(Debug, Clone)]
pub struct BoxWidget {
    shape: OrientedBox,
    revision: u64,
    enabled: bool,
}

impl Default for BoxWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxWidget {
    pub fn new() -> Self {
        Self {
            shape: OrientedBox::from_aabb(&Aabb::new(DVec3::splat(-0.5), DVec3::splat(0.5))),
            revision: 0,
            enabled: false,
        }
    }
}

impl BoxHandle for BoxWidget {
    fn place(&mut self, bounds: &Aabb) {
        self.shape = OrientedBox::from_aabb(bounds);
        self.revision += 1;
    }

    fn reshape(&mut self, shape: OrientedBox) {
        self.shape = shape;
        self.revision += 1;
    }

    fn current_box(&self) -> OrientedBox {
        self.shape
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Controller a handle's change events are routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTarget {
    ClipRegion,
}

/// Routing table from handle ids to the controllers that consume them
#[derive(Debug, Default)]
pub struct HandleRegistry {
    targets: Vec<HandleTarget>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: HandleTarget) -> HandleId {
        self.targets.push(target);
        HandleId((self.targets.len() - 1) as u32)
    }

    pub fn target(&self, id: HandleId) -> Result<HandleTarget> {
        self.targets
            .get(id.0 as usize)
            .copied()
            .ok_or(InspectError::UnknownHandle(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_halfspaces_match_bounds() {
        let aabb = Aabb::from_array([-5.0, 5.0, -2.0, 2.0, 0.0, 1.0]);
        let planes = OrientedBox::from_aabb(&aabb).halfspaces();
        let expected = crate::geometry::aabb_halfspaces(&aabb);
        let sample = DVec3::new(0.3, -7.0, 2.5);
        for (got, want) in planes.iter().zip(expected.iter()) {
            assert_eq!(got.normal, want.normal);
            assert!((got.signed_distance(sample) - want.signed_distance(sample)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rotated_box_contains_center() {
        let shape = OrientedBox {
            center: [1.0, 2.0, 3.0],
            half_extents: [1.0, 0.5, 0.25],
            rotation: DQuat::from_rotation_z(0.7).to_array(),
        };
        let planes = shape.halfspaces();
        let c = DVec3::new(1.0, 2.0, 3.0);
        assert!(planes.iter().all(|p| p.signed_distance(c) < 0.0));
        assert!(planes.iter().any(|p| p.signed_distance(c + DVec3::Z) > 0.0));
    }

    #[test]
    fn test_widget_revision_bumps() {
        let mut w = BoxWidget::new();
        let r0 = w.revision();
        w.place(&Aabb::new(DVec3::ZERO, DVec3::ONE));
        w.reshape(w.current_box());
        assert_eq!(w.revision(), r0 + 2);
    }

    #[test]
    fn test_registry_unknown_handle() {
        let mut reg = HandleRegistry::new();
        let id = reg.register(HandleTarget::ClipRegion);
        assert_eq!(reg.target(id), Ok(HandleTarget::ClipRegion));
        assert_eq!(
            reg.target(HandleId(7)),
            Err(InspectError::UnknownHandle(HandleId(7)))
        );
    }
}
