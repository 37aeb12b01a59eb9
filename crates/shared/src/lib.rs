use serde::{Deserialize, Serialize};

/// Measurement mode selected in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    #[default]
    None,
    Point,
    Line,
    Triangle,
}

impl MeasurementMode {
    /// Number of picked points that completes a measurement in this mode
    pub fn quota(&self) -> usize {
        match self {
            MeasurementMode::None => 0,
            MeasurementMode::Point => 1,
            MeasurementMode::Line => 2,
            MeasurementMode::Triangle => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementMode::None => "None",
            MeasurementMode::Point => "Point",
            MeasurementMode::Line => "Line",
            MeasurementMode::Triangle => "Triangle",
        }
    }
}

/// Axis a slice plane is perpendicular to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceAxis {
    #[serde(rename = "x", alias = "X")]
    X,
    #[serde(rename = "y", alias = "Y")]
    Y,
    #[serde(rename = "z", alias = "Z")]
    Z,
}

impl SliceAxis {
    /// Unit normal of the slice plane
    pub fn normal(&self) -> [f64; 3] {
        match self {
            SliceAxis::X => [1.0, 0.0, 0.0],
            SliceAxis::Y => [0.0, 1.0, 0.0],
            SliceAxis::Z => [0.0, 0.0, 1.0],
        }
    }
}

/// How a loaded mesh is represented in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    /// Bare vertices (PLY-style scans), drawn as points
    #[default]
    PointCloud,
    /// Triangulated surface (OBJ-style), drawn as surface + wireframe + points
    Surface,
}

/// One toggleable layer of a surface representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationLayer {
    Surface,
    Wireframe,
    Points,
}

/// Raw mesh as handed over by a loader
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshDescription {
    #[serde(default)]
    pub kind: MeshKind,
    pub vertices: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<[u32; 3]>,
}

impl MeshDescription {
    pub fn point_cloud(vertices: Vec<[f64; 3]>) -> Self {
        Self {
            kind: MeshKind::PointCloud,
            vertices,
            triangles: Vec::new(),
        }
    }

    pub fn surface(vertices: Vec<[f64; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            kind: MeshKind::Surface,
            vertices,
            triangles,
        }
    }
}

/// Visibility flags mirrored by the toolbar toggle buttons
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibilityFlags {
    pub mode: MeasurementMode,
    /// Original (unclipped, unsliced) primary drawable is in the scene and visible
    pub original_visible: bool,
    pub clip_enabled: bool,
    pub slice_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice_axis: Option<SliceAxis>,
    pub measurement_visible: bool,
    pub bounding_box_visible: bool,
    #[serde(default)]
    pub surface_visible: bool,
    #[serde(default)]
    pub wireframe_visible: bool,
    #[serde(default)]
    pub points_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_per_mode() {
        assert_eq!(MeasurementMode::None.quota(), 0);
        assert_eq!(MeasurementMode::Point.quota(), 1);
        assert_eq!(MeasurementMode::Line.quota(), 2);
        assert_eq!(MeasurementMode::Triangle.quota(), 3);
    }

    #[test]
    fn test_mode_serde() {
        let mode: MeasurementMode = serde_json::from_str(r#""triangle""#).unwrap();
        assert_eq!(mode, MeasurementMode::Triangle);
        assert_eq!(serde_json::to_string(&MeasurementMode::Line).unwrap(), r#""line""#);
    }

    #[test]
    fn test_axis_serde_accepts_upper_case() {
        let axis: SliceAxis = serde_json::from_str(r#""X""#).unwrap();
        assert_eq!(axis, SliceAxis::X);
        let axis: SliceAxis = serde_json::from_str(r#""z""#).unwrap();
        assert_eq!(axis.normal(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_mesh_description_defaults() {
        let json = r#"{"vertices": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]}"#;
        let mesh: MeshDescription = serde_json::from_str(json).unwrap();
        assert_eq!(mesh.kind, MeshKind::PointCloud);
        assert!(mesh.triangles.is_empty());
        assert_eq!(mesh.vertices.len(), 2);
    }
}
