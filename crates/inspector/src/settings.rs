//! Inspector settings

use serde::{Deserialize, Serialize};

use crate::scene::Rgb;

/// Fixed layout of the measurement text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStyle {
    /// Decimal places for lengths, areas and normals
    pub precision: usize,
    /// Right-justified width of length fields
    pub field_width: usize,
    /// Decimal places for angles
    pub angle_precision: usize,
    /// Right-justified width of angle fields
    pub angle_width: usize,
}

impl Default for MeasurementStyle {
    fn default() -> Self {
        Self {
            precision: 6,
            field_width: 12,
            angle_precision: 3,
            angle_width: 8,
        }
    }
}

/// Picked point and edge markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSettings {
    /// Sphere radius in world units
    pub radius: f64,
    pub line_width: f64,
    pub color: Rgb,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            line_width: 2.0,
            color: [1.0, 0.0, 0.0],
        }
    }
}

/// Section curve appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSettings {
    pub color: Rgb,
    pub line_width: f64,
    /// Half-thickness of a point-cloud slice as a fraction of the bounds diagonal
    pub point_slab: f64,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            color: [1.0, 0.0, 0.0],
            line_width: 2.0,
            point_slab: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarSettings {
    /// On-screen length of the bar before rounding
    pub pixel_length: f64,
    /// Zooming in stops once the rounded bar length would drop to this
    pub min_length: f64,
    pub unit: String,
}

impl Default for ScaleBarSettings {
    fn default() -> Self {
        Self {
            pixel_length: 200.0,
            min_length: 0.1,
            unit: "m".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
    /// Screen radius within which a point-cloud vertex is picked
    pub pick_tolerance_px: f64,
    /// Surface colour of loaded meshes
    pub mesh_color: Rgb,
    pub outline_color: Rgb,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            pick_tolerance_px: 6.0,
            mesh_color: [0.8, 0.8, 0.8],
            outline_color: [1.0, 1.0, 1.0],
        }
    }
}

/// All inspector settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InspectorSettings {
    #[serde(default)]
    pub measurement: MeasurementStyle,
    #[serde(default)]
    pub markers: MarkerSettings,
    #[serde(default)]
    pub slice: SliceSettings,
    #[serde(default)]
    pub scale_bar: ScaleBarSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
}

impl InspectorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "mesh-inspector", "mesh-inspector") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring malformed {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "mesh-inspector", "mesh-inspector") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }

    /// Parse an explicit settings document; missing sections take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_fills_defaults() {
        let s = InspectorSettings::from_json(r#"{"measurement": {"precision": 3, "field_width": 10, "angle_precision": 1, "angle_width": 6}}"#)
            .unwrap();
        assert_eq!(s.measurement.precision, 3);
        assert_eq!(s.markers, MarkerSettings::default());
        assert_eq!(s.scale_bar.unit, "m");
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(InspectorSettings::from_json("{}").unwrap(), InspectorSettings::default());
    }
}
