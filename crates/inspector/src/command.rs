//! JSON command protocol for scripted inspection sessions.
//!
//! Each command maps onto one toolbar or viewport action of the inspector.

use serde::{Deserialize, Serialize};
use shared::{MeasurementMode, MeshDescription, RepresentationLayer, SliceAxis};

use crate::handle::OrientedBox;
use crate::harness::InspectorHarness;
use crate::measure::SessionEvent;
use crate::scale_bar::ZoomOutcome;

/// A command a script can execute against the inspector.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum InspectorCommand {
    /// Replace the current mesh
    LoadMesh {
        mesh: MeshDescription,
    },
    /// Select the measurement mode
    SetMode {
        mode: MeasurementMode,
    },
    /// Click at a screen position
    Click {
        x: f64,
        y: f64,
    },
    /// Click where a world point appears on screen
    ClickWorld {
        point: [f64; 3],
    },
    /// Discard picked points and markers.
    Clear,
    SetClipEnabled {
        enabled: bool,
    },
    /// Reshape the clip box as a drag of its handle would
    MoveClipBox {
        #[serde(rename = "box")]
        shape: OrientedBox,
    },
    /// Re-deliver a handle change notification without moving the box.
    ClipHandleChanged,
    ShowSlice {
        axis: SliceAxis,
    },
    HideSlice,
    SetZScale {
        scale: f64,
    },
    SetLayerVisible {
        layer: RepresentationLayer,
        visible: bool,
    },
    SetBoundingBoxVisible {
        visible: bool,
    },
    /// Zoom by a fraction of the camera distance (positive zooms in)
    Zoom {
        delta: f64,
    },
    /// Report the inspector state.
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result(result: crate::error::Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn click_data(event: SessionEvent, points: usize) -> serde_json::Value {
    match event {
        SessionEvent::Ignored => serde_json::json!({ "outcome": "ignored", "points": points }),
        SessionEvent::PickMiss => serde_json::json!({ "outcome": "miss", "points": points }),
        SessionEvent::PointAdded {
            complete,
            rolled_over,
            ..
        } => serde_json::json!({
            "outcome": "added",
            "points": points,
            "complete": complete,
            "rolled_over": rolled_over,
        }),
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut InspectorHarness, cmd: InspectorCommand) -> CommandResponse {
    match cmd {
        InspectorCommand::LoadMesh { mesh } => CommandResponse::from_result(harness.load_mesh(&mesh)),

        InspectorCommand::SetMode { mode } => {
            harness.set_mode(mode);
            CommandResponse::ok()
        }

        InspectorCommand::Click { x, y } => {
            let event = harness.click(x, y);
            CommandResponse::ok_with_data(click_data(event, harness.point_count()))
        }

        InspectorCommand::ClickWorld { point } => {
            match harness.click_world(glam::DVec3::from_array(point)) {
                Some(event) => CommandResponse::ok_with_data(click_data(event, harness.point_count())),
                None => CommandResponse::err("point is behind the camera"),
            }
        }

        InspectorCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        InspectorCommand::SetClipEnabled { enabled } => {
            harness.set_clip_enabled(enabled);
            CommandResponse::ok_with_data(serde_json::json!({
                "clip_enabled": harness.inspector.clip().is_enabled(),
            }))
        }

        InspectorCommand::MoveClipBox { shape } => {
            CommandResponse::from_result(harness.move_clip_box(shape))
        }

        InspectorCommand::ClipHandleChanged => {
            CommandResponse::from_result(harness.inspector.on_clip_handle_changed())
        }

        InspectorCommand::ShowSlice { axis } => CommandResponse::from_result(harness.show_slice(axis)),

        InspectorCommand::HideSlice => {
            harness.hide_slice();
            CommandResponse::ok()
        }

        InspectorCommand::SetZScale { scale } => {
            CommandResponse::from_result(harness.set_z_scale(scale))
        }

        InspectorCommand::SetLayerVisible { layer, visible } => {
            CommandResponse::from_result(harness.set_layer_visible(layer, visible))
        }

        InspectorCommand::SetBoundingBoxVisible { visible } => {
            harness.set_bounding_box_visible(visible);
            CommandResponse::ok()
        }

        InspectorCommand::Zoom { delta } => {
            let outcome = harness.zoom(delta);
            CommandResponse::ok_with_data(serde_json::json!({
                "applied": outcome == ZoomOutcome::Applied,
                "scale_bar": harness.scale_bar_label(),
            }))
        }

        InspectorCommand::Inspect => {
            let points: Vec<[f64; 3]> = harness
                .picked_points()
                .iter()
                .map(|p| p.to_array())
                .collect();
            let model = harness.model_mesh().map(|m| {
                serde_json::json!({
                    "points": m.point_count(),
                    "triangles": m.triangle_count(),
                    "bounds": m.bounds().map(|b| b.to_array()),
                })
            });
            CommandResponse::ok_with_data(serde_json::json!({
                "visibility": harness.visibility(),
                "picked_points": points,
                "measurement_text": harness.measurement_text(),
                "marker_count": harness.marker_count(),
                "clip_box": harness.clip_box(),
                "clipped_points": harness.clipped_mesh().map(|m| m.point_count()),
                "slice_points": harness.slice_mesh().map(|m| m.point_count()),
                "scale_bar": harness.scale_bar_label(),
                "model": model,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut InspectorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: InspectorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut InspectorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<InspectorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn loaded() -> InspectorHarness {
        let mut h = InspectorHarness::new();
        h.load_mesh(&fixtures::cube_surface_10()).unwrap();
        h
    }

    #[test]
    fn test_command_serde_clear() {
        let json = r#"{"command": "clear"}"#;
        let cmd: InspectorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, InspectorCommand::Clear));
    }

    #[test]
    fn test_command_serde_set_mode() {
        let json = r#"{"command": "set_mode", "mode": "triangle"}"#;
        let cmd: InspectorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            InspectorCommand::SetMode { mode } => assert_eq!(mode, MeasurementMode::Triangle),
            _ => panic!("Expected SetMode"),
        }
    }

    #[test]
    fn test_command_serde_move_clip_box() {
        let json = r#"{"command": "move_clip_box", "box": {"center": [0.0, 0.0, 0.0], "half_extents": [1.0, 2.0, 3.0]}}"#;
        let cmd: InspectorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            InspectorCommand::MoveClipBox { shape } => {
                assert_eq!(shape.half_extents, [1.0, 2.0, 3.0]);
                assert_eq!(shape.rotation, [0.0, 0.0, 0.0, 1.0]);
            }
            _ => panic!("Expected MoveClipBox"),
        }
    }

    #[test]
    fn test_command_serde_show_slice() {
        let json = r#"{"command": "show_slice", "axis": "z"}"#;
        let cmd: InspectorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, InspectorCommand::ShowSlice { axis: SliceAxis::Z }));
    }

    #[test]
    fn test_execute_click_center() {
        let mut h = loaded();
        execute_json(&mut h, r#"{"command": "set_mode", "mode": "point"}"#).unwrap();
        let resp = execute_json(&mut h, r#"{"command": "click", "x": 640.0, "y": 400.0}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["outcome"], "added");
        assert_eq!(data["complete"], true);
    }

    #[test]
    fn test_execute_click_without_mode_is_ignored() {
        let mut h = loaded();
        let resp = execute_json(&mut h, r#"{"command": "click", "x": 640.0, "y": 400.0}"#).unwrap();
        assert_eq!(resp.data.unwrap()["outcome"], "ignored");
        assert_eq!(h.point_count(), 0);
    }

    #[test]
    fn test_execute_slice_without_mesh_fails() {
        let mut h = InspectorHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "show_slice", "axis": "x"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("no mesh"));
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = loaded();
        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["model"]["points"], 8);
        assert_eq!(data["visibility"]["original_visible"], true);
        assert_eq!(data["visibility"]["clip_enabled"], false);
    }

    #[test]
    fn test_execute_batch() {
        let mut h = loaded();
        let json = r#"[
            {"command": "set_clip_enabled", "enabled": true},
            {"command": "show_slice", "axis": "y"},
            {"command": "hide_slice"}
        ]"#;
        let responses = execute_json_batch(&mut h, json).unwrap();
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r.success));
        assert!(h.visibility().clip_enabled);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = InspectorHarness::new();
        let result = execute_json(&mut h, "not valid json");
        assert!(result.is_err());
    }
}
