use mesh_inspector_lib::command::{execute_json_batch, CommandResponse};
use mesh_inspector_lib::harness::InspectorHarness;
use mesh_inspector_lib::settings::InspectorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mesh_inspector=info,mesh_inspector_lib=info".into()),
        )
        .init();

    let args = parse_args();
    let settings = match &args.settings {
        Some(path) => match read_file(path).and_then(|json| {
            InspectorSettings::from_json(&json).map_err(|e| format!("invalid settings JSON: {e}"))
        }) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failed to load settings from {path}: {e}");
                return;
            }
        },
        None => InspectorSettings::load(),
    };

    let mut harness = InspectorHarness::with_settings(settings);

    if let Some(path) = &args.mesh {
        match read_file(path).and_then(|json| harness.load_mesh_json(&json)) {
            Ok(()) => tracing::info!("Loaded mesh from {path}"),
            Err(e) => {
                tracing::error!("Failed to load mesh from {path}: {e}");
                return;
            }
        }
    }

    let Some(path) = &args.commands else {
        print_responses(&[]);
        return;
    };
    match read_file(path).and_then(|json| execute_json_batch(&mut harness, &json)) {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            if failed > 0 {
                tracing::warn!("{failed} of {} commands failed", responses.len());
            }
            print_responses(&responses);
        }
        Err(e) => tracing::error!("Failed to run commands from {path}: {e}"),
    }
}

#[derive(Default)]
struct Args {
    mesh: Option<String>,
    commands: Option<String>,
    settings: Option<String>,
}

/// `--mesh <path> [--commands <path>] [--settings <path>]`
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--mesh" => parsed.mesh = value,
            "--commands" => parsed.commands = value,
            "--settings" => parsed.settings = value,
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    parsed
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("read error: {e}"))
}

fn print_responses(responses: &[CommandResponse]) {
    match serde_json::to_string_pretty(responses) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize responses: {e}"),
    }
}
