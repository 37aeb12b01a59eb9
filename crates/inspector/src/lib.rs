// Library crate: the inspection core plus the headless harness and JSON
// command protocol used by the binary and the integration tests.

pub mod clip;
pub mod command;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod geometry;
pub mod handle;
pub mod harness;
pub mod inspector;
pub mod measure;
pub mod metrics;
pub mod pipeline;
pub mod scale_bar;
pub mod scene;
pub mod settings;
pub mod slice;
pub mod validation;

pub use error::{InspectError, Result};
pub use inspector::Inspector;
