//! Interactive point measurement: the picking state machine and its presentation.

pub mod presenter;
pub mod session;

pub use presenter::{format_measurement, MeasurementPresenter};
pub use session::{PickingSession, SessionEvent};
