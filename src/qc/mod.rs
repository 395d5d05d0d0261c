//! Observation quality control
mod clock_jump;
mod cycle_slip;
mod outlier;

pub use clock_jump::ClockJumpDetector;
pub use cycle_slip::{CycleSlipDetector, Discontinuity, DiscontinuityKind};
pub use outlier::OutlierDetector;
