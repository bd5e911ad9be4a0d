//! Mode control module
//!
//! Owns the control loop rate. The operator can nudge the rate up or down one hertz at a time and
//! switch between two remembered presets, course and fine control.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ModeCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ModeCtrlError {
    #[error("Minimum loop rate ({0} Hz) must be non-zero and not above the maximum ({1} Hz)")]
    InvalidRange(u32, u32),

    #[error("The {0} loop rate ({1} Hz) is outside the allowed range [{2}, {3}] Hz")]
    RateOutOfRange(&'static str, u32, u32, u32),
}
