//! Pan-tilt camera control module
//!
//! Steps the camera mount about its pan and tilt axes while the operator holds a direction, or
//! sends it home when both axes are commanded home together.

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

/// Possible errors that can occur during PanTiltCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum PanTiltCtrlError {
    #[error("The pan-tilt step must be positive, found {0} rad")]
    InvalidStep(f64),
}
