//! Parameters structure for ModeCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the mode control module.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Lowest allowed loop rate.
    ///
    /// Units: hertz
    pub min_rate_hz: u32,

    /// Highest allowed loop rate.
    ///
    /// Units: hertz
    pub max_rate_hz: u32,

    /// Loop rate at startup.
    ///
    /// Units: hertz
    pub initial_rate_hz: u32,

    /// Rate restored when switching to course control, until overwritten by a toggle.
    ///
    /// Units: hertz
    pub course_rate_hz: u32,

    /// Rate restored when switching to fine control, until overwritten by a toggle.
    ///
    /// Units: hertz
    pub fine_rate_hz: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_rate_hz: 10,
            max_rate_hz: 40,
            initial_rate_hz: 25,
            course_rate_hz: 25,
            fine_rate_hz: 25,
        }
    }
}
