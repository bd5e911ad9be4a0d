//! # Mobile Base Equipment Demands

use serde::{Deserialize, Serialize};

/// Velocity demand for the mobile base.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseVelDems {
    /// Units: meters/second
    pub linear_ms: f64,

    /// Units: radians/second
    pub angular_rads: f64,
}
