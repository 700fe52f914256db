//! Angular conventions and default overlay parameters

/// Degrees in a full turn
pub const FULL_TURN_DEG: f64 = 360.0;

/// Default horizontal field of view (degrees)
pub const DEFAULT_HORIZONTAL_FOV_DEG: f64 = 60.0;

/// Exclusive bounds for a usable horizontal field of view (degrees)
pub const MIN_HORIZONTAL_FOV_DEG: f64 = 0.0;
pub const MAX_HORIZONTAL_FOV_DEG: f64 = 180.0;

/// Sensor beta angle that corresponds to a device pointed at the horizon
pub const HORIZON_BETA_DEG: f64 = 90.0;
