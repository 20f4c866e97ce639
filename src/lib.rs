//! Steamwing - a steam-powered rocket-plane flight simulation
//!
//! Core modules:
//! - `fixed`: deterministic fixed-point arithmetic and trig approximations
//! - `sim`: the simulation itself (noise field, scrolling wind grid,
//!   flight dynamics)
//!
//! The crate is the simulation only. Rendering, audio and input are
//! collaborators: they feed [`sim::TickInput`]s in, and read positions,
//! orientation buckets and [`sim::PlaneEvent`]s back out.

pub mod fixed;
pub mod sim;

pub use fixed::Fixed;
pub use sim::{FlightState, Plane, Scene, TickInput};

/// World and simulation configuration constants.
///
/// The launch transition and ground contact both depend on these being
/// consistent across components, so they live here rather than as
/// per-module literals.
pub mod consts {
    use crate::fixed::Fixed;

    /// Fractional bits for craft kinematics.
    pub const SIM_Q: u32 = 10;
    /// Fractional bits for noise accumulation.
    pub const NOISE_Q: u32 = 24;

    /// Fixed simulation timestep (one display frame at 30 Hz).
    pub const SIM_DT: Fixed<SIM_Q> = Fixed::from_num(1.0 / 30.0);

    /// Square tile edge in pixels.
    pub const TILE_SIZE: i32 = 16;
    /// Retained columns: one visible span, double-buffered in half spans.
    pub const GRID_WIDTH: i32 = 28;
    pub const HALF_SPAN: i32 = GRID_WIDTH / 2;
    /// Full vertical extent of the world in rows.
    pub const GRID_HEIGHT: i32 = 80;

    /// Cell code for the reserved ground row.
    pub const GROUND_TILE: u8 = 25;
    /// Cell code decoding to no wind at all.
    pub const CALM_TILE: u8 = 12;

    /// Meters per world pixel.
    pub const WORLD_SCALE: Fixed<SIM_Q> = Fixed::from_num(0.5);
    /// Where the craft sits before launch, in meters.
    pub const PAD_START_X: Fixed<SIM_Q> = Fixed::from_num(50.0);
    pub const PAD_START_Y: Fixed<SIM_Q> = Fixed::from_num(12.0);
    /// Length of the launch pad ramp, in meters.
    pub const PAD_LENGTH: Fixed<SIM_Q> = Fixed::from_num(22.0);
    /// Altitude of the ground surface, in meters.
    pub const GROUND_LEVEL: Fixed<SIM_Q> = Fixed::from_num(8.0);

    /// Steam tank size for one attempt.
    pub const FUEL_CAPACITY: Fixed<SIM_Q> = Fixed::from_num(100.0);
}
