//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only (30 Hz)
//! - Fixed-point arithmetic only, no floats in any code path
//! - Seeded noise only; same seed and camera path, same world
//! - No rendering, audio or platform dependencies — collaborators consume
//!   events and queries instead

pub mod noise;
pub mod plane;
pub mod scene;

pub use noise::SimplexNoise;
pub use plane::{FlightState, Plane, PlaneEvent, TickInput};
pub use scene::{FlowVector, Scene};

use crate::consts::SIM_Q;
use crate::fixed::Fixed;

/// The precision all craft kinematics runs at.
pub type Fx = Fixed<SIM_Q>;
