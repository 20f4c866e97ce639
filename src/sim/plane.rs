//! Rocket-plane flight dynamics
//!
//! One craft, one fixed 30 Hz timestep, three lifecycle states. Each tick
//! derives forward/up axes from the pitch, samples the wind under the
//! craft, applies thrust, drag, lift and gravity in craft axes, then
//! integrates. Everything runs on `Fixed<10>`, so two runs with the same
//! seed and input script match bit for bit.
//!
//! The plane never touches audio or sprites itself; collaborators drain
//! [`PlaneEvent`]s and read the pitch/orientation queries instead.

use serde::{Deserialize, Serialize};

use crate::consts::{
    FUEL_CAPACITY, GRID_HEIGHT, GROUND_LEVEL, PAD_LENGTH, PAD_START_X, PAD_START_Y, SIM_DT,
    TILE_SIZE, WORLD_SCALE,
};
use crate::fixed::{Fixed, math};
use crate::sim::Fx;
use crate::sim::scene::Scene;

const MASS: i32 = 350; // kilograms
const THRUST: i32 = 14_000; // Newtons
const WING_AREA: i32 = 13; // square meters

const AIR_DENSITY: Fx = Fixed::from_num(1.225);
const DRAG_COEF: Fx = Fixed::from_num(0.01);
const GRAVITY: Fx = Fixed::from_num(9.81);
const HALF: Fx = Fixed::from_num(0.5);

/// Angle of attack where the wing generates the most lift.
const MAX_LIFT_ANGLE: f64 = 10.0 * std::f64::consts::PI / 180.0;
const ANGLE_MAX_LIFT: Fx = Fixed::from_num(MAX_LIFT_ANGLE);
/// Peak of the sinusoidal lift curve, sized so its slope at zero matches a
/// thin-airfoil 2π per radian.
const MAX_LIFT_COEF: Fx = Fixed::from_num(
    2.0 * std::f64::consts::PI / 0.866_025_4 * (2.0 * MAX_LIFT_ANGLE / 3.0),
);

/// How strongly the quantized wind codes push the craft.
const WIND_INFLUENCE: i32 = 5;
/// Steam spent per second at full throttle.
const FUEL_BURN: i32 = 20;

/// Pitch authority grows with forward speed, capped here.
const PITCH_RATE_CAP: Fx = Fixed::from_num(1000.0);
const PITCH_GAIN: Fx = Fixed::from_num(1.1);
/// Weathervane term pulling the nose toward the airflow.
const AOA_STABILITY: Fx = Fixed::from_num(1.6);

/// Lifecycle of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    /// Accelerating along the pad.
    Launch,
    /// Airborne.
    Flying,
    /// Back on the ground, rolling out. Terminal until reset.
    OnGround,
}

/// Pilot commands for a single tick. Transient: they are re-applied every
/// tick and never stored as craft state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Nose up / nose down, roughly [-1, 1].
    pub pitch: i8,
    /// Engine on (1) or off (0).
    pub throttle: i8,
}

/// Transition notifications for the audio/sprite collaborators, drained by
/// the caller each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneEvent {
    /// Engine started burning (rocket loop starts).
    ThrottleUp,
    /// Engine stopped burning (rocket loop stops).
    ThrottleCut,
    /// Ran the pad to its end and became airborne.
    LiftOff,
    /// Hit the ground; `impact` is the downward speed, for crash volume.
    Touchdown { impact: Fx },
    /// Burned the last of the steam.
    FuelExhausted,
}

/// The craft: kinematic state, steam, and the per-attempt state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub state: FlightState,
    pub pos_x: Fx,
    pub pos_y: Fx,
    pub vel_x: Fx,
    pub vel_y: Fx,
    /// Radians; wrapped into [0, 2π) only when the pitch integrator runs.
    pub pitch: Fx,
    /// Remaining fuel ("steam"), counts down to zero.
    pub steam: Fx,
    /// Best forward excursion past the pad. Never decreases.
    pub distance: Fx,
    /// Pending transition events, drained by the caller.
    #[serde(skip)]
    pub events: Vec<PlaneEvent>,
    /// Whether the engine was audibly burning last tick.
    burning: bool,
}

impl Plane {
    /// A craft armed on the pad with full steam.
    pub fn new() -> Self {
        Self {
            state: FlightState::Launch,
            pos_x: PAD_START_X,
            pos_y: PAD_START_Y,
            vel_x: Fx::ZERO,
            vel_y: Fx::ZERO,
            pitch: Fx::PI / 4,
            steam: FUEL_CAPACITY,
            distance: Fx::ZERO,
            events: Vec::new(),
            burning: false,
        }
    }

    /// Re-arm on the pad for a new attempt.
    pub fn reset(&mut self) {
        log::info!("plane re-armed on pad");
        *self = Self::new();
    }

    /// Advance one fixed timestep.
    pub fn update(&mut self, input: TickInput, scene: &Scene) {
        self.track_burn(input);

        // Forward and up unit vectors from the pitch
        let fwd_x = math::cos(self.pitch);
        let fwd_y = math::sin(self.pitch);
        let up_x = -fwd_y;
        let up_y = fwd_x;

        // Speed relative to the air
        let (px, py) = self.position_px();
        let wind = scene.flow_vector_at(px, py);
        let airspeed_x = self.vel_x - WIND_INFLUENCE * Fx::from_int(wind.x);
        let airspeed_y = self.vel_y - WIND_INFLUENCE * Fx::from_int(wind.y);

        // Forward and up components of the airspeed
        let vel_fwd = fwd_x * airspeed_x + fwd_y * airspeed_y;
        let vel_up = up_x * airspeed_x + up_y * airspeed_y;

        let mut dvel_fwd = Fx::ZERO;
        let mut dvel_up = Fx::ZERO;

        // Thrust
        if input.throttle > 0 && self.steam > Fx::ZERO {
            self.steam -= FUEL_BURN * SIM_DT;
            dvel_fwd = input.throttle as i32 * THRUST * SIM_DT / MASS;
            if self.steam <= Fx::ZERO {
                self.events.push(PlaneEvent::FuelExhausted);
                log::info!("steam exhausted at x={}", self.pos_x.to_f64());
            }
        }

        // Forward drag, quadratic and opposing the relative airflow
        dvel_fwd -=
            (HALF * AIR_DENSITY * vel_fwd * math::abs(vel_fwd) * DRAG_COEF * WING_AREA * SIM_DT)
                / MASS;

        match self.state {
            FlightState::Launch => {
                // Gravity along the pad direction
                dvel_fwd -= fwd_y * GRAVITY * SIM_DT;
            }
            FlightState::OnGround => {
                if self.vel_x != Fx::ZERO {
                    // Rollout friction scales with the remembered impact speed
                    let scale = Fx::ONE - 50 * (-self.vel_y + Fx::ONE) * SIM_DT / MASS;
                    self.vel_x = if scale > Fx::ZERO {
                        self.vel_x * scale
                    } else {
                        Fx::ZERO
                    };
                }
            }
            FlightState::Flying => {
                // Air hitting the flat of the wings
                dvel_up -=
                    (HALF * AIR_DENSITY * WING_AREA * vel_up * math::abs(vel_up) * SIM_DT) / MASS;

                // Lift perpendicular to the actual airflow. Dead air has
                // no flow direction, hence no angle of attack.
                let angle_attack = if vel_up == Fx::ZERO && vel_fwd == Fx::ZERO {
                    Fx::ZERO
                } else {
                    -math::atan2(vel_up, vel_fwd)
                };
                let lift = lift_coef(angle_attack);
                if lift != Fx::ZERO {
                    // Inside the lift band |aoa| stays well under 90°, so
                    // the cosine divisor cannot reach zero.
                    let airspeed_sq = airspeed_x * airspeed_x + airspeed_y * airspeed_y;
                    let dvel =
                        (HALF * AIR_DENSITY * WING_AREA * lift * airspeed_sq * SIM_DT) / MASS;
                    dvel_up += dvel / math::cos(angle_attack);
                }

                // Gravity
                self.vel_y -= GRAVITY * SIM_DT;

                // Pilot pitch authority rises with forward speed, capped;
                // the airflow pulls the nose back toward it
                let rate = PITCH_GAIN * vel_fwd;
                let rate = if rate > PITCH_RATE_CAP { PITCH_RATE_CAP } else { rate };
                self.pitch += input.pitch as i32 * SIM_DT * rate * Fx::PI / 180;
                self.pitch -= angle_attack * AOA_STABILITY * SIM_DT;
                self.pitch = math::wrap_angle(self.pitch);
            }
        }

        // Integrate velocity and position
        self.vel_x += dvel_up * up_x + dvel_fwd * fwd_x;
        self.vel_y += dvel_up * up_y + dvel_fwd * fwd_y;
        self.pos_x += self.vel_x * SIM_DT;
        self.pos_y += self.vel_y * SIM_DT;

        if self.pos_x - (PAD_START_X + PAD_LENGTH) > self.distance {
            self.distance = self.pos_x - (PAD_START_X + PAD_LENGTH);
        }

        match self.state {
            FlightState::Launch => {
                if self.pos_x < PAD_START_X || self.pos_y < PAD_START_Y {
                    // Nothing pushes the craft backwards off the pad
                    self.vel_x = Fx::ZERO;
                    self.vel_y = Fx::ZERO;
                    self.pos_x = PAD_START_X;
                    self.pos_y = PAD_START_Y;
                } else if self.pos_x >= PAD_START_X + PAD_LENGTH {
                    self.state = FlightState::Flying;
                    self.events.push(PlaneEvent::LiftOff);
                    log::info!("lift-off at {} m/s", self.vel_x.to_f64());
                }
            }
            FlightState::Flying => {
                if self.pos_y.to_int() < GROUND_LEVEL.to_int() {
                    self.state = FlightState::OnGround;
                    self.pos_y = GROUND_LEVEL;
                    self.events.push(PlaneEvent::Touchdown {
                        impact: -self.vel_y,
                    });
                    log::info!(
                        "touchdown at x={}, impact {} m/s",
                        self.pos_x.to_f64(),
                        -self.vel_y.to_f64()
                    );
                }
            }
            FlightState::OnGround => {
                self.pos_y = GROUND_LEVEL;
            }
        }
    }

    /// Drain the transition events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<PlaneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Attempt over: stopped on the ground, or stranded on the pad dry.
    ///
    /// "Stopped" is judged at whole-meter-per-second resolution. Residual
    /// drag keeps a sub-unit velocity dribble alive while the craft rests
    /// against the ground, so an exact-zero test would never fire.
    pub fn landed(&self) -> bool {
        self.vel_x.to_int() == 0
            && (self.state == FlightState::OnGround
                || (self.state == FlightState::Launch && self.steam <= Fx::ZERO))
    }

    /// Remaining steam, clamped at zero for display.
    pub fn steam(&self) -> u32 {
        self.steam.to_int().max(0) as u32
    }

    /// Best distance past the pad, in whole meters.
    pub fn distance(&self) -> u32 {
        self.distance.to_int().max(0) as u32
    }

    /// Craft position in world pixels (y grows downward from the sky).
    pub fn position_px(&self) -> (i32, i32) {
        let inv_scale = Fx::ONE / WORLD_SCALE;
        let x = (self.pos_x * inv_scale).to_int();
        let y = TILE_SIZE * GRID_HEIGHT - (self.pos_y * inv_scale).to_int();
        (x, y)
    }

    /// Quantize the pitch into one of 13 orientation buckets spanning a
    /// half-circle, plus a mirror flag for the other half.
    pub fn orientation(&self) -> (usize, bool) {
        let idx = (self.pitch * (Fx::from_int(12) / Fx::PI) + HALF).to_int();
        if idx < 6 {
            ((idx + 6) as usize, false)
        } else if idx >= 18 {
            ((idx - 18) as usize, false)
        } else {
            ((12 - (idx - 6)) as usize, true)
        }
    }

    /// Emit throttle edges. The engine is audible only while it actually
    /// burns, so running dry cuts it even with the button held.
    fn track_burn(&mut self, input: TickInput) {
        let burning = input.throttle > 0 && self.steam > Fx::ZERO;
        if burning && !self.burning {
            self.events.push(PlaneEvent::ThrottleUp);
        } else if !burning && self.burning {
            self.events.push(PlaneEvent::ThrottleCut);
        }
        self.burning = burning;
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::new()
    }
}

/// Lift coefficient by angle of attack: an odd sinusoidal bump that peaks
/// inside the stall band and drops to zero past twice the max-lift angle.
fn lift_coef(angle_attack: Fx) -> Fx {
    if angle_attack < 2 * ANGLE_MAX_LIFT && angle_attack > -(2 * ANGLE_MAX_LIFT) {
        MAX_LIFT_COEF * math::sin(angle_attack * Fx::PI / (2 * ANGLE_MAX_LIFT))
    } else {
        Fx::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scene::Scene;

    const THROTTLE: TickInput = TickInput {
        pitch: 0,
        throttle: 1,
    };

    #[test]
    fn launch_reaches_flying_exactly_once() {
        let scene = Scene::new(12345);
        let mut plane = Plane::new();
        let mut liftoffs = 0;
        let mut reverted = false;

        for _ in 0..300 {
            plane.update(THROTTLE, &scene);
            for ev in plane.take_events() {
                if ev == PlaneEvent::LiftOff {
                    liftoffs += 1;
                    assert!(plane.pos_x >= PAD_START_X + PAD_LENGTH);
                }
            }
            if liftoffs > 0 && plane.state == FlightState::Launch {
                reverted = true;
            }
        }

        assert_eq!(liftoffs, 1);
        assert!(!reverted);
        assert_ne!(plane.state, FlightState::Launch);
    }

    #[test]
    fn dead_stick_stays_clamped_on_pad() {
        let scene = Scene::new(9);
        let mut plane = Plane::new();

        for _ in 0..120 {
            plane.update(TickInput::default(), &scene);
            assert_eq!(plane.pos_x, PAD_START_X);
            assert_eq!(plane.pos_y, PAD_START_Y);
            assert_eq!(plane.vel_x, Fx::ZERO);
            assert_eq!(plane.vel_y, Fx::ZERO);
        }
        assert_eq!(plane.steam, FUEL_CAPACITY);
        assert_eq!(plane.distance(), 0);
        assert!(!plane.landed());

        // Out of steam while still on the pad: attempt is over
        plane.steam = Fx::ZERO;
        assert!(plane.landed());
    }

    #[test]
    fn ground_impact_clamps_and_rolls_out() {
        let scene = Scene::new(55);
        let mut plane = Plane::new();
        plane.state = FlightState::Flying;
        plane.pos_x = Fx::from_int(200);
        plane.pos_y = Fx::from_int(40);
        plane.vel_x = Fx::from_int(10);
        plane.vel_y = Fx::from_int(-30);
        plane.pitch = Fx::ZERO;

        let mut touchdowns = 0;
        for _ in 0..100 {
            plane.update(TickInput::default(), &scene);
            for ev in plane.take_events() {
                if let PlaneEvent::Touchdown { impact } = ev {
                    touchdowns += 1;
                    assert!(impact > Fx::ZERO);
                    assert_eq!(plane.pos_y, GROUND_LEVEL);
                }
            }
            if plane.state == FlightState::OnGround {
                break;
            }
        }
        assert_eq!(touchdowns, 1);
        assert_eq!(plane.state, FlightState::OnGround);

        // Rollout friction must bleed the speed below a meter per second
        let mut ticks = 0;
        while !plane.landed() {
            plane.update(TickInput::default(), &scene);
            assert_eq!(plane.pos_y, GROUND_LEVEL);
            ticks += 1;
            assert!(ticks < 2000, "rollout never stopped");
        }
        assert_eq!(plane.vel_x.to_int(), 0);
    }

    #[test]
    fn distance_never_decreases() {
        let scene = Scene::new(777);
        let mut plane = Plane::new();
        let mut best = 0;

        for tick in 0..600 {
            let input = TickInput {
                pitch: if tick > 200 { -1 } else { 0 },
                throttle: i8::from(tick < 250),
            };
            plane.update(input, &scene);
            let d = plane.distance();
            assert!(d >= best, "distance went from {best} to {d}");
            best = d;
        }
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let scene_a = Scene::new(31415);
        let scene_b = Scene::new(31415);
        let mut a = Plane::new();
        let mut b = Plane::new();

        for tick in 0..400 {
            let input = TickInput {
                pitch: match tick % 7 {
                    0 => -1,
                    3 => 1,
                    _ => 0,
                },
                throttle: i8::from(tick % 11 != 0),
            };
            a.update(input, &scene_a);
            b.update(input, &scene_b);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn throttle_events_fire_on_edges() {
        let scene = Scene::new(2);
        let mut plane = Plane::new();

        plane.update(THROTTLE, &scene);
        assert_eq!(plane.take_events(), vec![PlaneEvent::ThrottleUp]);

        plane.update(THROTTLE, &scene);
        assert!(plane.take_events().is_empty());

        plane.update(TickInput::default(), &scene);
        assert_eq!(plane.take_events(), vec![PlaneEvent::ThrottleCut]);
    }

    #[test]
    fn running_dry_cuts_the_burn() {
        let scene = Scene::new(2);
        let mut plane = Plane::new();
        plane.steam = FUEL_BURN * SIM_DT; // one tick's worth

        plane.update(THROTTLE, &scene);
        let events = plane.take_events();
        assert!(events.contains(&PlaneEvent::ThrottleUp));
        assert!(events.contains(&PlaneEvent::FuelExhausted));

        // Button still held, but there is nothing left to burn
        plane.update(THROTTLE, &scene);
        assert_eq!(plane.take_events(), vec![PlaneEvent::ThrottleCut]);
    }

    #[test]
    fn orientation_buckets() {
        let mut plane = Plane::new();

        plane.pitch = Fx::ZERO; // east
        assert_eq!(plane.orientation(), (6, false));

        plane.pitch = Fx::PI / 4; // climbing north-east
        assert_eq!(plane.orientation(), (9, false));

        plane.pitch = Fx::PI / 2; // straight up
        assert_eq!(plane.orientation(), (12, true));

        plane.pitch = Fx::PI + Fx::PI / 2; // straight down
        let (idx, _) = plane.orientation();
        assert_eq!(idx, 0);
    }

    #[test]
    fn reset_rearms_the_craft() {
        let scene = Scene::new(3);
        let mut plane = Plane::new();
        for _ in 0..100 {
            plane.update(THROTTLE, &scene);
        }
        assert_ne!(plane.pos_x, PAD_START_X);

        plane.reset();
        assert_eq!(plane, Plane::new());
    }
}
