//! Steamwing entry point
//!
//! Headless demo flight: a scripted pilot runs one attempt while the
//! camera-follow logic keeps the terrain window aligned, the way a real
//! front end would drive the simulation. Pass a seed as the first argument
//! for a reproducible run; otherwise the clock picks one.

use serde::Serialize;

use steamwing::consts::{GRID_HEIGHT, SIM_DT, TILE_SIZE};
use steamwing::sim::{FlightState, Fx, Plane, Scene, TickInput};

/// Display geometry the camera dead-zone is tuned for.
const SCREEN_W: i32 = 220;
const SCREEN_H: i32 = 176;

/// Safety cap: two minutes of simulated time.
const MAX_TICKS: u32 = 3600;

#[derive(Serialize)]
struct RunSummary {
    seed: u32,
    ticks: u32,
    seconds: f64,
    distance_m: u32,
    steam_left: u32,
    landed: bool,
}

fn main() {
    env_logger::init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable seed argument {arg:?}");
            clock_seed()
        }),
        None => clock_seed(),
    };
    log::info!("starting attempt with seed {seed}");

    let mut scene = Scene::new(seed);
    let mut plane = Plane::new();

    let mut ticks = 0;
    while ticks < MAX_TICKS {
        plane.update(autopilot(&plane), &scene);
        ticks += 1;

        for event in plane.take_events() {
            log::debug!("tick {ticks}: {event:?}");
        }

        let (cam_x, cam_y) = camera_follow(&plane);
        scene.advance_to(cam_x, cam_y);

        if ticks % 30 == 0 {
            let (px, py) = plane.position_px();
            log::debug!(
                "t={}s state={:?} px=({px},{py}) steam={} dist={}m",
                ticks / 30,
                plane.state,
                plane.steam(),
                plane.distance()
            );
        }

        if plane.landed() {
            break;
        }
    }

    let summary = RunSummary {
        seed,
        ticks,
        seconds: ticks as f64 * SIM_DT.to_f64(),
        distance_m: plane.distance(),
        steam_left: plane.steam(),
        landed: plane.landed(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("summary serialization failed: {err}"),
    }
}

/// Scripted pilot: full throttle off the pad, then ease the nose down to a
/// shallow climb and ride the tank dry.
fn autopilot(plane: &Plane) -> TickInput {
    let level = Fx::from_num(0.35);
    let pitch = match plane.state {
        FlightState::Flying if plane.pitch > level && plane.pitch < Fx::PI => -1,
        _ => 0,
    };
    TickInput { pitch, throttle: 1 }
}

/// Keep the craft inside the screen dead-zone, clamped to the world's
/// vertical extent.
fn camera_follow(plane: &Plane) -> (i32, i32) {
    let (px, py) = plane.position_px();

    let cam_x = (px - SCREEN_W / 2).max(0);

    let world_px_h = TILE_SIZE * GRID_HEIGHT;
    let cam_y = if py < SCREEN_H / 2 {
        0
    } else if py > world_px_h - SCREEN_H / 2 {
        world_px_h - SCREEN_H
    } else {
        py - SCREEN_H / 2
    };

    (cam_x, cam_y)
}

/// Seed an attempt from the wall clock when none is given.
fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0x5eed)
}
