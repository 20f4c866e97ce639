//! Scrolling terrain and wind field
//!
//! The world is conceptually endless along x, but only a camera-wide window
//! of it is ever held in memory: a ring of [`GRID_WIDTH`] columns indexed by
//! `world_col mod GRID_WIDTH`, each slot stamped with the world column it
//! currently holds. Scrolling regenerates exactly the stale slots, so work
//! per column scrolled is O(height) and memory never grows with distance.
//! The noise field is pure per seed, which makes any revisited column come
//! back bit-identical.
//!
//! Cell codes double as tile ids for a renderer. Code layout: `5*y + x`
//! encodes a wind direction with each axis in [-2, 2]; code 12 is calm air
//! and code 25 marks the ground row.

use crate::consts::{
    CALM_TILE, GRID_HEIGHT, GRID_WIDTH, GROUND_TILE, HALF_SPAN, NOISE_Q, SIM_Q, TILE_SIZE,
};
use crate::fixed::Fixed;
use crate::sim::noise::SimplexNoise;

use serde::{Deserialize, Serialize};

/// Quantized wind direction at a cell, each component in [-2, 2].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowVector {
    pub x: i32,
    pub y: i32,
}

impl FlowVector {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Decode a cell code.
    fn from_code(code: u8) -> Self {
        let code = code as i32;
        Self {
            x: code % 5 - 2,
            y: 2 - code / 5,
        }
    }
}

/// The retained window of the wind/terrain field plus its generator.
pub struct Scene {
    noise: SimplexNoise,
    /// Cell codes, column-major: slot * GRID_HEIGHT + row.
    tiles: Vec<u8>,
    /// World column currently generated into each ring slot.
    col_stamp: Vec<i32>,
    camera_x: i32,
    camera_y: i32,
}

impl Scene {
    /// Build a scene with the whole visible window generated for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut scene = Self {
            noise: SimplexNoise::new(0),
            tiles: vec![CALM_TILE; (GRID_WIDTH * GRID_HEIGHT) as usize],
            col_stamp: vec![i32::MIN; GRID_WIDTH as usize],
            camera_x: 0,
            camera_y: 0,
        };
        scene.reset(seed);
        scene
    }

    /// New attempt: reseed the field, rewind the camera and regenerate the
    /// whole window eagerly.
    pub fn reset(&mut self, seed: u32) {
        log::debug!("scene reset, seed {seed}");
        self.noise.reseed(seed);
        self.camera_x = 0;
        self.camera_y = 0;
        self.col_stamp.fill(i32::MIN);
        self.realign(0);
    }

    /// Keep the retained window aligned with the camera. Supports movement
    /// in both directions; only columns entering the window are generated.
    pub fn advance_to(&mut self, camera_x: i32, camera_y: i32) {
        self.realign(camera_x);
        self.camera_x = camera_x;
        self.camera_y = camera_y;
    }

    /// Wind vector at a world pixel position. Positions outside the
    /// retained window or the vertical extent read as calm air.
    pub fn flow_vector_at(&self, x: i32, y: i32) -> FlowVector {
        let col = x / TILE_SIZE - first_col(self.camera_x);
        let row = y / TILE_SIZE;

        if col < 0 || col >= GRID_WIDTH || row < 0 || row >= GRID_HEIGHT {
            return FlowVector::ZERO;
        }

        // Wind lives on the coarse checkerboard; snap before reading. The
        // snapped row never reaches the ground row.
        let (col, row) = snap_to_flow_grid(col, row);
        let world = first_col(self.camera_x) + col;
        FlowVector::from_code(self.tiles[cell_index(world, row)])
    }

    /// Cell code for a world column and row, if that column is currently
    /// retained. Renderables and debug maps read from here.
    pub fn tile_at(&self, world_col: i32, row: i32) -> Option<u8> {
        if row < 0 || row >= GRID_HEIGHT {
            return None;
        }
        let slot = world_col.rem_euclid(GRID_WIDTH) as usize;
        if self.col_stamp[slot] != world_col {
            return None;
        }
        Some(self.tiles[cell_index(world_col, row)])
    }

    pub fn camera_x(&self) -> i32 {
        self.camera_x
    }

    pub fn camera_y(&self) -> i32 {
        self.camera_y
    }

    fn realign(&mut self, camera_x: i32) {
        let base = first_col(camera_x);
        for world in base..base + GRID_WIDTH {
            let slot = world.rem_euclid(GRID_WIDTH) as usize;
            if self.col_stamp[slot] != world {
                self.generate_column(world);
                self.col_stamp[slot] = world;
            }
        }
    }

    fn generate_column(&mut self, world_col: i32) {
        for row in 0..GRID_HEIGHT {
            self.tiles[cell_index(world_col, row)] = tile_code(&self.noise, world_col, row);
        }
    }
}

/// First retained world column for a camera position: the window realigns
/// every half-span of scrolling.
fn first_col(camera_x: i32) -> i32 {
    HALF_SPAN * (camera_x / (TILE_SIZE * HALF_SPAN))
}

fn cell_index(world_col: i32, row: i32) -> usize {
    (world_col.rem_euclid(GRID_WIDTH) * GRID_HEIGHT + row) as usize
}

/// Snap a cell onto the coarse wind lattice: rows pair up, columns
/// alternate with each row pair.
fn snap_to_flow_grid(col: i32, row: i32) -> (i32, i32) {
    let row = row & !1;
    let col = (col | 1) - ((row >> 1) & 1);
    (col, row)
}

/// Generate the code for one cell. Only cells sitting exactly on the
/// snapped lattice sample the noise field; the rest are calm fillers, and
/// the bottom row is always ground.
fn tile_code(noise: &SimplexNoise, col: i32, row: i32) -> u8 {
    if row >= GRID_HEIGHT - 1 {
        return GROUND_TILE;
    }
    let (snapped_col, snapped_row) = snap_to_flow_grid(col, row);
    if snapped_col != col || snapped_row != row {
        return CALM_TILE;
    }

    let x_val = quantize(noise.sample(
        Fixed::<SIM_Q>::from_num(0.01) * col,
        Fixed::<SIM_Q>::from_num(0.03) * row,
    ));
    // Second, independent field: same coordinates rolled and negated
    let y_val = quantize(noise.sample(
        Fixed::<SIM_Q>::from_num(-0.03) * row,
        Fixed::<SIM_Q>::from_num(0.01) * col,
    ));
    (5 * y_val + x_val) as u8
}

/// Remap a unit-range noise sample onto {0, 1, 2, 3, 4}, centered on 2.
fn quantize(n: Fixed<NOISE_Q>) -> i32 {
    let scaled = Fixed::from_num(2.5) * (Fixed::ONE + n);
    scaled.to_int().clamp(0, 4)
}
