//! Bomb plant/defuse state and the bombsite grid position of a planted bomb.

use common::BombRecord;
use polars::prelude::DataFrame;

use crate::assemble::{slot_column, TICKRATE};
use crate::error::Result;
use crate::frame::{float_column, floats};
use crate::players::SLOTS;

/// Seconds between the plant and the detonation.
pub const BOMB_TIMER: f64 = 40.0;

pub const PLANTED: &str = "planted";
pub const DEFUSED: &str = "defused";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    A,
    B,
}

static SITES: phf::Map<&'static str, Site> = phf::phf_map! {
    "BombsiteA" => Site::A,
    "BombsiteB" => Site::B,
};

/// Cut lines splitting a bombsite into a 3x3 grid. Cells are numbered row by
/// row from 1, starting at the high `y` row and the low `x` column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteGrid {
    /// Ascending x cuts.
    pub x: [f64; 2],
    /// Descending y cuts.
    pub y: [f64; 2],
}

impl SiteGrid {
    pub fn cell(&self, x: f64, y: f64) -> usize {
        let row = if y >= self.y[0] {
            0
        } else if y >= self.y[1] {
            1
        } else {
            2
        };
        let column = if x < self.x[0] {
            0
        } else if x < self.x[1] {
            1
        } else {
            2
        };
        row * 3 + column + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombsiteGrid {
    pub a: SiteGrid,
    pub b: SiteGrid,
}

impl BombsiteGrid {
    pub const INFERNO: Self = Self {
        a: SiteGrid {
            x: [1900.0, 2050.0],
            y: [650.0, 325.0],
        },
        b: SiteGrid {
            x: [275.0, 400.0],
            y: [2900.0, 2725.0],
        },
    };

    pub fn cell(&self, site: Site, x: f64, y: f64) -> usize {
        match site {
            Site::A => self.a.cell(x, y),
            Site::B => self.b.cell(x, y),
        }
    }
}

impl Default for BombsiteGrid {
    fn default() -> Self {
        Self::INFERNO
    }
}

pub const GRID_CELLS: usize = 9;

pub fn grid_column(cell: usize) -> String {
    format!("bomb_mx_pos{}", cell)
}

struct BombState {
    being_planted: Vec<f64>,
    being_defused: Vec<f64>,
    defused: Vec<f64>,
    at_a: Vec<f64>,
    at_b: Vec<f64>,
    plant_tick: Vec<f64>,
    /// Plant position, when the event carried a finite one.
    position: Vec<Option<(f64, f64)>>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

/// Adds the bomb columns to the assembled frame.
#[tracing::instrument(skip_all, fields(events = events.len()))]
pub fn apply(frame: &mut DataFrame, events: &[BombRecord], grid: &BombsiteGrid) -> Result<()> {
    let rows = frame.height();
    let ticks = floats(frame, "tick")?;
    let rounds = floats(frame, "round")?;

    let mut state = BombState {
        being_planted: vec![0.0; rows],
        being_defused: vec![0.0; rows],
        defused: vec![0.0; rows],
        at_a: vec![0.0; rows],
        at_b: vec![0.0; rows],
        plant_tick: vec![0.0; rows],
        position: vec![None; rows],
        x: vec![0.0; rows],
        y: vec![0.0; rows],
        z: vec![0.0; rows],
    };

    for slot in 0..SLOTS {
        let c4 = floats(frame, &slot_column(slot, "active_weapon_C4"))?;
        let in_site = floats(frame, &slot_column(slot, "is_in_bombsite"))?;
        let shooting = floats(frame, &slot_column(slot, "is_shooting"))?;
        let defusing = floats(frame, &slot_column(slot, "is_defusing"))?;
        for row in 0..rows {
            if c4[row] == 1.0 && in_site[row] == 1.0 && shooting[row] == 1.0 {
                state.being_planted[row] = 1.0;
            }
            state.being_defused[row] += defusing[row];
        }
    }

    for event in events.iter() {
        let round = event.round as f64;
        let from = event.tick as f64;
        let in_round = |row: usize| rounds[row] == round;
        let after = |row: usize| in_round(row) && ticks[row] >= from;

        match event.event.as_str() {
            PLANTED => {
                let site = event.site.as_deref().and_then(|s| SITES.get(s)).copied();
                if site.is_none() {
                    tracing::warn!(site = ?event.site, round = event.round, "Plant on an unknown bombsite");
                }
                let position = event
                    .x
                    .zip(event.y)
                    .filter(|(x, y)| x.is_finite() && y.is_finite());
                if position.is_none() {
                    tracing::warn!(round = event.round, "Plant without a position");
                }
                for row in (0..rows).filter(|r| after(*r)) {
                    state.at_a[row] = if site == Some(Site::A) { 1.0 } else { 0.0 };
                    state.at_b[row] = if site == Some(Site::B) { 1.0 } else { 0.0 };
                    state.position[row] = position;
                    state.x[row] = event.x.unwrap_or(0.0);
                    state.y[row] = event.y.unwrap_or(0.0);
                    state.z[row] = event.z.unwrap_or(0.0);
                }
                for row in (0..rows).filter(|r| in_round(*r)) {
                    state.plant_tick[row] = from;
                }
            }
            DEFUSED => {
                for row in (0..rows).filter(|r| after(*r)) {
                    state.being_defused[row] = 0.0;
                    state.defused[row] = 1.0;
                }
            }
            other => {
                tracing::trace!(event = other, "Ignoring bomb event");
            }
        }
    }

    let time = floats(frame, "time")?;
    let remaining_time: Vec<f64> = (0..rows)
        .map(|row| {
            if state.at_a[row] == 1.0 || state.at_b[row] == 1.0 {
                BOMB_TIMER - (ticks[row] - state.plant_tick[row]) / TICKRATE
            } else {
                time[row]
            }
        })
        .collect();

    let mut cells = vec![vec![0.0; rows]; GRID_CELLS];
    for row in 0..rows {
        let site = if state.at_a[row] == 1.0 {
            Some(Site::A)
        } else if state.at_b[row] == 1.0 {
            Some(Site::B)
        } else {
            None
        };
        if let (Some(site), Some((x, y))) = (site, state.position[row]) {
            let cell = grid.cell(site, x, y);
            cells[cell - 1][row] = 1.0;
        }
    }

    let mut columns = vec![
        float_column("remaining_time", remaining_time),
        float_column("is_bomb_being_planted", state.being_planted),
        float_column("is_bomb_being_defused", state.being_defused),
        float_column("is_bomb_defused", state.defused),
        float_column("is_bomb_planted_at_A_site", state.at_a),
        float_column("is_bomb_planted_at_B_site", state.at_b),
        float_column("plant_tick", state.plant_tick),
        float_column("bomb_X", state.x),
        float_column("bomb_Y", state.y),
        float_column("bomb_Z", state.z),
    ];
    for (idx, values) in cells.into_iter().enumerate() {
        columns.push(float_column(&grid_column(idx + 1), values));
    }
    frame.hstack_mut(&columns)?;

    Ok(())
}
