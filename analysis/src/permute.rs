//! Round augmentation by permuting the player groups of the starting-CT team.

use polars::prelude::DataFrame;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::frame::{floats, mask, names};
use crate::players::TEAM_SIZE;

const SLOT_PREFIX: &str = "player";

/// Slot number of a `player{slot}_*` column.
fn column_slot(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix(SLOT_PREFIX)?;
    let (slot, column) = rest.split_once('_')?;
    Some((slot.parse().ok()?, column))
}

/// Appends `copies - 1` permuted copies of every round, so each round ends up
/// `copies` times in the frame. The first team's slots are shuffled among
/// themselves; the second team's stay in place.
#[tracing::instrument(skip(frame), fields(rows = frame.height()))]
pub fn augment(frame: &DataFrame, copies: u32, seed: Option<u64>) -> Result<DataFrame> {
    let mut result = frame.clone();
    if copies <= 1 || frame.height() == 0 {
        return Ok(result);
    }

    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let rounds = floats(frame, "round")?;
    let columns = names(frame);
    let mut order: Vec<f64> = Vec::new();
    for round in rounds.iter() {
        if !order.contains(round) {
            order.push(*round);
        }
    }

    let mut slots: Vec<usize> = (0..TEAM_SIZE).collect();
    for round in order {
        let in_round: Vec<bool> = rounds.iter().map(|r| *r == round).collect();
        let round_rows = frame.filter(&mask(&in_round))?;

        for _ in 1..copies {
            slots.shuffle(&mut rng);
            let renamed = columns.iter().map(|name| match column_slot(name) {
                Some((slot, column)) if slot < TEAM_SIZE => {
                    format!("{}{}_{}", SLOT_PREFIX, slots[slot], column)
                }
                _ => name.clone(),
            });
            let mut copy = round_rows.clone();
            copy.set_column_names(renamed)?;
            result.vstack_mut(&copy.select(columns.iter().cloned())?)?;
        }
    }

    tracing::debug!(rows = result.height(), "Added permuted rounds");

    Ok(result)
}
