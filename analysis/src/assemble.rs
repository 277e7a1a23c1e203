//! Joins the 10 player tables and the round metadata into one row per
//! sampled tick.

use polars::prelude::{Column, DataFrame};

use crate::error::Result;
use crate::frame::{float_column, text_column};
use crate::players::{PlayerTable, PLAYER_COLUMNS, SLOTS, TEAM_SIZE, TEXT_COLUMNS};
use crate::rounds::{Round, Side};

/// Seconds of play after the freeze time ends.
pub const ROUND_SECONDS: f64 = 115.0;
pub const TICKRATE: f64 = crate::config::NATIVE_TICKRATE as f64;

pub fn slot_column(slot: usize, column: &str) -> String {
    format!("player{}_{}", slot, column)
}

pub fn time_remaining(tick: i64, freeze_end: i64) -> f64 {
    ROUND_SECONDS - (tick - freeze_end) as f64 / TICKRATE
}

/// Row indices into the player tables that share a (tick, round) key, in the
/// order of slot 0.
fn join_rows(players: &[PlayerTable]) -> Vec<[usize; SLOTS]> {
    let lookups: Vec<std::collections::HashMap<(i64, i64), usize>> = players
        .iter()
        .map(|p| {
            let mut index = std::collections::HashMap::with_capacity(p.rows.len());
            for (idx, row) in p.rows.iter().enumerate() {
                index.entry((row.record.tick, row.record.round)).or_insert(idx);
            }
            index
        })
        .collect();

    let Some(first) = players.first() else {
        return Vec::new();
    };

    first
        .rows
        .iter()
        .enumerate()
        .filter_map(|(idx0, row)| {
            let key = (row.record.tick, row.record.round);
            let mut joined = [idx0; SLOTS];
            for (slot, lookup) in lookups.iter().enumerate().skip(1) {
                joined[slot] = *lookup.get(&key)?;
            }
            Some(joined)
        })
        .collect()
}

/// Builds the wide row table.
#[tracing::instrument(skip_all, fields(match_id = %match_id))]
pub fn assemble(
    players: &[PlayerTable],
    rounds: &[Round],
    match_id: &str,
    numerical_match_id: Option<i64>,
) -> Result<DataFrame> {
    let rounds: std::collections::HashMap<i64, &Round> =
        rounds.iter().map(|r| (r.number, r)).collect();

    let joined: Vec<([usize; SLOTS], &Round)> = join_rows(players)
        .into_iter()
        .filter_map(|rows| {
            let round = players[0].rows[rows[0]].record.round;
            rounds.get(&round).map(|r| (rows, *r))
        })
        .collect();
    tracing::debug!(rows = joined.len(), "Joined player tables");

    let mut columns: Vec<Column> = Vec::new();
    let numeric_columns = &PLAYER_COLUMNS[TEXT_COLUMNS.len()..];

    let mut alive = vec![[0.0f64; SLOTS]; joined.len()];
    let mut health = vec![[0.0f64; SLOTS]; joined.len()];
    let mut equipment = vec![[0.0f64; SLOTS]; joined.len()];

    for player in players.iter() {
        let slot = player.slot;
        let rows: Vec<&crate::players::PlayerTick> = joined
            .iter()
            .map(|(idx, _)| &player.rows[idx[slot]])
            .collect();

        columns.push(text_column(
            &slot_column(slot, "name"),
            rows.iter().map(|r| r.record.name.clone()).collect(),
        ));
        columns.push(text_column(
            &slot_column(slot, "team_clan_name"),
            rows.iter().map(|r| r.record.team_clan_name.clone()).collect(),
        ));

        let mut cells: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); numeric_columns.len()];
        for (row_idx, row) in rows.iter().enumerate() {
            for (column, value) in cells.iter_mut().zip(row.numeric_cells(&player.rating)) {
                column.push(value);
            }

            let is_alive = if row.record.is_alive { 1.0 } else { 0.0 };
            alive[row_idx][slot] = is_alive;
            health[row_idx][slot] = row.record.health;
            equipment[row_idx][slot] = row.record.current_equip_value * is_alive;
        }
        for (name, values) in numeric_columns.iter().zip(cells) {
            columns.push(float_column(&slot_column(slot, name), values));
        }
    }

    let player0_ct: Vec<bool> = match players.first() {
        Some(first) => joined.iter().map(|(idx, _)| first.rows[idx[0]].is_ct).collect(),
        None => Vec::new(),
    };

    // The group of slot 0 is CT whenever player 0 is.
    let side_sum = |values: &[[f64; SLOTS]], side: Side| -> Vec<f64> {
        values
            .iter()
            .zip(player0_ct.iter())
            .map(|(row, p0_ct)| {
                let first_group = matches!((side, p0_ct), (Side::CT, true) | (Side::T, false));
                let group = if first_group {
                    &row[..TEAM_SIZE]
                } else {
                    &row[TEAM_SIZE..]
                };
                group.iter().sum()
            })
            .collect()
    };

    let anchor: Vec<&crate::players::PlayerTick> = joined
        .iter()
        .map(|(idx, _)| &players[0].rows[idx[0]])
        .collect();

    if let Some(id) = numerical_match_id {
        columns.push(float_column("numerical_match_id", vec![id as f64; joined.len()]));
    }
    columns.push(text_column("match_id", vec![match_id.to_owned(); joined.len()]));
    columns.push(float_column(
        "tick",
        anchor.iter().map(|r| r.record.tick as f64).collect(),
    ));
    columns.push(float_column(
        "round",
        anchor.iter().map(|r| r.record.round as f64).collect(),
    ));
    columns.push(float_column(
        "time",
        joined
            .iter()
            .zip(anchor.iter())
            .map(|((_, round), row)| time_remaining(row.record.tick, round.freeze_end))
            .collect(),
    ));
    columns.push(float_column(
        "freeze_end",
        joined.iter().map(|(_, r)| r.freeze_end as f64).collect(),
    ));
    columns.push(float_column(
        "end",
        joined.iter().map(|(_, r)| r.end as f64).collect(),
    ));
    columns.push(float_column(
        "CT_wins",
        joined
            .iter()
            .map(|(_, r)| if r.winner == Side::CT { 1.0 } else { 0.0 })
            .collect(),
    ));
    columns.push(float_column(
        "CT_score",
        joined.iter().map(|(_, r)| r.ct_score as f64).collect(),
    ));
    columns.push(float_column(
        "T_score",
        joined.iter().map(|(_, r)| r.t_score as f64).collect(),
    ));
    columns.push(float_column("CT_alive_num", side_sum(&alive, Side::CT)));
    columns.push(float_column("T_alive_num", side_sum(&alive, Side::T)));
    columns.push(float_column("CT_total_hp", side_sum(&health, Side::CT)));
    columns.push(float_column("T_total_hp", side_sum(&health, Side::T)));
    columns.push(float_column("CT_equipment_value", side_sum(&equipment, Side::CT)));
    columns.push(float_column("T_equipment_value", side_sum(&equipment, Side::T)));
    columns.push(float_column(
        "CT_losing_streak",
        anchor.iter().map(|r| r.record.ct_losing_streak).collect(),
    ));
    columns.push(float_column(
        "T_losing_streak",
        anchor.iter().map(|r| r.record.t_losing_streak).collect(),
    ));
    columns.push(float_column(
        "is_bomb_dropped",
        anchor
            .iter()
            .map(|r| if r.record.is_bomb_dropped { 1.0 } else { 0.0 })
            .collect(),
    ));

    let frame = DataFrame::new(columns)?;
    tracing::info!(rows = frame.height(), columns = frame.width(), "Assembled rows");

    Ok(frame)
}
