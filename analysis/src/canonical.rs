//! Side-normalized column naming and the fixed output schema.

use polars::prelude::*;

use crate::error::Result;
use crate::frame::{concat, floats, mask, names, text_column, texts};
use crate::players::{PLAYER_COLUMNS, SLOTS, TEAM_SIZE};

pub const UNIVERSAL_PREFIX: &str = "UNIVERSAL_";
pub const MATCH_ID: &str = "MATCH_ID";
pub const NUMERICAL_MATCH_ID: &str = "NUMERICAL_MATCH_ID";

/// Round level columns, in output order.
pub const ROUND_COLUMNS: [&str; 37] = [
    "tick",
    "round",
    "time",
    "remaining_time",
    "freeze_end",
    "end",
    "CT_wins",
    "CT_score",
    "T_score",
    "CT_alive_num",
    "T_alive_num",
    "CT_total_hp",
    "T_total_hp",
    "CT_equipment_value",
    "T_equipment_value",
    "CT_losing_streak",
    "T_losing_streak",
    "is_bomb_dropped",
    "is_bomb_being_planted",
    "is_bomb_being_defused",
    "is_bomb_defused",
    "is_bomb_planted_at_A_site",
    "is_bomb_planted_at_B_site",
    "bomb_X",
    "bomb_Y",
    "bomb_Z",
    "bomb_mx_pos1",
    "bomb_mx_pos2",
    "bomb_mx_pos3",
    "bomb_mx_pos4",
    "bomb_mx_pos5",
    "bomb_mx_pos6",
    "bomb_mx_pos7",
    "bomb_mx_pos8",
    "bomb_mx_pos9",
    "CT_clan_name",
    "T_clan_name",
];

/// Label of canonical group `idx`: `CT0`..`CT4`, then `T5`..`T9`.
pub fn group_label(idx: usize) -> String {
    if idx < TEAM_SIZE {
        format!("CT{}", idx)
    } else {
        format!("T{}", idx)
    }
}

/// Canonical group of original slot `slot` in a row where player 0 is on
/// (`player0_ct`) or off the CT side.
pub fn canonical_group(slot: usize, player0_ct: bool) -> usize {
    match (player0_ct, slot < TEAM_SIZE) {
        (true, _) => slot,
        (false, true) => slot + TEAM_SIZE,
        (false, false) => slot - TEAM_SIZE,
    }
}

fn split_slot_column(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("player")?;
    let (slot, column) = rest.split_once('_')?;
    Some((slot.parse().ok()?, column))
}

fn is_player_column(name: &str) -> bool {
    (0..SLOTS).any(|idx| {
        name.strip_prefix(&group_label(idx))
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

/// Output column names before prefixing.
fn unprefixed_columns(with_numerical_id: bool) -> Vec<String> {
    let mut columns = Vec::new();
    for idx in 0..SLOTS {
        let label = group_label(idx);
        columns.extend(
            PLAYER_COLUMNS
                .iter()
                .filter(|c| *c != "team_clan_name")
                .map(|c| format!("{}_{}", label, c)),
        );
    }
    if with_numerical_id {
        columns.push("numerical_match_id".to_owned());
    }
    columns.push("match_id".to_owned());
    columns.extend(ROUND_COLUMNS.iter().map(|c| c.to_string()));
    columns
}

fn output_name(name: &str) -> String {
    match name {
        "match_id" => MATCH_ID.to_owned(),
        "numerical_match_id" => NUMERICAL_MATCH_ID.to_owned(),
        other if is_player_column(other) => other.to_owned(),
        other => format!("{}{}", UNIVERSAL_PREFIX, other),
    }
}

/// Final column names, in order.
pub fn output_columns(with_numerical_id: bool) -> Vec<String> {
    unprefixed_columns(with_numerical_id)
        .iter()
        .map(|c| output_name(c))
        .collect()
}

/// Relabels the player slots to CT0..CT4 / T5..T9, applies the fixed column
/// order, sorts by tick and prefixes the side agnostic columns.
#[tracing::instrument(skip_all, fields(rows = frame.height()))]
pub fn canonicalize(frame: &DataFrame) -> Result<DataFrame> {
    let player0_ct: Vec<bool> = floats(frame, "player0_is_CT")?
        .iter()
        .map(|v| *v != 0.0)
        .collect();
    let with_numerical_id = frame.get_column_index("numerical_match_id").is_some();

    // Pre-clan order: the clan columns are still per group here.
    let mut order: Vec<String> = Vec::new();
    for idx in 0..SLOTS {
        let label = group_label(idx);
        order.extend(PLAYER_COLUMNS.iter().map(|c| format!("{}_{}", label, c)));
    }
    if with_numerical_id {
        order.push("numerical_match_id".to_owned());
    }
    order.push("match_id".to_owned());
    order.extend(
        ROUND_COLUMNS
            .iter()
            .filter(|c| !c.ends_with("_clan_name"))
            .map(|c| c.to_string()),
    );

    let columns = names(frame);
    let mut halves = Vec::with_capacity(2);
    for side in [true, false] {
        let on_side: Vec<bool> = player0_ct.iter().map(|ct| *ct == side).collect();
        let mut half = frame.filter(&mask(&on_side))?;
        half.set_column_names(columns.iter().map(|name| match split_slot_column(name) {
            Some((slot, column)) => {
                format!("{}_{}", group_label(canonical_group(slot, side)), column)
            }
            None => name.clone(),
        }))?;
        halves.push(half.select(order.iter().cloned())?);
    }
    let mut renamed = concat(halves)?;

    let ct_clan = texts(&renamed, &format!("{}_team_clan_name", group_label(0)))?;
    let t_clan = texts(&renamed, &format!("{}_team_clan_name", group_label(TEAM_SIZE)))?;
    renamed.hstack_mut(&[
        text_column("CT_clan_name", ct_clan),
        text_column("T_clan_name", t_clan),
    ])?;

    let unprefixed = unprefixed_columns(with_numerical_id);
    let mut sorted = renamed
        .select(unprefixed.iter().cloned())?
        .sort(["tick"], SortMultipleOptions::new().with_maintain_order(true))?;
    sorted.set_column_names(unprefixed.iter().map(|name| output_name(name)))?;

    tracing::debug!(columns = sorted.width(), "Canonical schema applied");

    Ok(sorted)
}

/// Drops the rows after the bomb was defused.
pub fn drop_defused(frame: &DataFrame) -> Result<DataFrame> {
    let kept = frame
        .clone()
        .lazy()
        .filter(col(output_name("is_bomb_defused")).eq(lit(0.0)))
        .collect()?;
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_follow_the_side_of_player0() {
        assert_eq!(3, canonical_group(3, true));
        assert_eq!(7, canonical_group(7, true));
        assert_eq!(8, canonical_group(3, false));
        assert_eq!(2, canonical_group(7, false));
    }

    #[test]
    fn prefixing() {
        assert_eq!("CT0_X", output_name("CT0_X"));
        assert_eq!("T9_hltv_KPR", output_name("T9_hltv_KPR"));
        assert_eq!("UNIVERSAL_CT_score", output_name("CT_score"));
        assert_eq!("UNIVERSAL_T_clan_name", output_name("T_clan_name"));
        assert_eq!(MATCH_ID, output_name("match_id"));
    }

    #[test]
    fn schema_width() {
        let per_group = PLAYER_COLUMNS.len() - 1;
        assert_eq!(10 * per_group + 1 + ROUND_COLUMNS.len(), output_columns(false).len());
        assert_eq!(NUMERICAL_MATCH_ID, output_columns(true)[10 * per_group]);
    }
}
