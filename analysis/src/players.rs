//! Player slots and the per-player sampled tables.

use common::TickRecord;

use crate::error::{Result, SnapshotError};
use crate::ratings::Rating;
use crate::stats::PlayerStats;
use crate::weapons::WeaponState;

/// Players per side.
pub const TEAM_SIZE: usize = 5;
pub const SLOTS: usize = 2 * TEAM_SIZE;

/// One sampled observation of a player with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTick {
    pub record: TickRecord,
    pub is_ct: bool,
    pub stats: PlayerStats,
    pub weapons: WeaponState,
}

impl PlayerTick {
    pub fn new(record: TickRecord, stats: PlayerStats) -> Self {
        let is_ct = record.team_name.as_deref() == Some("CT");
        Self {
            record,
            is_ct,
            stats,
            weapons: WeaponState::default(),
        }
    }
}

/// All sampled rows of the player in one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTable {
    pub slot: usize,
    pub name: String,
    pub rows: Vec<PlayerTick>,
    pub rating: Rating,
}

/// Names of the players starting on CT and on T, each sorted.
pub fn starting_sides(ticks: &[PlayerTick]) -> Result<(Vec<String>, Vec<String>)> {
    let mut ct = std::collections::BTreeSet::new();
    let mut t = std::collections::BTreeSet::new();
    for tick in ticks.iter().filter(|t| t.record.round == 1) {
        if tick.is_ct {
            ct.insert(tick.record.name.clone());
        } else {
            t.insert(tick.record.name.clone());
        }
    }

    if ct.len() != TEAM_SIZE || t.len() != TEAM_SIZE {
        tracing::error!(?ct, ?t, "Unexpected starting sides");
        return Err(SnapshotError::StartingSide {
            ct: ct.len(),
            t: t.len(),
        });
    }

    Ok((ct.into_iter().collect(), t.into_iter().collect()))
}

/// Splits the rows into the 10 slot tables, keeping every `stride`-th row of
/// each player.
#[tracing::instrument(skip_all, fields(stride = stride))]
pub fn split(ticks: Vec<PlayerTick>, stride: usize) -> Result<Vec<PlayerTable>> {
    let (ct, t) = starting_sides(&ticks)?;
    let names: Vec<String> = ct.into_iter().chain(t).collect();
    let slot_of: std::collections::HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(slot, name)| (name.as_str(), slot))
        .collect();

    let mut rows: Vec<Vec<PlayerTick>> = vec![Vec::new(); SLOTS];
    let mut seen = [0usize; SLOTS];
    for tick in ticks {
        let Some(slot) = slot_of.get(tick.record.name.as_str()).copied() else {
            continue;
        };
        if seen[slot] % stride == 0 {
            rows[slot].push(tick);
        }
        seen[slot] += 1;
    }

    let tables: Vec<PlayerTable> = names
        .into_iter()
        .zip(rows)
        .enumerate()
        .map(|(slot, (name, rows))| PlayerTable {
            slot,
            name,
            rows,
            rating: Rating::default(),
        })
        .collect();

    for table in tables.iter() {
        tracing::debug!(slot = table.slot, name = %table.name, rows = table.rows.len(), "Player table");
    }

    Ok(tables)
}

/// Per-player columns, in output order, without the slot prefix.
pub static PLAYER_COLUMNS: std::sync::LazyLock<Vec<String>> = std::sync::LazyLock::new(|| {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(STAT_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(
        crate::weapons::INVENTORY_WEAPONS
            .iter()
            .map(|w| format!("inventory_{}", w)),
    );
    columns.extend(
        crate::weapons::ACTIVE_WEAPONS
            .iter()
            .map(|w| format!("active_weapon_{}", w)),
    );
    columns.extend(
        crate::ratings::RATING_FIELDS
            .iter()
            .map(|f| format!("{}{}", crate::ratings::RATING_PREFIX, f)),
    );
    columns
});

/// Text columns of a player group.
pub const TEXT_COLUMNS: [&str; 2] = ["name", "team_clan_name"];

pub const BASE_COLUMNS: [&str; 38] = [
    "name",
    "team_clan_name",
    "X",
    "Y",
    "Z",
    "pitch",
    "yaw",
    "velocity_X",
    "velocity_Y",
    "velocity_Z",
    "health",
    "armor_value",
    "active_weapon_magazine_size",
    "active_weapon_ammo",
    "active_weapon_magazine_ammo_left_%",
    "active_weapon_max_ammo",
    "total_ammo_left",
    "active_weapon_total_ammo_left_%",
    "flash_duration",
    "flash_max_alpha",
    "balance",
    "current_equip_value",
    "round_start_equip_value",
    "cash_spent_this_round",
    "is_alive",
    "is_CT",
    "is_shooting",
    "is_crouching",
    "is_ducking",
    "is_duck_jumping",
    "is_walking",
    "is_spotted",
    "is_scoped",
    "is_defusing",
    "is_reloading",
    "is_in_bombsite",
    "zoom_lvl",
    "velo_modifier",
];

pub const STAT_COLUMNS: [&str; 17] = [
    "stat_kills",
    "stat_HS_kills",
    "stat_opening_kills",
    "stat_MVPs",
    "stat_deaths",
    "stat_opening_deaths",
    "stat_assists",
    "stat_flash_assists",
    "stat_damage",
    "stat_weapon_damage",
    "stat_nade_damage",
    "stat_survives",
    "stat_KPR",
    "stat_ADR",
    "stat_DPR",
    "stat_HS%",
    "stat_SPR",
];

fn flag(v: bool) -> f64 {
    if v {
        1.0
    } else {
        0.0
    }
}

impl PlayerTick {
    /// Numeric cells in `PLAYER_COLUMNS` order, after the text columns.
    pub fn numeric_cells(&self, rating: &Rating) -> Vec<f64> {
        let r = &self.record;
        let w = &self.weapons;
        let s = &self.stats;

        let mut cells = vec![
            r.x,
            r.y,
            r.z,
            r.pitch,
            r.yaw,
            r.velocity_x,
            r.velocity_y,
            r.velocity_z,
            r.health,
            r.armor_value,
            w.magazine_size,
            r.active_weapon_ammo.unwrap_or(0.0),
            w.magazine_ammo_left_pct,
            w.max_ammo,
            r.total_ammo_left.unwrap_or(0.0),
            w.total_ammo_left_pct,
            r.flash_duration,
            r.flash_max_alpha,
            r.balance,
            r.current_equip_value,
            r.round_start_equip_value,
            r.cash_spent_this_round,
            flag(r.is_alive),
            flag(self.is_ct),
            flag(r.fire),
            flag(r.in_crouch.unwrap_or(false)),
            flag(r.ducking.unwrap_or(false)),
            flag(r.in_duck_jump.unwrap_or(false)),
            flag(r.is_walking),
            flag(r.spotted),
            flag(r.is_scoped),
            flag(r.is_defusing),
            flag(r.is_in_reload),
            flag(r.in_bomb_zone),
            r.zoom_lvl,
            r.velo_modifier,
            s.kills,
            s.hs_kills,
            s.opening_kills,
            s.mvps,
            s.deaths,
            s.opening_deaths,
            s.assists,
            s.flash_assists,
            s.damage,
            s.weapon_damage,
            s.nade_damage,
            s.survives,
            s.kpr,
            s.adr,
            s.dpr,
            s.hs_pct,
            s.spr,
        ];
        cells.extend((0..crate::weapons::INVENTORY_WEAPONS.len()).map(|i| flag(w.holds(i))));
        cells.extend((0..crate::weapons::ACTIVE_WEAPONS.len()).map(|i| flag(w.wields(i))));
        cells.extend(rating.values().iter().map(|v| f64::from(*v)));
        cells
    }
}
