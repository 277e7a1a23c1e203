#![allow(dead_code)]

use analysis::ratings::{RatingTable, RATING_FIELDS, SENTINEL};
use analysis::source::{MatchData, MemoryMatch};
use analysis::weapons::{WeaponInfo, WeaponTable};
use common::{
    BombRecord, DamageRecord, GrenadeRecord, InfernoRecord, KillRecord, RoundRecord, SmokeRecord,
    TickRecord,
};

pub const STARTING_CT: [&str; 5] = ["alpha", "bravo", "charlie", "delta", "echo"];
pub const STARTING_T: [&str; 5] = ["foxtrot", "golf", "hotel", "india", "juliet"];

/// Ticks between the start of two rounds.
pub const ROUND_SPACING: i64 = 1000;

pub fn round_start(round: i64) -> i64 {
    round * ROUND_SPACING
}

pub fn tick_record(tick: i64, round: i64, name: &str, team: &str) -> TickRecord {
    TickRecord {
        tick,
        round,
        team_name: Some(team.to_owned()),
        team_clan_name: if STARTING_CT.contains(&name) {
            "Blue".to_owned()
        } else {
            "Red".to_owned()
        },
        name: name.to_owned(),
        x: 10.0,
        y: 20.0,
        z: 0.0,
        pitch: 0.0,
        yaw: 90.0,
        velocity_x: 0.0,
        velocity_y: 0.0,
        velocity_z: 0.0,
        inventory: vec!["Knife".to_owned(), "USP-S".to_owned()],
        health: 100.0,
        armor_value: 100.0,
        active_weapon_name: Some("USP-S".to_owned()),
        active_weapon_ammo: Some(6.0),
        total_ammo_left: Some(24.0),
        is_alive: true,
        in_crouch: Some(false),
        ducking: Some(false),
        in_duck_jump: Some(false),
        is_walking: false,
        spotted: false,
        is_scoped: false,
        is_defusing: false,
        is_in_reload: false,
        in_bomb_zone: false,
        fire: false,
        zoom_lvl: 0.0,
        flash_duration: 0.0,
        flash_max_alpha: 0.0,
        mvps: 0.0,
        velo_modifier: 1.0,
        balance: 800.0,
        current_equip_value: 200.0,
        round_start_equip_value: 200.0,
        total_cash_spent: 0.0,
        cash_spent_this_round: 0.0,
        ct_losing_streak: 0.0,
        t_losing_streak: 0.0,
        is_bomb_dropped: false,
    }
}

pub fn kill(tick: i64, round: i64, attacker: &str, victim: &str) -> KillRecord {
    KillRecord {
        tick,
        round,
        attacker_name: Some(attacker.to_owned()),
        victim_name: Some(victim.to_owned()),
        assister_name: None,
        headshot: false,
        assistedflash: false,
    }
}

pub fn damage(tick: i64, round: i64, attacker: &str, victim: &str, weapon: &str, dmg: f64) -> DamageRecord {
    let team = |name: &str| {
        if STARTING_CT.contains(&name) {
            "CT".to_owned()
        } else {
            "TERRORIST".to_owned()
        }
    };
    DamageRecord {
        tick,
        round,
        attacker_name: Some(attacker.to_owned()),
        attacker_team_name: Some(team(attacker)),
        victim_name: Some(victim.to_owned()),
        victim_team_name: Some(team(victim)),
        weapon: weapon.to_owned(),
        dmg_health_real: dmg,
    }
}

/// A match with every player present at every tick.
pub struct MatchBuilder {
    pub rounds: i64,
    pub ticks_per_round: i64,
    pub winners: Vec<String>,
    pub kills: Vec<KillRecord>,
    pub damages: Vec<DamageRecord>,
    pub bomb: Vec<BombRecord>,
    pub smokes: Vec<SmokeRecord>,
    pub infernos: Vec<InfernoRecord>,
    pub grenades: Vec<GrenadeRecord>,
}

impl MatchBuilder {
    pub fn new(rounds: i64) -> Self {
        Self {
            rounds,
            ticks_per_round: 64,
            winners: vec!["CT".to_owned(); rounds as usize],
            kills: Vec::new(),
            damages: Vec::new(),
            bomb: Vec::new(),
            smokes: Vec::new(),
            infernos: Vec::new(),
            grenades: Vec::new(),
        }
    }

    pub fn ticks_per_round(mut self, ticks: i64) -> Self {
        self.ticks_per_round = ticks;
        self
    }

    pub fn winners(mut self, winners: &[&str]) -> Self {
        self.winners = winners.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn kill(mut self, kill: KillRecord) -> Self {
        self.kills.push(kill);
        self
    }

    pub fn damage(mut self, damage: DamageRecord) -> Self {
        self.damages.push(damage);
        self
    }

    pub fn bomb(mut self, bomb: BombRecord) -> Self {
        self.bomb.push(bomb);
        self
    }

    pub fn smoke(mut self, smoke: SmokeRecord) -> Self {
        self.smokes.push(smoke);
        self
    }

    pub fn inferno(mut self, inferno: InfernoRecord) -> Self {
        self.infernos.push(inferno);
        self
    }

    pub fn grenade(mut self, grenade: GrenadeRecord) -> Self {
        self.grenades.push(grenade);
        self
    }

    pub fn ticks(&self) -> Vec<TickRecord> {
        let mut ticks = Vec::new();
        for round in 1..=self.rounds {
            let (first, second) = if analysis::rounds::team1_side(round) == analysis::rounds::Side::CT {
                ("CT", "TERRORIST")
            } else {
                ("TERRORIST", "CT")
            };
            for offset in 0..self.ticks_per_round {
                let tick = round_start(round) + offset;
                for name in STARTING_CT {
                    ticks.push(tick_record(tick, round, name, first));
                }
                for name in STARTING_T {
                    ticks.push(tick_record(tick, round, name, second));
                }
            }
        }
        ticks
    }

    pub fn round_records(&self) -> Vec<RoundRecord> {
        (1..=self.rounds)
            .map(|round| RoundRecord {
                round,
                freeze_end: round_start(round),
                end: round_start(round) + self.ticks_per_round - 1,
                official_end: Some(round_start(round) + self.ticks_per_round + 100),
                winner: self.winners.get(round as usize - 1).cloned(),
            })
            .collect()
    }

    pub fn build(&self) -> MatchData {
        MatchData {
            ticks: self.ticks(),
            kills: self.kills.clone(),
            rounds: self.round_records(),
            bomb: self.bomb.clone(),
            damages: self.damages.clone(),
            smokes: self.smokes.clone(),
            infernos: self.infernos.clone(),
            grenades: self.grenades.clone(),
        }
    }

    pub fn source(&self) -> MemoryMatch {
        MemoryMatch {
            id: "matches/synthetic".to_owned(),
            data: self.build(),
        }
    }
}

pub fn weapon_table() -> WeaponTable {
    let row = |name: &str, magazine_size: f64, total_ammo: f64| WeaponInfo {
        weapon_name: name.to_owned(),
        magazine_size,
        total_ammo,
    };
    WeaponTable::new(vec![
        row("C4", 0.0, 0.0),
        row("Knife", 0.0, 0.0),
        row("USP-S", 12.0, 24.0),
        row("AK-47", 30.0, 90.0),
    ])
}

pub fn rating_headers() -> Vec<String> {
    std::iter::once("player_name")
        .chain(RATING_FIELDS)
        .map(|h| h.to_owned())
        .collect()
}

/// A rating row whose values are all `value`.
pub fn rating_row(name: &str, value: f64) -> Vec<String> {
    std::iter::once(name.to_owned())
        .chain(RATING_FIELDS.iter().map(|_| value.to_string()))
        .collect()
}

pub fn primary_ratings(names: &[&str]) -> RatingTable {
    let rows = names
        .iter()
        .enumerate()
        .map(|(idx, name)| rating_row(name, 1.0 + idx as f64 / 10.0))
        .collect();
    RatingTable::new("primary", rating_headers(), rows)
}

pub fn secondary_ratings(sentinels: usize) -> RatingTable {
    let rows = (0..sentinels)
        .map(|idx| rating_row(SENTINEL, 0.5 + idx as f64 / 100.0))
        .collect();
    RatingTable::new("secondary", rating_headers(), rows)
}

pub fn all_players() -> Vec<&'static str> {
    STARTING_CT.iter().chain(STARTING_T.iter()).copied().collect()
}
