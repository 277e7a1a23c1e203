//! Cumulative in-match player statistics.
//!
//! Kill and damage events are folded into one running counter set per player
//! and merged against that player's ticks in a single left-to-right pass.

use common::{DamageRecord, KillRecord, TickRecord};

use crate::config::DamageMode;
use crate::numeric::ratio;
use crate::weapons::is_nade_damage;

/// Cumulative statistics of one player at one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub kills: f64,
    pub hs_kills: f64,
    pub opening_kills: f64,
    pub mvps: f64,
    pub deaths: f64,
    pub opening_deaths: f64,
    pub assists: f64,
    pub flash_assists: f64,
    pub damage: f64,
    pub weapon_damage: f64,
    pub nade_damage: f64,
    pub survives: f64,
    pub kpr: f64,
    pub adr: f64,
    pub dpr: f64,
    pub hs_pct: f64,
    pub spr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Kills,
    HsKills,
    OpeningKills,
    Deaths,
    OpeningDeaths,
    Assists,
    FlashAssists,
    Damage,
    WeaponDamage,
    NadeDamage,
}

const COUNTERS: usize = 10;

#[derive(Debug, Clone, Copy)]
struct Event<'a> {
    /// Rows whose key is at least this value see the event.
    key: i64,
    player: &'a str,
    counter: Counter,
    amount: f64,
}

type Totals = [f64; COUNTERS];

fn push<'a>(events: &mut Vec<Event<'a>>, key: i64, player: Option<&'a str>, counter: Counter) {
    if let Some(player) = player {
        events.push(Event {
            key,
            player,
            counter,
            amount: 1.0,
        });
    }
}

fn kill_events(kills: &[KillRecord]) -> Vec<Event<'_>> {
    let mut events = Vec::with_capacity(kills.len() * 3);
    for kill in kills.iter() {
        let attacker = kill.attacker_name.as_deref();
        push(&mut events, kill.tick, attacker, Counter::Kills);
        if kill.headshot {
            push(&mut events, kill.tick, attacker, Counter::HsKills);
        }
        push(&mut events, kill.tick, kill.victim_name.as_deref(), Counter::Deaths);
        push(&mut events, kill.tick, kill.assister_name.as_deref(), Counter::Assists);
        if kill.assistedflash {
            push(&mut events, kill.tick, kill.assister_name.as_deref(), Counter::FlashAssists);
        }
    }

    for opening in opening_kills(kills) {
        push(&mut events, opening.tick, opening.attacker_name.as_deref(), Counter::OpeningKills);
        push(&mut events, opening.tick, opening.victim_name.as_deref(), Counter::OpeningDeaths);
    }

    events
}

/// The earliest kill of every round. Kills sharing the earliest tick resolve
/// to the first one in input order.
pub fn opening_kills(kills: &[KillRecord]) -> Vec<&KillRecord> {
    let mut first: std::collections::BTreeMap<i64, &KillRecord> = std::collections::BTreeMap::new();
    for kill in kills.iter() {
        first
            .entry(kill.round)
            .and_modify(|current| {
                if kill.tick < current.tick {
                    *current = kill;
                }
            })
            .or_insert(kill);
    }
    first.into_values().collect()
}

fn is_friendly_fire(damage: &DamageRecord) -> bool {
    match (&damage.attacker_team_name, &damage.victim_team_name) {
        (Some(attacker), Some(victim)) => attacker == victim,
        _ => false,
    }
}

fn damage_events(damages: &[DamageRecord], mode: DamageMode) -> Vec<Event<'_>> {
    let mut events = Vec::with_capacity(damages.len() * 2);
    for damage in damages.iter().filter(|d| !is_friendly_fire(d)) {
        let Some(player) = damage.attacker_name.as_deref() else {
            continue;
        };
        // Round totals only become visible once the round is over.
        let key = match mode {
            DamageMode::PerTick => damage.tick,
            DamageMode::PerRound => damage.round + 1,
        };
        let kind = if is_nade_damage(&damage.weapon) {
            Counter::NadeDamage
        } else {
            Counter::WeaponDamage
        };

        for counter in [Counter::Damage, kind] {
            events.push(Event {
                key,
                player,
                counter,
                amount: damage.dmg_health_real,
            });
        }
    }
    events
}

/// Applies `events` to the rows of every player whose key is at least the
/// event key. `rows` holds (player, key, row index).
fn sweep(rows: &[(&str, i64, usize)], mut events: Vec<Event<'_>>, out: &mut [Totals]) {
    let mut per_player: std::collections::HashMap<&str, Vec<Event<'_>>> =
        std::collections::HashMap::new();
    events.sort_by_key(|e| e.key);
    for event in events {
        per_player.entry(event.player).or_default().push(event);
    }

    let mut player_rows: std::collections::HashMap<&str, Vec<(i64, usize)>> =
        std::collections::HashMap::new();
    for (player, key, idx) in rows.iter() {
        player_rows.entry(*player).or_default().push((*key, *idx));
    }

    for (player, mut rows) in player_rows {
        rows.sort_by_key(|(key, _)| *key);
        let events = per_player.get(player).map(Vec::as_slice).unwrap_or(&[]);

        let mut totals: Totals = [0.0; COUNTERS];
        let mut next = 0;
        for (key, idx) in rows {
            while next < events.len() && events[next].key <= key {
                totals[events[next].counter as usize] += events[next].amount;
                next += 1;
            }
            for (slot, value) in out[idx].iter_mut().zip(totals.iter()) {
                *slot += *value;
            }
        }
    }
}

/// Statistics for every row of `ticks`, index aligned.
#[tracing::instrument(skip_all, fields(ticks = ticks.len(), kills = kills.len(), damages = damages.len()))]
pub fn accumulate(
    ticks: &[TickRecord],
    kills: &[KillRecord],
    damages: &[DamageRecord],
    mode: DamageMode,
) -> Vec<PlayerStats> {
    let mut totals: Vec<Totals> = vec![[0.0; COUNTERS]; ticks.len()];

    let by_tick: Vec<(&str, i64, usize)> = ticks
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.name.as_str(), t.tick, idx))
        .collect();
    sweep(&by_tick, kill_events(kills), &mut totals);

    let damage_rows = match mode {
        DamageMode::PerTick => by_tick,
        DamageMode::PerRound => ticks
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.name.as_str(), t.round, idx))
            .collect(),
    };
    sweep(&damage_rows, damage_events(damages, mode), &mut totals);

    ticks
        .iter()
        .zip(totals)
        .map(|(tick, totals)| derive(tick, &totals))
        .collect()
}

fn derive(tick: &TickRecord, totals: &Totals) -> PlayerStats {
    let get = |counter: Counter| totals[counter as usize];
    let round = tick.round as f64;

    let kills = get(Counter::Kills);
    let hs_kills = get(Counter::HsKills);
    let deaths = get(Counter::Deaths);
    let damage = get(Counter::Damage);
    let survives = round - deaths;

    PlayerStats {
        kills,
        hs_kills,
        opening_kills: get(Counter::OpeningKills),
        mvps: tick.mvps,
        deaths,
        opening_deaths: get(Counter::OpeningDeaths),
        assists: get(Counter::Assists),
        flash_assists: get(Counter::FlashAssists),
        damage,
        weapon_damage: get(Counter::WeaponDamage),
        nade_damage: get(Counter::NadeDamage),
        survives,
        kpr: ratio(kills, round),
        adr: ratio(damage, round),
        dpr: ratio(deaths, round),
        hs_pct: ratio(hs_kills, kills),
        spr: ratio(survives, round),
    }
}
