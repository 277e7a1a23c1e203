//! The per-match entry point.

use polars::prelude::DataFrame;

use crate::bomb::BombsiteGrid;
use crate::config::SnapshotConfig;
use crate::error::Result;
use crate::hazards::{ActiveHazards, Timeline};
use crate::players::PlayerTick;
use crate::ratings::{RatingStore, RatingTable, Resolution};
use crate::source::MatchSource;
use crate::weapons::WeaponTable;

#[derive(Debug, Clone)]
pub struct SnapshotOutput {
    /// One row per sampled tick, in the canonical schema.
    pub table: DataFrame,
    pub dictionary: Option<DataFrame>,
    pub hazards: ActiveHazards,
    pub ratings: Vec<Resolution>,
    /// Ticks removed because a player had no team.
    pub dropped_ticks: usize,
}

/// Turns one parsed match into its tabular snapshot.
///
/// The configuration is validated before anything is read. The secondary
/// rating table behind `store` is written to when a player is imputed.
#[tracing::instrument(name = "Snapshot", skip_all, fields(match_id = %source.match_id()))]
pub fn process_match(
    source: &dyn MatchSource,
    weapons: &WeaponTable,
    primary_ratings: &RatingTable,
    store: &mut dyn RatingStore,
    config: &SnapshotConfig,
) -> Result<SnapshotOutput> {
    config.validate()?;

    let match_id = source.match_id();
    let mut data = source.load()?;

    data.backfill_crouch_columns();
    let dropped_ticks = data.drop_unassigned_team_ticks()?;
    data.fill_hazard_end_ticks();
    let he = data.he_detonations();

    let rounds = crate::rounds::resolve(&data.rounds)?;
    let known_rounds: std::collections::HashSet<i64> = rounds.iter().map(|r| r.number).collect();
    data.ticks.retain(|t| known_rounds.contains(&t.round));
    data.ticks.sort_by_key(|t| t.tick);

    tracing::info!("Computing player statistics");
    let stats = crate::stats::accumulate(&data.ticks, &data.kills, &data.damages, config.damage_mode);
    let mut rows: Vec<PlayerTick> = data
        .ticks
        .into_iter()
        .zip(stats)
        .map(|(record, stats)| PlayerTick::new(record, stats))
        .collect();
    crate::weapons::encode(&mut rows, weapons);

    let mut players = crate::players::split(rows, config.ticks_per_second.stride())?;
    let ratings = crate::ratings::attach(&mut players, primary_ratings, store)?;

    tracing::info!("Assembling rows");
    let mut table =
        crate::assemble::assemble(&players, &rounds, &match_id, config.numerical_match_id)?;
    crate::bomb::apply(&mut table, &data.bomb, &BombsiteGrid::default())?;

    let timeline = Timeline::from_frame(&table)?;
    let hazards = crate::hazards::map(&timeline, &data.smokes, &data.infernos, &he)?;

    let table = crate::permute::augment(
        &table,
        config.num_permutations_per_round,
        config.permutation_seed,
    )?;
    let table = crate::canonical::canonicalize(&table)?;

    let dictionary = if config.build_dictionary {
        Some(crate::dictionary::build(&table)?)
    } else {
        None
    };
    let table = crate::canonical::drop_defused(&table)?;

    tracing::info!(rows = table.height(), columns = table.width(), "Snapshot complete");

    Ok(SnapshotOutput {
        table,
        dictionary,
        hazards,
        ratings,
        dropped_ticks,
    })
}
