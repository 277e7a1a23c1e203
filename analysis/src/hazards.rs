//! Area-denial effects active at each sampled tick.

use common::{InfernoRecord, SmokeRecord};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::frame::{float_column, floats};
use crate::source::HeDetonation;

/// Ticks cut from the end of a smoke, while it is already fading.
pub const SMOKE_FADE_TICKS: i64 = 112;
/// Ticks an HE detonation stays on the map.
pub const HE_DURATION_TICKS: i64 = 128;

/// A hazard at a fixed position over an inclusive tick range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub round: i64,
    pub start: i64,
    pub end: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Hazard {
    pub fn smoke(smoke: &SmokeRecord) -> Option<Self> {
        Some(Self {
            round: smoke.round,
            start: smoke.start_tick,
            end: smoke.end_tick? - SMOKE_FADE_TICKS,
            x: smoke.x,
            y: smoke.y,
            z: smoke.z,
        })
    }

    pub fn inferno(inferno: &InfernoRecord) -> Option<Self> {
        Some(Self {
            round: inferno.round,
            start: inferno.start_tick,
            end: inferno.end_tick?,
            x: inferno.x,
            y: inferno.y,
            z: inferno.z,
        })
    }

    pub fn he(he: &HeDetonation) -> Self {
        Self {
            round: he.round,
            start: he.tick,
            end: he.tick + HE_DURATION_TICKS,
            x: he.x,
            y: he.y,
            z: he.z,
        }
    }
}

/// The (tick, round) rows of the row frame, indexed by round.
pub struct Timeline {
    ticks: Vec<i64>,
    rounds: Vec<i64>,
    /// Per round: (tick, row) sorted by tick, then by row.
    by_round: std::collections::HashMap<i64, Vec<(i64, usize)>>,
}

impl Timeline {
    pub fn new(ticks: Vec<i64>, rounds: Vec<i64>) -> Self {
        let mut by_round: std::collections::HashMap<i64, Vec<(i64, usize)>> =
            std::collections::HashMap::new();
        for (row, (tick, round)) in ticks.iter().zip(rounds.iter()).enumerate() {
            by_round.entry(*round).or_default().push((*tick, row));
        }
        for rows in by_round.values_mut() {
            rows.sort_unstable();
        }

        Self {
            ticks,
            rounds,
            by_round,
        }
    }

    pub fn from_frame(frame: &DataFrame) -> Result<Self> {
        let ticks = floats(frame, "tick")?.iter().map(|t| *t as i64).collect();
        let rounds = floats(frame, "round")?.iter().map(|r| *r as i64).collect();
        Ok(Self::new(ticks, rounds))
    }

    /// Rows of `round` with a tick inside `start..=end`, in frame order.
    pub fn rows_within(&self, round: i64, start: i64, end: i64) -> Vec<usize> {
        let Some(rows) = self.by_round.get(&round) else {
            return Vec::new();
        };
        if start > end {
            return Vec::new();
        }

        let lo = rows.partition_point(|(tick, _)| *tick < start);
        let hi = rows.partition_point(|(tick, _)| *tick <= end);
        let mut matched: Vec<usize> = rows[lo..hi].iter().map(|(_, row)| *row).collect();
        matched.sort_unstable();
        matched
    }
}

/// One row per (hazard, covered row): `tick, round, X, Y, Z`.
pub fn active<I>(timeline: &Timeline, hazards: I) -> Result<DataFrame>
where
    I: IntoIterator<Item = Hazard>,
{
    let mut tick = Vec::new();
    let mut round = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();

    for hazard in hazards {
        for row in timeline.rows_within(hazard.round, hazard.start, hazard.end) {
            tick.push(timeline.ticks[row] as f64);
            round.push(timeline.rounds[row] as f64);
            x.push(hazard.x);
            y.push(hazard.y);
            z.push(hazard.z);
        }
    }

    let frame = DataFrame::new(vec![
        float_column("tick", tick),
        float_column("round", round),
        float_column("X", x),
        float_column("Y", y),
        float_column("Z", z),
    ])?;
    Ok(frame)
}

#[derive(Debug, Clone)]
pub struct ActiveHazards {
    pub smokes: DataFrame,
    pub infernos: DataFrame,
    pub he: DataFrame,
}

#[tracing::instrument(skip_all, fields(smokes = smokes.len(), infernos = infernos.len(), he = he.len()))]
pub fn map(
    timeline: &Timeline,
    smokes: &[SmokeRecord],
    infernos: &[InfernoRecord],
    he: &[HeDetonation],
) -> Result<ActiveHazards> {
    let hazards = ActiveHazards {
        smokes: active(timeline, smokes.iter().filter_map(Hazard::smoke))?,
        infernos: active(timeline, infernos.iter().filter_map(Hazard::inferno))?,
        he: active(timeline, he.iter().map(Hazard::he))?,
    };

    tracing::debug!(
        smokes = hazards.smokes.height(),
        infernos = hazards.infernos.height(),
        he = hazards.he.height(),
        "Mapped active hazards"
    );

    Ok(hazards)
}
