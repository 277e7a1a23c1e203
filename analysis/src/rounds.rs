//! Round winners and the score entering each round.

use common::RoundRecord;

use crate::error::{Result, SnapshotError};

/// Rounds per half in regulation.
pub const REGULATION_HALF: i64 = 12;
/// Rounds per half in overtime.
pub const OVERTIME_HALF: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    CT,
    T,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::CT => Self::T,
            Self::T => Self::CT,
        }
    }
}

// Parser encodings of the round winner. The numeric form is the engine's team
// number.
static LABEL_WINNERS: phf::Map<&'static str, Side> = phf::phf_map! {
    "CT" => Side::CT,
    "T" => Side::T,
};

static CODE_WINNERS: phf::Map<&'static str, Side> = phf::phf_map! {
    "3" => Side::CT,
    "2" => Side::T,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub number: i64,
    pub freeze_end: i64,
    pub end: i64,
    pub winner: Side,
    /// Rounds won so far by the team that started on CT.
    pub team1_score: u32,
    /// Rounds won so far by the team that started on T.
    pub team2_score: u32,
    pub ct_score: u32,
    pub t_score: u32,
}

/// Zero based index of the half a round belongs to. Halves are 12 rounds in
/// regulation and 3 rounds in every overtime after that.
pub fn half_index(round: i64) -> i64 {
    if round <= REGULATION_HALF {
        0
    } else if round <= 2 * REGULATION_HALF {
        1
    } else {
        2 + (round - 2 * REGULATION_HALF - 1) / OVERTIME_HALF
    }
}

/// Side played in `round` by the team that started on CT.
pub fn team1_side(round: i64) -> Side {
    if half_index(round) % 2 == 0 {
        Side::CT
    } else {
        Side::T
    }
}

fn normalize_winners(rounds: &[RoundRecord]) -> Result<Vec<Side>> {
    let mut values: Vec<String> = Vec::new();
    for round in rounds.iter() {
        let raw = round.winner.clone().unwrap_or_default();
        if !values.contains(&raw) {
            values.push(raw);
        }
    }

    let table = if values.iter().all(|v| LABEL_WINNERS.contains_key(v.as_str())) {
        &LABEL_WINNERS
    } else if values.iter().all(|v| CODE_WINNERS.contains_key(v.as_str())) {
        &CODE_WINNERS
    } else {
        tracing::error!(?values, "Incorrect output variable values");
        return Err(SnapshotError::UnknownWinner(values));
    };
    tracing::info!(?values, "Round winner values");

    Ok(rounds
        .iter()
        .filter_map(|r| r.winner.as_deref().and_then(|w| table.get(w)).copied())
        .collect())
}

/// Validates the round table and computes the score entering every round.
#[tracing::instrument(skip_all)]
pub fn resolve(records: &[RoundRecord]) -> Result<Vec<Round>> {
    let mut records = records.to_vec();
    records.sort_by_key(|r| r.round);

    let numbers: Vec<i64> = records.iter().map(|r| r.round).collect();
    if numbers.iter().enumerate().any(|(i, n)| *n != i as i64 + 1) {
        return Err(SnapshotError::NonContiguousRounds(numbers));
    }

    let winners = normalize_winners(&records)?;

    let mut team1 = 0;
    let mut team2 = 0;
    let mut rounds = Vec::with_capacity(records.len());
    for (record, winner) in records.iter().zip(winners) {
        let team1_side = team1_side(record.round);
        let (ct_score, t_score) = match team1_side {
            Side::CT => (team1, team2),
            Side::T => (team2, team1),
        };

        rounds.push(Round {
            number: record.round,
            freeze_end: record.freeze_end,
            end: record.end,
            winner,
            team1_score: team1,
            team2_score: team2,
            ct_score,
            t_score,
        });

        if winner == team1_side {
            team1 += 1;
        } else {
            team2 += 1;
        }
    }

    tracing::debug!(rounds = rounds.len(), team1, team2, "Resolved round scores");

    Ok(rounds)
}
