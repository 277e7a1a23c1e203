//! Loading of parser exports and the clean-up applied before the pipeline.

use common::{
    BombRecord, DamageRecord, GrenadeRecord, InfernoRecord, KillRecord, RoundRecord, SmokeRecord,
    TickRecord,
};

use crate::error::{Result, SnapshotError};

/// More dropped ticks than this and the whole match is suspect.
const CORRUPT_TICK_WARN_LIMIT: usize = 10;

const HE_GRENADE: &str = "he_grenade";

/// Raw tables of one parsed match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchData {
    pub ticks: Vec<TickRecord>,
    pub kills: Vec<KillRecord>,
    pub rounds: Vec<RoundRecord>,
    pub bomb: Vec<BombRecord>,
    pub damages: Vec<DamageRecord>,
    pub smokes: Vec<SmokeRecord>,
    pub infernos: Vec<InfernoRecord>,
    pub grenades: Vec<GrenadeRecord>,
}

pub trait MatchSource {
    /// Identifier written to the `MATCH_ID` column.
    fn match_id(&self) -> String;

    fn load(&self) -> Result<MatchData>;
}

/// A directory holding one CSV file per parser table.
pub struct CsvMatchDir {
    path: std::path::PathBuf,
}

impl CsvMatchDir {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self { path: path.into() }
    }

    fn required<T>(&self, file: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        read_csv(&self.path.join(file))
    }

    fn optional<T>(&self, file: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let path = self.path.join(file);
        if !path.exists() {
            tracing::warn!(?path, "Table is missing, treating it as empty");
            return Ok(Vec::new());
        }
        read_csv(&path)
    }
}

impl MatchSource for CsvMatchDir {
    fn match_id(&self) -> String {
        self.path.display().to_string()
    }

    #[tracing::instrument(name = "LoadMatch", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<MatchData> {
        let data = MatchData {
            ticks: self.required("ticks.csv")?,
            kills: self.required("kills.csv")?,
            rounds: self.required("rounds.csv")?,
            bomb: self.optional("bomb.csv")?,
            damages: self.optional("damages.csv")?,
            smokes: self.optional("smokes.csv")?,
            infernos: self.optional("infernos.csv")?,
            grenades: self.optional("grenades.csv")?,
        };

        tracing::debug!(
            ticks = data.ticks.len(),
            kills = data.kills.len(),
            rounds = data.rounds.len(),
            damages = data.damages.len(),
            "Loaded match tables"
        );

        Ok(data)
    }
}

/// A match already held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMatch {
    pub id: String,
    pub data: MatchData,
}

impl MatchSource for MemoryMatch {
    fn match_id(&self) -> String {
        self.id.clone()
    }

    fn load(&self) -> Result<MatchData> {
        Ok(self.data.clone())
    }
}

pub(crate) fn read_csv<T>(path: &std::path::Path) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let csv_err = |source| SnapshotError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Position of an HE detonation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeDetonation {
    pub tick: i64,
    pub round: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MatchData {
    /// Smokes and infernos still burning when the round ended have no end
    /// tick; they end with the round. Events of unknown rounds are dropped.
    pub fn fill_hazard_end_ticks(&mut self) {
        let official_end: std::collections::HashMap<i64, Option<i64>> = self
            .rounds
            .iter()
            .map(|r| (r.round, r.official_end.or(Some(r.end))))
            .collect();

        self.smokes.retain(|s| official_end.contains_key(&s.round));
        for smoke in self.smokes.iter_mut().filter(|s| s.end_tick.is_none()) {
            smoke.end_tick = official_end.get(&smoke.round).copied().flatten();
        }

        self.infernos.retain(|i| official_end.contains_key(&i.round));
        for inferno in self.infernos.iter_mut().filter(|i| i.end_tick.is_none()) {
            inferno.end_tick = official_end.get(&inferno.round).copied().flatten();
        }
    }

    /// One detonation per HE grenade entity.
    ///
    /// The grenade table holds every trajectory sample; repeated positions are
    /// collapsed first and the last remaining sample of each entity is where
    /// it went off.
    pub fn he_detonations(&self) -> Vec<HeDetonation> {
        let mut seen_positions = std::collections::HashSet::new();
        let samples: Vec<&GrenadeRecord> = self
            .grenades
            .iter()
            .filter(|g| g.grenade_type == HE_GRENADE)
            .filter(|g| {
                let key = (
                    g.x.map(f64::to_bits),
                    g.y.map(f64::to_bits),
                    g.z.map(f64::to_bits),
                );
                seen_positions.insert(key)
            })
            .collect();

        let mut last_per_entity = std::collections::HashMap::new();
        for (idx, sample) in samples.iter().enumerate() {
            last_per_entity.insert(sample.entity_id, idx);
        }
        let mut keep: Vec<usize> = last_per_entity.into_values().collect();
        keep.sort_unstable();

        keep.into_iter()
            .map(|idx| samples[idx])
            .filter_map(|g| {
                Some(HeDetonation {
                    tick: g.tick,
                    round: g.round,
                    x: g.x?,
                    y: g.y?,
                    z: g.z?,
                })
            })
            .collect()
    }

    /// Older parser versions do not export the crouch and duck flags. A flag
    /// absent from every row is filled with `false`.
    pub fn backfill_crouch_columns(&mut self) {
        if self.ticks.is_empty() {
            return;
        }

        let mut missing: Vec<&str> = Vec::new();
        if self.ticks.iter().all(|t| t.in_crouch.is_none()) {
            missing.push("in_crouch");
            self.ticks.iter_mut().for_each(|t| t.in_crouch = Some(false));
        }
        if self.ticks.iter().all(|t| t.ducking.is_none()) {
            missing.push("ducking");
            self.ticks.iter_mut().for_each(|t| t.ducking = Some(false));
        }
        if self.ticks.iter().all(|t| t.in_duck_jump.is_none()) {
            missing.push("in_duck_jump");
            self.ticks.iter_mut().for_each(|t| t.in_duck_jump = Some(false));
        }

        if !missing.is_empty() {
            tracing::warn!(
                ?missing,
                "Columns were missing during the parse, filling them with 0"
            );
        }
    }

    /// Validates the team labels of the tick table.
    ///
    /// Labels other than `CT` and `TERRORIST` abort the run. Rows without a
    /// label are recoverable: every tick at which one occurs is removed.
    pub fn drop_unassigned_team_ticks(&mut self) -> Result<usize> {
        let mut values: Vec<String> = Vec::new();
        for tick in self.ticks.iter() {
            let label = tick.team_name.clone().unwrap_or_default();
            if !values.contains(&label) {
                values.push(label);
            }
        }

        let known = |v: &String| v == "CT" || v == "TERRORIST" || v.is_empty();
        let complete = values.iter().any(|v| v == "CT") && values.iter().any(|v| v == "TERRORIST");
        if !values.iter().all(known) || !complete {
            tracing::error!(?values, "Incorrect player team values");
            return Err(SnapshotError::UnknownTeamName(values));
        }

        let corrupted: std::collections::BTreeSet<i64> = self
            .ticks
            .iter()
            .filter(|t| t.team_name.is_none())
            .map(|t| t.tick)
            .collect();
        if corrupted.is_empty() {
            return Ok(0);
        }

        tracing::warn!(ticks = ?corrupted, "Missing team_name values, removing ticks");
        if corrupted.len() > CORRUPT_TICK_WARN_LIMIT {
            tracing::warn!(
                count = corrupted.len(),
                "More than {} ticks are corrupted, consider not using this match",
                CORRUPT_TICK_WARN_LIMIT
            );
        }

        self.ticks.retain(|t| !corrupted.contains(&t.tick));
        Ok(corrupted.len())
    }
}
