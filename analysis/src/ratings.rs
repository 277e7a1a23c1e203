//! External player ratings and the imputation of unknown players.
//!
//! Ratings come from two tables. The primary table is read-only. The
//! secondary table holds players missing from the primary one plus a pool of
//! anonymous `anonim_pro` rows; a player found in neither gets one of those
//! rows relabelled to their name, and the relabelling is written back through
//! a [`RatingStore`].

use crate::error::{Result, SnapshotError};
use crate::players::PlayerTable;

pub const RATING_FIELDS: [&str; 25] = [
    "rating_2.0",
    "DPR",
    "KAST",
    "Impact",
    "ADR",
    "KPR",
    "total_kills",
    "HS%",
    "total_deaths",
    "KD_ratio",
    "dmgPR",
    "grenade_dmgPR",
    "maps_played",
    "saved_by_teammatePR",
    "saved_teammatesPR",
    "opening_kill_rating",
    "team_W%_after_opening",
    "opening_kill_in_W_rounds",
    "rating_1.0_all_Career",
    "clutches_1on1_ratio",
    "clutches_won_1on1",
    "clutches_won_1on2",
    "clutches_won_1on3",
    "clutches_won_1on4",
    "clutches_won_1on5",
];

pub const RATING_PREFIX: &str = "hltv_";
pub const NAME_COLUMN: &str = "player_name";
pub const SENTINEL: &str = "anonim_pro";

const CLUTCH_RATIO: &str = "clutches_1on1_ratio";
const CLUTCH_WON: &str = "clutches_won_1on1";
const CLUTCH_LOST: &str = "clutches_lost_1on1";

/// Rating values of one player, in `RATING_FIELDS` order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rating([f32; RATING_FIELDS.len()]);

impl Rating {
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<f32> {
        RATING_FIELDS
            .iter()
            .position(|f| *f == field)
            .map(|idx| self.0[idx])
    }
}

/// A rating table as stored, every column kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingTable {
    label: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RatingTable {
    pub fn new<L>(label: L, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self
    where
        L: Into<String>,
    {
        Self {
            label: label.into(),
            headers,
            rows,
        }
    }

    pub fn from_reader<R>(label: &str, reader: R) -> Result<Self>
    where
        R: std::io::Read,
    {
        let csv_err = |source| SnapshotError::Csv {
            path: label.to_owned(),
            source,
        };

        let mut reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_owned())
            .collect();
        let rows = reader
            .records()
            .map(|r| r.map(|r| r.iter().map(|c| c.to_owned()).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()
            .map_err(csv_err)?;

        Ok(Self::new(label, headers, rows))
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let label = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|source| SnapshotError::Io {
            path: label.clone(),
            source,
        })?;
        Self::from_reader(&label, file)
    }

    pub fn write<W>(&self, writer: W) -> csv::Result<()>
    where
        W: std::io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in self.rows.iter() {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| SnapshotError::MissingColumn {
            table: self.label.clone(),
            column: name.to_owned(),
        })
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row].get(column).map(String::as_str).unwrap_or("")
    }

    fn number(&self, row: usize, column: usize) -> Result<f64> {
        let raw = self.cell(row, column).trim();
        match raw {
            "" | "nan" | "NaN" => Ok(0.0),
            other => other.parse().map_err(|_| SnapshotError::InvalidNumber {
                table: self.label.clone(),
                column: self.headers[column].clone(),
                value: other.to_owned(),
            }),
        }
    }

    pub fn names(&self) -> Result<Vec<&str>> {
        let name = self.require(NAME_COLUMN)?;
        Ok((0..self.rows.len()).map(|r| self.cell(r, name)).collect())
    }

    /// Parses one row. A missing clutch ratio is derived from the clutch
    /// counters.
    pub fn rating(&self, row: usize) -> Result<Rating> {
        let mut values = [0.0f32; RATING_FIELDS.len()];
        for (value, field) in values.iter_mut().zip(RATING_FIELDS) {
            let number = match (self.column(field), field) {
                (Some(column), _) => self.number(row, column)?,
                (None, CLUTCH_RATIO) => {
                    let won = self.number(row, self.require(CLUTCH_WON)?)?;
                    let lost = self.number(row, self.require(CLUTCH_LOST)?)?;
                    crate::numeric::ratio(won, lost)
                }
                (None, field) => {
                    return Err(SnapshotError::MissingColumn {
                        table: self.label.clone(),
                        column: field.to_owned(),
                    })
                }
            };
            *value = number as f32;
        }
        Ok(Rating(values))
    }

    /// Every rating row recorded for `player`, in table order.
    pub fn lookup(&self, player: &str) -> Result<Vec<Rating>> {
        let name = self.require(NAME_COLUMN)?;
        (0..self.rows.len())
            .filter(|idx| self.cell(*idx, name) == player)
            .map(|idx| self.rating(idx))
            .collect()
    }

    /// Like [`RatingTable::lookup`], with exact duplicate rows collapsed.
    pub fn lookup_distinct(&self, player: &str) -> Result<Vec<Rating>> {
        let name = self.require(NAME_COLUMN)?;
        let mut found: Vec<Rating> = Vec::new();
        let mut seen_rows: Vec<&Vec<String>> = Vec::new();
        for (idx, row) in self.rows.iter().enumerate() {
            if self.cell(idx, name) != player || seen_rows.contains(&row) {
                continue;
            }
            seen_rows.push(row);
            found.push(self.rating(idx)?);
        }
        Ok(found)
    }

    /// Relabels the first sentinel row to `player` and returns its rating.
    pub fn impute(&mut self, player: &str) -> Result<Rating> {
        let name = self.require(NAME_COLUMN)?;
        let row = (0..self.rows.len())
            .find(|r| self.cell(*r, name) == SENTINEL)
            .ok_or_else(|| SnapshotError::MissingSentinel {
                player: player.to_owned(),
                sentinel: SENTINEL.to_owned(),
            })?;

        let rating = self.rating(row)?;
        if self.rows[row].len() <= name {
            self.rows[row].resize(name + 1, String::new());
        }
        self.rows[row][name] = player.to_owned();
        Ok(rating)
    }
}

/// Read-modify-write access to the secondary rating table.
pub trait RatingStore {
    fn load(&mut self) -> Result<RatingTable>;

    fn save(&mut self, table: &RatingTable) -> Result<()>;
}

pub struct CsvRatingStore {
    path: std::path::PathBuf,
}

impl CsvRatingStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self { path: path.into() }
    }
}

impl RatingStore for CsvRatingStore {
    fn load(&mut self) -> Result<RatingTable> {
        RatingTable::load(&self.path)
    }

    fn save(&mut self, table: &RatingTable) -> Result<()> {
        let path = self.path.display().to_string();
        let file = std::fs::File::create(&self.path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        table
            .write(std::io::BufWriter::new(file))
            .map_err(|source| SnapshotError::Csv { path, source })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRatingStore {
    pub table: RatingTable,
    pub saves: usize,
}

impl MemoryRatingStore {
    pub fn new(table: RatingTable) -> Self {
        Self { table, saves: 0 }
    }
}

impl RatingStore for MemoryRatingStore {
    fn load(&mut self) -> Result<RatingTable> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &RatingTable) -> Result<()> {
        self.table = table.clone();
        self.saves += 1;
        Ok(())
    }
}

/// Where a player's rating came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RatingSource {
    Primary,
    Secondary,
    Imputed,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Resolution {
    pub player: String,
    pub source: RatingSource,
}

/// Attaches a rating to every player table.
///
/// The secondary table is loaded at most once and saved once at the end,
/// only if a player was imputed.
#[tracing::instrument(skip_all)]
pub fn attach(
    players: &mut [PlayerTable],
    primary: &RatingTable,
    store: &mut dyn RatingStore,
) -> Result<Vec<Resolution>> {
    let mut secondary: Option<RatingTable> = None;
    let mut dirty = false;
    let mut resolutions = Vec::with_capacity(players.len());

    for player in players.iter_mut() {
        let found = primary.lookup_distinct(&player.name)?;
        if let [rating] = found.as_slice() {
            player.rating = *rating;
            resolutions.push(Resolution {
                player: player.name.clone(),
                source: RatingSource::Primary,
            });
            continue;
        }
        if found.len() > 1 {
            tracing::warn!(player = %player.name, rows = found.len(), "Ambiguous primary rating rows");
        }

        let table = match secondary {
            Some(ref mut table) => table,
            None => secondary.insert(store.load()?),
        };

        let found = table.lookup(&player.name)?;
        let source = if let [rating] = found.as_slice() {
            player.rating = *rating;
            RatingSource::Secondary
        } else {
            player.rating = table.impute(&player.name)?;
            dirty = true;
            tracing::warn!(player = %player.name, "Player has no rating, imputed from {}", SENTINEL);
            RatingSource::Imputed
        };
        resolutions.push(Resolution {
            player: player.name.clone(),
            source,
        });
    }

    if let (true, Some(table)) = (dirty, secondary.as_ref()) {
        store.save(table)?;
    }

    Ok(resolutions)
}
