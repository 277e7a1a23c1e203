/// Invalid run configuration. Raised before any input is read.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid ticks_per_second {0}: must be one of 1, 2, 4, 8, 16, 32 or 64")]
    TicksPerSecond(u32),
    #[error("num_permutations_per_round must be at least 1")]
    Permutations,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unrecognized round winner values {0:?}")]
    UnknownWinner(Vec<String>),
    #[error("unrecognized player team values {0:?}")]
    UnknownTeamName(Vec<String>),
    #[error("round numbers must be contiguous from 1, got {0:?}")]
    NonContiguousRounds(Vec<i64>),
    #[error("expected 5 players starting on each side, found {ct} CT and {t} T")]
    StartingSide { ct: usize, t: usize },
    #[error("player {player:?} is missing from both rating tables and no {sentinel:?} row is left")]
    MissingSentinel { player: String, sentinel: String },
    #[error("column {column:?} is missing from {table}")]
    MissingColumn { table: String, column: String },
    #[error("invalid number {value:?} in column {column:?} of {table}")]
    InvalidNumber {
        table: String,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;
