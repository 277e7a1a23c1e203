pub mod assemble;
pub mod bomb;
pub mod canonical;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod frame;
pub mod hazards;
pub mod numeric;
pub mod permute;
pub mod pipeline;
pub mod players;
pub mod ratings;
pub mod rounds;
pub mod source;
pub mod stats;
pub mod weapons;

pub use config::{DamageMode, SnapshotConfig, TicksPerSecond};
pub use error::{ConfigError, Result, SnapshotError};
pub use pipeline::{process_match, SnapshotOutput};
