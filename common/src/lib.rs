//! Record types produced by the replay parser and consumed by the snapshot
//! pipeline.
//!
//! Every type here mirrors one table of the parser's export. Field names follow
//! the export's column names so the records can be read straight from CSV.

pub mod de;
pub mod records;

pub use records::{
    BombRecord, DamageRecord, GrenadeRecord, InfernoRecord, KillRecord, RoundRecord, SmokeRecord,
    TickRecord,
};
