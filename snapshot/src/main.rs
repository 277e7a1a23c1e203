use anyhow::Context;
use clap::Parser;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

use analysis::ratings::{CsvRatingStore, RatingTable};
use analysis::weapons::WeaponTable;
use analysis::{DamageMode, SnapshotConfig, TicksPerSecond};

#[derive(Debug, Parser)]
#[command(about = "Turn a parsed CS2 match into a per-tick feature table")]
struct Cli {
    /// Directory with the parser's CSV exports of one match
    match_dir: std::path::PathBuf,

    /// Primary player rating table
    #[arg(long)]
    player_stats: std::path::PathBuf,

    /// Rating table for players missing from the primary one. Imputed
    /// players are written back to it.
    #[arg(long)]
    missing_player_stats: std::path::PathBuf,

    /// Weapon reference table (weapon_name, magazine_size, total_ammo)
    #[arg(long)]
    weapon_data: std::path::PathBuf,

    /// Samples per second: 1, 2, 4, 8, 16, 32 or 64
    #[arg(long, default_value_t = 1)]
    ticks_per_second: u32,

    #[arg(long)]
    numerical_match_id: Option<i64>,

    /// Only account damage at the end of each round
    #[arg(long)]
    sum_damages_per_round: bool,

    /// How many times each round appears, with the first team's players
    /// shuffled in every extra copy
    #[arg(long, default_value_t = 1)]
    permutations_per_round: u32,

    #[arg(long)]
    permutation_seed: Option<u64>,

    #[arg(long)]
    no_dictionary: bool,

    #[arg(long, short, default_value = "snapshot/")]
    output: std::path::PathBuf,

    /// More logging, repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, serde::Serialize)]
struct Summary<'o> {
    match_id: String,
    rows: usize,
    columns: usize,
    active_smokes: usize,
    active_infernos: usize,
    active_he: usize,
    dropped_ticks: usize,
    ratings: &'o [analysis::ratings::Resolution],
}

fn write_table(table: &mut DataFrame, path: &std::path::Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("Creating {}", path.display()))?;
    CsvWriter::new(std::io::BufWriter::new(file))
        .include_header(true)
        .finish(table)
        .with_context(|| format!("Writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = table.height(), "Wrote table");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(move |meta| {
            (meta.target().contains("analysis") || meta.target().contains("snapshot"))
                && *meta.level() <= level
        }));
    tracing::subscriber::set_global_default(registry).context("Installing logger")?;

    let config = SnapshotConfig {
        ticks_per_second: TicksPerSecond::try_from(args.ticks_per_second)?,
        numerical_match_id: args.numerical_match_id,
        damage_mode: if args.sum_damages_per_round {
            DamageMode::PerRound
        } else {
            DamageMode::PerTick
        },
        num_permutations_per_round: args.permutations_per_round,
        permutation_seed: args.permutation_seed,
        build_dictionary: !args.no_dictionary,
    };
    config.validate()?;

    let weapons = WeaponTable::load(&args.weapon_data).context("Loading weapon data")?;
    let primary = RatingTable::load(&args.player_stats).context("Loading player ratings")?;
    let mut store = CsvRatingStore::new(args.missing_player_stats.clone());
    let source = analysis::source::CsvMatchDir::new(args.match_dir.clone());

    let mut output = analysis::process_match(&source, &weapons, &primary, &mut store, &config)
        .with_context(|| format!("Processing {}", args.match_dir.display()))?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;
    write_table(&mut output.table, &args.output.join("snapshot.csv"))?;
    if let Some(dictionary) = output.dictionary.as_mut() {
        write_table(dictionary, &args.output.join("dictionary.csv"))?;
    }
    write_table(&mut output.hazards.smokes, &args.output.join("active_smokes.csv"))?;
    write_table(&mut output.hazards.infernos, &args.output.join("active_infernos.csv"))?;
    write_table(&mut output.hazards.he, &args.output.join("active_he.csv"))?;

    let summary = Summary {
        match_id: analysis::source::MatchSource::match_id(&source),
        rows: output.table.height(),
        columns: output.table.width(),
        active_smokes: output.hazards.smokes.height(),
        active_infernos: output.hazards.infernos.height(),
        active_he: output.hazards.he.height(),
        dropped_ticks: output.dropped_ticks,
        ratings: &output.ratings,
    };
    let summary_path = args.output.join("summary.json");
    let file = std::fs::File::create(&summary_path)
        .with_context(|| format!("Creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &summary).context("Writing summary")?;

    tracing::info!(rows = summary.rows, output = %args.output.display(), "Done");

    Ok(())
}
