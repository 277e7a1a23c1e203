mod fixtures;

use analysis::players::PlayerTable;
use analysis::ratings::{
    self, CsvRatingStore, MemoryRatingStore, RatingSource, RatingStore, RatingTable, SENTINEL,
};
use analysis::SnapshotError;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn players(names: &[&str]) -> Vec<PlayerTable> {
    names
        .iter()
        .enumerate()
        .map(|(slot, name)| PlayerTable {
            slot,
            name: name.to_string(),
            rows: Vec::new(),
            rating: Default::default(),
        })
        .collect()
}

#[test]
fn primary_match_is_used() {
    let primary = fixtures::primary_ratings(&["alpha", "bravo"]);
    let mut store = MemoryRatingStore::new(fixtures::secondary_ratings(1));
    let mut tables = players(&["alpha", "bravo"]);

    let resolved = ratings::attach(&mut tables, &primary, &mut store).unwrap();

    assert_eq!(RatingSource::Primary, resolved[1].source);
    assert_eq!(Some(1.1), tables[1].rating.get("rating_2.0"));
    assert_eq!(25, tables[1].rating.values().len());
    assert_eq!(0, store.saves);
}

#[test]
fn exact_duplicates_in_primary_collapse() {
    let primary = RatingTable::new(
        "primary",
        fixtures::rating_headers(),
        vec![fixtures::rating_row("alpha", 2.0), fixtures::rating_row("alpha", 2.0)],
    );
    let mut store = MemoryRatingStore::new(fixtures::secondary_ratings(1));
    let mut tables = players(&["alpha"]);

    let resolved = ratings::attach(&mut tables, &primary, &mut store).unwrap();
    assert_eq!(RatingSource::Primary, resolved[0].source);
    assert_eq!(Some(2.0), tables[0].rating.get("KPR"));
}

#[test]
#[traced_test]
fn duplicated_secondary_rows_are_imputed() {
    let primary = fixtures::primary_ratings(&[]);
    let mut rows = vec![fixtures::rating_row("alpha", 4.0), fixtures::rating_row("alpha", 4.0)];
    rows.push(fixtures::rating_row(SENTINEL, 0.5));
    let mut store = MemoryRatingStore::new(RatingTable::new("secondary", fixtures::rating_headers(), rows));
    let mut tables = players(&["alpha"]);

    let resolved = ratings::attach(&mut tables, &primary, &mut store).unwrap();

    assert_eq!(RatingSource::Imputed, resolved[0].source);
    assert_eq!(Some(0.5), tables[0].rating.get("KPR"));
    assert_eq!(vec!["alpha", "alpha", "alpha"], store.table.names().unwrap());
    assert_eq!(1, store.saves);
    assert!(logs_contain("imputed from anonim_pro"));
}

#[test]
fn lookup_keeps_duplicate_rows() {
    let table = RatingTable::new(
        "ratings",
        fixtures::rating_headers(),
        vec![fixtures::rating_row("alpha", 2.0), fixtures::rating_row("alpha", 2.0)],
    );
    assert_eq!(2, table.lookup("alpha").unwrap().len());
    assert_eq!(1, table.lookup_distinct("alpha").unwrap().len());
    assert!(table.lookup("bravo").unwrap().is_empty());
}

#[test]
#[traced_test]
fn ambiguous_primary_rows_fall_back() {
    let primary = RatingTable::new(
        "primary",
        fixtures::rating_headers(),
        vec![fixtures::rating_row("alpha", 2.0), fixtures::rating_row("alpha", 3.0)],
    );
    let secondary = RatingTable::new(
        "secondary",
        fixtures::rating_headers(),
        vec![fixtures::rating_row("alpha", 4.0)],
    );
    let mut store = MemoryRatingStore::new(secondary);
    let mut tables = players(&["alpha"]);

    let resolved = ratings::attach(&mut tables, &primary, &mut store).unwrap();
    assert_eq!(RatingSource::Secondary, resolved[0].source);
    assert_eq!(Some(4.0), tables[0].rating.get("ADR"));
    assert!(logs_contain("Ambiguous primary rating rows"));
}

#[test]
#[traced_test]
fn unknown_players_take_a_sentinel_row() {
    let primary = fixtures::primary_ratings(&["alpha"]);
    let mut store = MemoryRatingStore::new(fixtures::secondary_ratings(3));
    let mut tables = players(&["alpha", "newcomer", "rookie"]);

    let resolved = ratings::attach(&mut tables, &primary, &mut store).unwrap();

    assert_eq!(RatingSource::Imputed, resolved[1].source);
    assert_eq!(RatingSource::Imputed, resolved[2].source);
    assert_eq!(Some(0.5), tables[1].rating.get("KAST"));
    assert_eq!(Some(0.51), tables[2].rating.get("KAST"));
    assert_eq!(1, store.saves);
    assert_eq!(
        vec!["newcomer", "rookie", SENTINEL],
        store.table.names().unwrap()
    );
    assert!(logs_contain("imputed from anonim_pro"));
}

#[test]
fn imputation_is_idempotent() {
    let primary = fixtures::primary_ratings(&[]);
    let mut store = MemoryRatingStore::new(fixtures::secondary_ratings(2));

    let mut first = players(&["newcomer"]);
    ratings::attach(&mut first, &primary, &mut store).unwrap();
    let after_first = store.table.clone();

    let mut second = players(&["newcomer"]);
    let resolved = ratings::attach(&mut second, &primary, &mut store).unwrap();

    assert_eq!(RatingSource::Secondary, resolved[0].source);
    assert_eq!(first[0].rating, second[0].rating);
    assert_eq!(after_first, store.table);
    assert_eq!(1, store.saves);
}

#[test]
fn no_sentinel_left_is_an_error() {
    let primary = fixtures::primary_ratings(&[]);
    let mut store = MemoryRatingStore::new(fixtures::secondary_ratings(1));
    let mut tables = players(&["first", "second"]);

    let err = ratings::attach(&mut tables, &primary, &mut store).unwrap_err();
    assert!(matches!(err, SnapshotError::MissingSentinel { player, .. } if player == "second"));
    assert_eq!(0, store.saves);
}

#[test]
fn clutch_ratio_is_derived_when_missing() {
    let data = "\
player_name,rating_2.0,DPR,KAST,Impact,ADR,KPR,total_kills,HS%,total_deaths,KD_ratio,dmgPR,grenade_dmgPR,maps_played,saved_by_teammatePR,saved_teammatesPR,opening_kill_rating,team_W%_after_opening,opening_kill_in_W_rounds,rating_1.0_all_Career,clutches_won_1on1,clutches_lost_1on1,clutches_won_1on2,clutches_won_1on3,clutches_won_1on4,clutches_won_1on5
alpha,1.1,0.6,72.5,1.2,80.1,0.8,1000,45.2,900,1.11,80.1,4.2,50,0.1,0.1,1.0,70.0,25.0,1.05,12,4,3,1,0,0
bravo,1.0,0.7,70.0,1.0,75.0,0.7,800,40.0,850,0.94,75.0,3.0,40,0.1,0.1,0.9,65.0,20.0,1.0,0,0,0,0,0,0
";
    let table = RatingTable::from_reader("inline", data.as_bytes()).unwrap();

    let alpha = table.lookup("alpha").unwrap();
    assert_eq!(Some(3.0), alpha[0].get("clutches_1on1_ratio"));
    let bravo = table.lookup("bravo").unwrap();
    assert_eq!(Some(0.0), bravo[0].get("clutches_1on1_ratio"));
}

#[test]
fn missing_rating_column_is_reported() {
    let table = RatingTable::new(
        "broken",
        vec!["player_name".to_owned(), "KPR".to_owned()],
        vec![vec!["alpha".to_owned(), "0.8".to_owned()]],
    );
    let err = table.lookup("alpha").unwrap_err();
    assert!(matches!(err, SnapshotError::MissingColumn { column, .. } if column == "rating_2.0"));
}

#[test]
fn csv_store_keeps_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_players.csv");

    let mut headers = fixtures::rating_headers();
    headers.push("country".to_owned());
    let rows = vec![
        {
            let mut row = fixtures::rating_row(SENTINEL, 0.5);
            row.push("unknown".to_owned());
            row
        },
        {
            let mut row = fixtures::rating_row(SENTINEL, 0.6);
            row.push("unknown".to_owned());
            row
        },
    ];
    let mut file = std::fs::File::create(&path).unwrap();
    RatingTable::new("seed", headers, rows).write(&mut file).unwrap();
    drop(file);

    let primary = fixtures::primary_ratings(&[]);
    let mut store = CsvRatingStore::new(&path);
    let mut tables = players(&["newcomer"]);
    ratings::attach(&mut tables, &primary, &mut store).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().ends_with(",country"));
    assert!(lines.next().unwrap().starts_with("newcomer,"));
    assert!(lines.next().unwrap().starts_with("anonim_pro,"));

    // A second run reads the relabelled row back.
    let mut again = players(&["newcomer"]);
    let resolved = ratings::attach(&mut again, &primary, &mut store).unwrap();
    assert_eq!(RatingSource::Secondary, resolved[0].source);
    assert_eq!(tables[0].rating, again[0].rating);

    let reloaded = store.load().unwrap();
    assert_eq!(2, reloaded.len());
}
