mod fixtures;

use analysis::source::{CsvMatchDir, MatchSource};
use analysis::SnapshotError;
use fixtures::MatchBuilder;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn write(dir: &std::path::Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).unwrap();
}

fn match_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ticks.csv",
        "\
tick,round,team_name,team_clan_name,name,X,health,is_alive,inventory,active_weapon_name,FIRE
1000.0,1,CT,Blue,alpha,12.5,100,True,\"['Knife', 'USP-S']\",USP-S,False
1000.0,1,TERRORIST,Red,foxtrot,-3,87.0,True,\"['Knife', 'Glock-18']\",,True
1001.0,1,,Red,foxtrot,-3,87.0,True,[],,False
",
    );
    write(
        dir.path(),
        "kills.csv",
        "tick,round,attacker_name,victim_name,assister_name,headshot,assistedflash\n",
    );
    write(
        dir.path(),
        "rounds.csv",
        "round,freeze_end,end,official_end,winner\n1,990,1500,,CT\n",
    );
    write(
        dir.path(),
        "smokes.csv",
        "start_tick,end_tick,round,X,Y,Z\n1000,,1,1.0,2.0,3.0\n",
    );
    dir
}

#[test]
#[traced_test]
fn reads_a_match_directory() {
    let dir = match_dir();
    let source = CsvMatchDir::new(dir.path());
    assert_eq!(dir.path().display().to_string(), source.match_id());

    let mut data = source.load().unwrap();
    assert!(logs_contain("Table is missing, treating it as empty"));

    assert_eq!(3, data.ticks.len());
    let alpha = &data.ticks[0];
    assert_eq!(1000, alpha.tick);
    assert_eq!(12.5, alpha.x);
    assert!(alpha.is_alive);
    assert_eq!(vec!["Knife".to_owned(), "USP-S".to_owned()], alpha.inventory);
    assert_eq!(None, data.ticks[1].active_weapon_name);
    assert!(data.ticks[1].fire);
    assert_eq!(None, data.ticks[2].team_name);
    assert!(data.ticks[2].inventory.is_empty());

    assert!(data.kills.is_empty());
    assert!(data.bomb.is_empty());
    assert_eq!(None, data.rounds[0].official_end);

    data.fill_hazard_end_ticks();
    assert_eq!(Some(1500), data.smokes[0].end_tick);

    assert_eq!(1, data.drop_unassigned_team_ticks().unwrap());
    assert_eq!(vec![1000, 1000], data.ticks.iter().map(|t| t.tick).collect::<Vec<_>>());
    assert!(logs_contain("Missing team_name values, removing ticks"));
}

#[test]
fn missing_required_table() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ticks.csv", "tick,round,name\n");

    let err = CsvMatchDir::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, SnapshotError::Csv { path, .. } if path.ends_with("kills.csv")));
}

#[test]
#[traced_test]
fn missing_crouch_columns_are_filled_with_false() {
    let dir = match_dir();
    let mut data = CsvMatchDir::new(dir.path()).load().unwrap();
    assert!(data.ticks.iter().all(|t| t.in_crouch.is_none()));

    data.backfill_crouch_columns();

    assert!(logs_contain("Columns were missing during the parse, filling them with 0"));
    assert!(logs_contain("in_crouch"));
    for tick in data.ticks.iter() {
        assert_eq!(Some(false), tick.in_crouch);
        assert_eq!(Some(false), tick.ducking);
        assert_eq!(Some(false), tick.in_duck_jump);
    }
}

#[test]
#[traced_test]
fn crouch_columns_present() {
    let mut data = MatchBuilder::new(1).build();
    data.ticks[0].in_crouch = Some(true);
    data.ticks[1].ducking = None;

    data.backfill_crouch_columns();

    assert!(!logs_contain("Columns were missing during the parse"));
    assert_eq!(Some(true), data.ticks[0].in_crouch);
    assert_eq!(None, data.ticks[1].ducking);
}

#[test]
fn team_labels_must_be_ct_and_terrorist() {
    let mut data = MatchBuilder::new(1).build();
    for tick in data.ticks.iter_mut() {
        tick.team_name = Some("CT".to_owned());
    }
    let err = data.drop_unassigned_team_ticks().unwrap_err();
    assert!(matches!(err, SnapshotError::UnknownTeamName(values) if values == vec!["CT".to_owned()]));
}
