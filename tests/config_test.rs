use cubeforge::config::{LevelParams, ParameterSheet, SearchParams, SolverConfig};
use cubeforge::error::CubeForgeError;
use cubeforge::pieces::Level;
use rstest::rstest;

mod common;
use common::PARAMETER_SHEET;

fn sheet(text: &str) -> ParameterSheet {
    ParameterSheet::from_reader(text.as_bytes()).expect("sheet parses")
}

#[test]
fn test_sheet_reads_every_named_set() {
    let s = sheet(PARAMETER_SHEET);
    let names: Vec<&str> = s.sets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Quick", "Deep"]);
}

#[rstest]
#[case(Level::E1, 10_000)]
#[case(Level::E2, 20_000)]
#[case(Level::E3, 50_000)]
fn test_thousands_separator_is_stripped(#[case] level: Level, #[case] expected: usize) {
    let s = sheet(PARAMETER_SHEET);
    let deep = s.set("Deep").unwrap();
    assert_eq!(deep.max_iterations(level).unwrap(), expected);
}

#[test]
fn test_set_builds_full_config() {
    let s = sheet(PARAMETER_SHEET);
    let cfg = s.set("Deep").unwrap().to_config(SearchParams::default()).unwrap();

    assert_eq!(cfg.run.no_moves_to_shuffle, 25);
    assert_eq!(cfg.run.total_runs, 3);
    assert_eq!(cfg.run.solutions_per_run, 2);

    let e2 = cfg.level(Level::E2).unwrap();
    assert_eq!(
        *e2,
        LevelParams {
            max_iterations: 20_000,
            max_moves_per_sequence: 8,
            target_correct_stones: 12,
            no_improvement_threshold: 40,
            variability: 80,
        }
    );
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_run_params_fall_back_to_defaults() {
    let text = "Parameter;Only\nMAX_ITERATIONS E1;5\n";
    let s = sheet(text);
    let run = s.set("Only").unwrap().run_params().unwrap();
    assert_eq!(run.no_moves_to_shuffle, 0);
    assert_eq!(run.total_runs, 1);
    assert_eq!(run.solutions_per_run, 1);
}

#[test]
fn test_missing_level_parameter_is_a_config_error() {
    let text = PARAMETER_SHEET.replace("VARIABILITY E3;100;100\n", "");
    let s = sheet(&text);
    let err = s
        .set("Quick")
        .unwrap()
        .to_config(SearchParams::default())
        .unwrap_err();
    match err {
        CubeForgeError::Config(msg) => assert!(msg.contains("VARIABILITY E3"), "{}", msg),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_variability_above_hundred_is_rejected() {
    let text = PARAMETER_SHEET.replace("VARIABILITY E1;100;80", "VARIABILITY E1;101;80");
    let s = sheet(&text);
    assert!(matches!(
        s.set("Quick").unwrap().level_params(Level::E1),
        Err(CubeForgeError::Config(_))
    ));
    // The other set is untouched.
    assert!(s.set("Deep").unwrap().level_params(Level::E1).is_ok());
}

#[test]
fn test_non_numeric_value_is_rejected() {
    let text = PARAMETER_SHEET.replace("TOTAL_RUNS;1;3", "TOTAL_RUNS;many;3");
    let s = sheet(&text);
    assert!(matches!(
        s.set("Quick").unwrap().run_params(),
        Err(CubeForgeError::Config(_))
    ));
}

#[test]
fn test_choose_by_name_or_at_random() {
    let s = sheet(PARAMETER_SHEET);
    let mut rng = fastrand::Rng::with_seed(3);

    assert_eq!(s.choose(Some("Deep"), &mut rng).unwrap().name, "Deep");
    assert!(matches!(
        s.choose(Some("Missing"), &mut rng),
        Err(CubeForgeError::Config(_))
    ));

    for _ in 0..20 {
        let picked = s.choose(None, &mut rng).unwrap();
        assert!(picked.name == "Quick" || picked.name == "Deep");
    }
}

#[test]
fn test_sheet_without_sets_is_rejected() {
    assert!(ParameterSheet::from_reader("Parameter\nTOTAL_RUNS\n".as_bytes()).is_err());
}

#[test]
fn test_default_config_is_valid() {
    let cfg = SolverConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.search.guard_learned_reuse);
    assert!(cfg.search.resolved_workers() >= 1);
    for level in Level::ALL {
        assert_eq!(
            cfg.level(level).unwrap().target_correct_stones,
            level.piece_count()
        );
    }
}

#[test]
fn test_json_config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = SolverConfig::default();
    cfg.search.workers = 3;
    cfg.run.total_runs = 4;
    if let Some(e1) = cfg.levels.get_mut(&Level::E1) {
        e1.variability = 40;
    }
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    let path = common::write_file(dir.path(), "solver.json", &json);

    let loaded = SolverConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.search.workers, 3);
    assert_eq!(loaded.run.total_runs, 4);
    assert_eq!(loaded.level(Level::E1).unwrap().variability, 40);
}

#[test]
fn test_json_config_fills_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "partial.json", r#"{ "run": { "no_moves_to_shuffle": 12, "total_runs": 2, "solutions_per_run": 1 } }"#);

    let loaded = SolverConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.run.no_moves_to_shuffle, 12);
    assert_eq!(loaded.levels.len(), 3);
    assert!(loaded.search.guard_learned_reuse);
}

#[test]
fn test_json_target_above_piece_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = SolverConfig::default();
    if let Some(e1) = cfg.levels.get_mut(&Level::E1) {
        e1.target_correct_stones = 9;
    }
    let json = serde_json::to_string(&cfg).unwrap();
    let path = common::write_file(dir.path(), "bad.json", &json);

    assert!(matches!(
        SolverConfig::load_from_file(&path),
        Err(CubeForgeError::Config(_))
    ));
}

#[test]
fn test_malformed_json_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "broken.json", "{ \"search\": ");
    assert!(matches!(
        SolverConfig::load_from_file(&path),
        Err(CubeForgeError::Json(_))
    ));
}
