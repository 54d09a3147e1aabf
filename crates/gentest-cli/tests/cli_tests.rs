use gentest_cli::{commands, parse_contains, CliError, GraphSummary, Overrides, StepFile};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const LOOP_YAML: &str = r"
config:
  max_loop: 1
  log_level: debug
steps:
  - name: app.A
    start: true
  - name: app.B
    previous: [app.A, app.D]
    inputs:
      - {}
  - name: app.C
    previous: [app.B]
  - name: app.D
    previous: [app.C, app.F]
  - name: app.E
    previous: [app.C]
  - name: app.F
    previous: [app.E]
  - name: app.G
    previous: [app.E]
    checks:
      - name: test_exit
";

fn step_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn names(output: &str) -> Vec<String> {
    let lines: Vec<serde_json::Value> = serde_json::from_str(output).unwrap();
    let mut names: Vec<String> = lines
        .iter()
        .map(|l| l["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_yaml_file_scenarios() {
    let tmp = step_file(".yaml", LOOP_YAML);
    let file = StepFile::load(tmp.path()).unwrap();
    assert_eq!(file.config.log_level, "debug");

    let output = commands::scenarios(&file, Overrides::default(), true).unwrap();
    assert_eq!(
        names(&output),
        vec![
            "app.Aapp.Bapp.Capp.Dapp.B",
            "app.Aapp.Bapp.Capp.Eapp.Fapp.Dapp.B",
            "app.Aapp.Bapp.Capp.Eapp.G",
        ]
    );
}

#[test]
fn test_flags_override_file() {
    let tmp = step_file(".yml", LOOP_YAML);
    let file = StepFile::load(tmp.path()).unwrap();

    let overrides = Overrides {
        max_loop: Some(2),
        filters: vec![parse_contains("app.E,app.F")],
        ..Overrides::default()
    };
    let output = commands::scenarios(&file, overrides, true).unwrap();
    assert_eq!(
        names(&output),
        vec![
            "app.Aapp.Bapp.Capp.Dapp.Bapp.Capp.Eapp.Fapp.Dapp.B",
            "app.Aapp.Bapp.Capp.Eapp.Fapp.Dapp.Bapp.Capp.Dapp.B",
            "app.Aapp.Bapp.Capp.Eapp.Fapp.Dapp.Bapp.Capp.Eapp.Fapp.Dapp.B",
        ]
    );
}

#[test]
fn test_text_output_lists_paths() {
    let tmp = step_file(".yaml", LOOP_YAML);
    let file = StepFile::load(tmp.path()).unwrap();
    let output = commands::scenarios(&file, Overrides::default(), false).unwrap();

    assert!(output.contains("app.A -> app.B -> app.C -> app.E -> app.G\n"));
    assert!(output.ends_with("3 scenario(s)\n"));
}

#[test]
fn test_plan_names_methods() {
    let tmp = step_file(".yaml", LOOP_YAML);
    let file = StepFile::load(tmp.path()).unwrap();
    let overrides = Overrides {
        filters: vec![parse_contains("app.G")],
        ..Overrides::default()
    };
    let output = commands::plan_text(&file, overrides, false).unwrap();

    assert_eq!(
        output,
        "app.Aapp.Bapp.Capp.Eapp.G\n\
         \x20 test_0000_a [app.A] input=- checks=[]\n\
         \x20 test_0001_b [app.B] input=#0 checks=[]\n\
         \x20 test_0002_c [app.C] input=- checks=[]\n\
         \x20 test_0003_e [app.E] input=- checks=[]\n\
         \x20 test_0004_g [app.G] input=- checks=[test_exit]\n"
    );
}

#[test]
fn test_json_file_graph_summary() {
    let tmp = step_file(
        ".json",
        r#"{
            "steps": [
                {"name": "A", "start": true},
                {"name": "B", "previous": ["A", "Ghost"]},
                {"name": "C", "previous": ["B", "C"]},
                {"name": "Island"}
            ]
        }"#,
    );
    let file = StepFile::load(tmp.path()).unwrap();
    let summary = GraphSummary::of(&file.registry().unwrap());

    assert_eq!(summary.steps, 4);
    assert_eq!(summary.start.as_deref(), Some("A"));
    assert!(summary.cyclic);
    assert_eq!(
        summary.dangling,
        vec![("B".to_string(), "Ghost".to_string())]
    );
    assert_eq!(summary.unreachable, vec!["Island".to_string()]);

    let text = commands::graph(&file, false).unwrap();
    assert!(text.contains("Dangling: B follows unknown step Ghost"));
    assert!(text.contains("Cyclic: yes"));
}

#[test]
fn test_unsupported_extension() {
    let tmp = step_file(".toml", "steps = []");
    assert!(matches!(
        StepFile::load(tmp.path()),
        Err(CliError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = StepFile::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
}

#[test]
fn test_unknown_filter_step_fails() {
    let tmp = step_file(".yaml", LOOP_YAML);
    let file = StepFile::load(tmp.path()).unwrap();
    let overrides = Overrides {
        filters: vec![parse_contains("app.Z")],
        ..Overrides::default()
    };
    let err = commands::scenarios(&file, overrides, false).unwrap_err();
    assert!(matches!(err, CliError::Plan(_)));
}

#[test]
fn test_missing_start_fails() {
    let file = StepFile::from_json(r#"{"steps": [{"name": "A"}]}"#).unwrap();
    let err = commands::scenarios(&file, Overrides::default(), false).unwrap_err();
    assert_eq!(
        err.to_string(),
        "planning failed: no start step registered; flag exactly one step as start"
    );
}
