//! In-process tests for the CLI runtime.

mod support;

use std::process::ExitCode;

use rstest::rstest;

use support::{BAZ, FOO, MAIN, TestWorld, read_graph};

fn world() -> TestWorld {
    TestWorld::new().expect("test world")
}

#[test]
fn analyse_writes_graph_and_summary() {
    let mut world = world();
    let call_map = world.write_call_map().expect("call map");
    world.run([
        "analyse".into(),
        "--call-map".into(),
        call_map.into_os_string(),
        "--entry".into(),
        FOO.into(),
        "--name".into(),
        "foo".into(),
        "--seed".into(),
        "3".into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::SUCCESS), "{}", world.stderr_text());
    let path = world.output_path("foo");
    assert!(world.stdout_text().contains("3 nodes, 2 edges"));
    assert!(world.stdout_text().contains(&path.display().to_string()));

    let graph = read_graph(&path).expect("graph json");
    let nodes = graph["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["className"], "Foo");
    assert_eq!(nodes[0]["isEntry"], true);
    assert_eq!(nodes[0]["nodeType"], "ROOT");
}

#[rstest]
#[case("all", "3 nodes, 2 edges")]
#[case("production", "2 nodes, 1 edges")]
#[case("test", "1 nodes, 0 edges")]
fn scope_flag_filters_callers(#[case] scope: &str, #[case] summary: &str) {
    let mut world = world();
    let call_map = world.write_call_map().expect("call map");
    world.run([
        "analyse".into(),
        "--call-map".into(),
        call_map.into_os_string(),
        "--entry".into(),
        FOO.into(),
        "--scope".into(),
        scope.into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::SUCCESS), "{}", world.stderr_text());
    assert!(world.stdout_text().contains(summary), "{}", world.stdout_text());
}

#[test]
fn mark_cycles_keeps_the_back_edge() {
    let mut world = world();
    let call_map = world.write_call_map().expect("call map");
    world.run([
        "analyse".into(),
        "--call-map".into(),
        call_map.into_os_string(),
        "--entry".into(),
        FOO.into(),
        "--mark-cycles".into(),
    ]);

    let graph = read_graph(&world.output_path("callchain")).expect("graph json");
    let edges = graph["edges"].as_array().expect("edges array");
    assert_eq!(edges.len(), 3);
    assert!(edges.iter().any(|edge| edge["recursive"] == true));
}

#[test]
fn cancelled_run_exits_with_interrupt_status_and_writes_nothing() {
    let mut world = world();
    let call_map = world.write_call_map().expect("call map");
    world.cancel.cancel();
    world.run([
        "analyse".into(),
        "--call-map".into(),
        call_map.into_os_string(),
        "--entry".into(),
        FOO.into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::from(crate::EXIT_CANCELLED)));
    assert!(!world.output_path("callchain").exists());
    assert!(world.stderr_text().is_empty());
}

#[test]
fn missing_call_map_is_reported() {
    let mut world = world();
    let missing = world.temp_dir.path().join("absent.json");
    world.run([
        "analyse".into(),
        "--call-map".into(),
        missing.into_os_string(),
        "--entry".into(),
        FOO.into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::FAILURE));
    assert!(world.stderr_text().contains("failed to read call map"));
}

#[test]
fn malformed_call_map_is_reported() {
    let mut world = world();
    let path = world.write_file("calls.json", "{ not json").expect("call map");
    world.run([
        "analyse".into(),
        "--call-map".into(),
        path.into_os_string(),
        "--entry".into(),
        FOO.into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::FAILURE));
    assert!(world.stderr_text().contains("failed to parse call map"));
}

#[test]
fn import_rebuilds_an_indented_hierarchy() {
    let mut world = world();
    let hierarchy = format!("{FOO}\n    {BAZ}\n        {MAIN}\n\nUnused.entry()  (com.example)\n");
    let input = world.write_file("tree.txt", &hierarchy).expect("hierarchy");
    world.run([
        "import".into(),
        "--input".into(),
        input.into_os_string(),
        "--prune".into(),
    ]);

    assert_eq!(world.exit_code, Some(ExitCode::SUCCESS), "{}", world.stderr_text());
    assert!(world.stdout_text().contains("3 nodes, 2 edges"));
    let graph = read_graph(&world.output_path("callchain")).expect("graph json");
    assert_eq!(graph["nodes"][1]["nodeType"], "INTERMEDIATE");
}

#[test]
fn import_honours_configured_indent_width() {
    let mut world = world();
    world.config.indent_width = 2;
    let input = world
        .write_file("tree.txt", &format!("{FOO}\n  {BAZ}\n"))
        .expect("hierarchy");
    world.run(["import".into(), "--input".into(), input.into_os_string()]);

    assert!(world.stdout_text().contains("2 nodes, 1 edges"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let mut world = world();
    world.run(Vec::<std::ffi::OsString>::new());

    assert_eq!(world.exit_code, Some(ExitCode::FAILURE));
    assert!(world.stderr_text().contains("Usage"));
}
