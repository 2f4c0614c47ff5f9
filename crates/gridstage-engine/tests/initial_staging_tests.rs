use gridstage_core::model::{StagingType, WorkflowType};
use gridstage_engine::engine::StagingEngine;
use gridstage_engine::error::StagingError;
use gridstage_test_utils::harness::{run_definition, test_settings, FakeGateway, StagingContext};
use std::fs;

fn engine(gateway: FakeGateway) -> StagingEngine<FakeGateway> {
    StagingEngine::new(gateway, test_settings())
}

#[test]
fn test_unresolved_run_makes_no_filesystem_changes() {
    let ctx = StagingContext::new();

    let result = engine(FakeGateway::new()).run(
        "0",
        &ctx.run_dir,
        StagingType::Initial,
        WorkflowType::Core,
    );

    assert!(matches!(result, Err(StagingError::Database(_))));
    assert!(!ctx.run_path("0").exists());
}

#[test]
fn test_store_outage_makes_no_filesystem_changes() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().failing_definitions();

    let result = engine(gateway).run("1", &ctx.run_dir, StagingType::Initial, WorkflowType::Core);

    assert!(matches!(result, Err(StagingError::Database(_))));
    assert!(!ctx.run_path("1").exists());
}

#[test]
fn test_creates_core_driver_file() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition(
        "1",
        run_definition(
            1,
            "build-42",
            Some(vec![("PROVIDER", vec!["test_ihelp"])]),
            None,
        ),
    );

    engine(gateway)
        .run("1", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    let driver = fs::read_to_string(ctx.driver_path("1", "PROVIDER")).unwrap();
    assert!(driver.contains(
        "echo \"Running test_ihelp\"; python3 scripts/run_tests.py --xml_output --run_s test_ihelp;"
    ));
    assert_eq!(driver.matches("--run_s").count(), 1);
    assert!(!driver.contains("--topology"));
}

#[test]
fn test_topology_driver_files_carry_executor_roles() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition(
        "2",
        run_definition(
            2,
            "build-42",
            Some(vec![
                ("PROVIDER", vec!["test_iadmin"]),
                ("CONSUMER", vec!["test_ihelp", "test_ils"]),
            ]),
            None,
        ),
    );

    engine(gateway)
        .run(
            "2",
            &ctx.run_dir,
            StagingType::Initial,
            WorkflowType::Topology,
        )
        .unwrap();

    let provider = fs::read_to_string(ctx.driver_path("2", "PROVIDER")).unwrap();
    assert!(provider.contains("--topology icat"));

    let consumer = fs::read_to_string(ctx.driver_path("2", "CONSUMER")).unwrap();
    assert!(consumer.contains("--topology resource"));
    assert_eq!(consumer.matches("--run_s").count(), 2);
}

#[test]
fn test_rerun_replaces_prior_working_directory() {
    let ctx = StagingContext::new();
    let definition = run_definition(
        1,
        "build-42",
        Some(vec![("PROVIDER", vec!["test_ihelp"])]),
        None,
    );
    let gateway = FakeGateway::new().with_definition("1", definition.clone());

    engine(gateway)
        .run("1", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    // Leftovers from the first pass: a stray file in the working directory
    // and a stale archive in its parent.
    fs::write(ctx.run_path("1").join("junk.txt"), b"leftover").unwrap();
    fs::write(ctx.run_dir.join("build-41.test-results.zip"), b"stale").unwrap();

    let gateway = FakeGateway::new().with_definition("1", definition);
    engine(gateway)
        .run("1", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    assert!(ctx.driver_path("1", "PROVIDER").is_file());
    assert!(!ctx.run_path("1").join("junk.txt").exists());
    assert!(!ctx.run_dir.join("build-41.test-results.zip").exists());
}

#[test]
fn test_executor_with_no_tests_produces_no_file() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition(
        "3",
        run_definition(3, "build-42", Some(vec![("CONSUMER", vec![])]), None),
    );

    engine(gateway)
        .run("3", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    assert!(ctx.run_path("3").is_dir());
    assert!(!ctx.driver_path("3", "CONSUMER").exists());
}

#[test]
fn test_unknown_executor_is_skipped_not_fatal() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition(
        "4",
        run_definition(
            4,
            "build-42",
            Some(vec![
                ("SIDELOADER", vec!["test_ihelp"]),
                ("CONSUMER", vec!["test_ils"]),
            ]),
            None,
        ),
    );

    engine(gateway)
        .run("4", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    assert!(!ctx.run_path("4").join("SIDELOADER_test_list.sh").exists());
    assert!(ctx.driver_path("4", "CONSUMER").is_file());
}

#[test]
fn test_request_without_tests_key_still_stages_directory() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition("5", run_definition(5, "build-42", None, None));

    engine(gateway)
        .run("5", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    assert!(ctx.run_path("5").is_dir());
    assert_eq!(fs::read_dir(ctx.run_path("5")).unwrap().count(), 0);
}

#[test]
fn test_clear_previous_results_failure_is_best_effort() {
    let ctx = StagingContext::new();
    let gateway = FakeGateway::new()
        .with_definition(
            "6",
            run_definition(6, "build-42", Some(vec![("PROVIDER", vec!["test_ihelp"])]), None),
        )
        .failing_clear();

    let engine = StagingEngine::new(&gateway, test_settings());
    engine
        .run("6", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    assert!(ctx.driver_path("6", "PROVIDER").is_file());
    assert_eq!(gateway.cleared_runs(), vec!["6".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_staged_paths_are_world_accessible() {
    use std::os::unix::fs::PermissionsExt;

    let ctx = StagingContext::new();
    let gateway = FakeGateway::new().with_definition(
        "7",
        run_definition(7, "build-42", Some(vec![("PROVIDER", vec!["test_ihelp"])]), None),
    );

    engine(gateway)
        .run("7", &ctx.run_dir, StagingType::Initial, WorkflowType::Core)
        .unwrap();

    let dir_mode = fs::metadata(ctx.run_path("7")).unwrap().permissions().mode();
    assert_eq!(dir_mode & 0o777, 0o777);

    let file_mode = fs::metadata(ctx.driver_path("7", "PROVIDER"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(file_mode & 0o777, 0o777);
}
