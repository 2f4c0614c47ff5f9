use gridstage_core::config::Settings;
use gridstage_core::gateway::{GatewayError, RunDataGateway};
use gridstage_core::model::{
    JobCounts, RequestData, RunDefinition, RunStatus, TestMatrix,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory stand-in for the supervisor store. Definitions and statuses are
/// seeded up front; failure injection flips whole operations into the
/// gateway's failure sentinel.
pub struct FakeGateway {
    definitions: HashMap<String, RunDefinition>,
    statuses: HashMap<String, RunStatus>,
    fail_definitions: bool,
    fail_status: bool,
    fail_clear: bool,
    cleared: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway {
            definitions: HashMap::new(),
            statuses: HashMap::new(),
            fail_definitions: false,
            fail_status: false,
            fail_clear: false,
            cleared: Mutex::new(Vec::new()),
        }
    }

    pub fn with_definition(mut self, run_id: &str, definition: RunDefinition) -> Self {
        self.definitions.insert(run_id.to_string(), definition);
        self
    }

    pub fn with_status(mut self, request_group: &str, total: u64, complete: u64) -> Self {
        self.statuses.insert(
            request_group.to_string(),
            RunStatus {
                testing_jobs: JobCounts { total, complete },
            },
        );
        self
    }

    pub fn failing_definitions(mut self) -> Self {
        self.fail_definitions = true;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    /// Run ids passed to `clear_previous_results`, in call order.
    pub fn cleared_runs(&self) -> Vec<String> {
        self.cleared
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RunDataGateway for FakeGateway {
    fn fetch_run_definition(&self, run_id: &str) -> Result<RunDefinition, GatewayError> {
        if self.fail_definitions {
            return Err(GatewayError::Unavailable("injected store outage".to_string()));
        }
        self.definitions
            .get(run_id)
            .cloned()
            .ok_or_else(|| GatewayError::RunNotFound(run_id.to_string()))
    }

    fn fetch_run_status(&self, request_group: &str) -> Result<RunStatus, GatewayError> {
        if self.fail_status {
            return Err(GatewayError::Unavailable("injected store outage".to_string()));
        }
        self.statuses
            .get(request_group)
            .copied()
            .ok_or_else(|| GatewayError::RunNotFound(request_group.to_string()))
    }

    fn clear_previous_results(&self, run_id: &str) -> Result<(), GatewayError> {
        if let Ok(mut calls) = self.cleared.lock() {
            calls.push(run_id.to_string());
        }
        if self.fail_clear {
            return Err(GatewayError::Unavailable("injected store outage".to_string()));
        }
        Ok(())
    }
}

/// Build a run definition the way the supervisor store would return it.
pub fn run_definition(
    id: i64,
    request_group: &str,
    tests: Option<Vec<(&str, Vec<&str>)>>,
    package_dir: Option<&Path>,
) -> RunDefinition {
    RunDefinition {
        id,
        request_group: request_group.to_string(),
        request_data: RequestData {
            tests: tests.map(|entries| {
                TestMatrix(
                    entries
                        .into_iter()
                        .map(|(executor, names)| {
                            (
                                executor.to_string(),
                                names.into_iter().map(String::from).collect(),
                            )
                        })
                        .collect(),
                )
            }),
            package_dir: package_dir.map(Path::to_path_buf),
        },
    }
}

/// Settings that never read the ambient environment.
pub fn test_settings() -> Settings {
    Settings {
        app_version: "0.0.0-test".to_string(),
        system: "test".to_string(),
        supervisor_url: "http://localhost:0".to_string(),
    }
}

/// Tempdir-backed layout for staging tests: a base run directory plus
/// helpers for the per-run paths the engine produces.
pub struct StagingContext {
    pub _temp_dir: tempfile::TempDir,
    pub run_dir: PathBuf,
}

impl StagingContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::Builder::new()
            .prefix("gridstage-test-")
            .tempdir()
            .expect("Failed to create temp dir");
        let run_dir = temp_dir.path().join("data");
        fs::create_dir_all(&run_dir).expect("Failed to create run dir");

        StagingContext {
            _temp_dir: temp_dir,
            run_dir,
        }
    }

    pub fn run_path(&self, run_id: &str) -> PathBuf {
        self.run_dir.join(run_id)
    }

    pub fn driver_path(&self, run_id: &str, executor: &str) -> PathBuf {
        self.run_path(run_id).join(format!("{executor}_test_list.sh"))
    }

    pub fn archive_path(&self, request_group: &str) -> PathBuf {
        self.run_dir
            .join(format!("{request_group}.test-results.zip"))
    }
}

impl Default for StagingContext {
    fn default() -> Self {
        Self::new()
    }
}
