use crate::error::StagingError;
use crate::util::set_mode;
use gridstage_core::constants::{forensics, modes, scripts};
use gridstage_core::model::{RunDefinition, TestExecutor, WorkflowType};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Produces one executable driver script per requested test executor. The
/// scripts are consumed by separate test-executor pods, not run here.
pub struct TestFileGenerator {
    workflow: WorkflowType,
}

impl TestFileGenerator {
    pub fn new(workflow: WorkflowType) -> Self {
        TestFileGenerator { workflow }
    }

    /// Write the driver scripts for `run_def` into `run_dir`.
    ///
    /// An unknown executor name or an executor with no tests is skipped, not
    /// failed: a partially valid request is still useful for the executors
    /// that are valid. A write fault aborts the whole operation; files
    /// already written stay behind.
    pub fn generate(&self, run_dir: &Path, run_def: &RunDefinition) -> Result<(), StagingError> {
        let Some(tests) = &run_def.request_data.tests else {
            return Ok(());
        };

        tracing::info!(
            "Creating test files. run_dir: {}, workflow type: {}",
            run_dir.display(),
            self.workflow
        );

        for (name, test_list) in tests.iter() {
            let executor = match TestExecutor::from_str(name) {
                Ok(executor) => executor,
                Err(_) => {
                    tracing::warn!(
                        "Invalid or missing executor '{}' in run {}; skipping",
                        name,
                        run_def.id
                    );
                    continue;
                }
            };

            if test_list.is_empty() {
                tracing::warn!("Executor {} was specified with no tests; skipping", executor);
                continue;
            }

            let out_path = self.driver_path(run_dir, executor);
            let script = self.render_script(run_dir, executor, test_list);

            fs::write(&out_path, script).map_err(|source| StagingError::TestFile {
                path: out_path.clone(),
                source,
            })?;
            set_mode(&out_path, modes::DRIVER_SCRIPT).map_err(|source| StagingError::TestFile {
                path: out_path.clone(),
                source,
            })?;

            tracing::debug!("Wrote driver file {}", out_path.display());
        }

        Ok(())
    }

    pub fn driver_path(&self, run_dir: &Path, executor: TestExecutor) -> PathBuf {
        run_dir.join(format!("{}{}", executor, scripts::DRIVER_SUFFIX))
    }

    /// The workflow-specific test-runner invocation, or None for workflows
    /// whose driver scripts only announce the tests.
    fn base_command(&self, executor: TestExecutor) -> Option<String> {
        match self.workflow {
            WorkflowType::Core => Some(scripts::RUNNER_CMD.to_string()),
            WorkflowType::Topology => Some(format!(
                "{} --hostnames {} --topology {}",
                scripts::RUNNER_CMD,
                scripts::HOSTNAMES_PLACEHOLDER,
                executor.topology_role()
            )),
            WorkflowType::Federation | WorkflowType::Plugin | WorkflowType::Unit => None,
        }
    }

    fn render_script(&self, run_dir: &Path, executor: TestExecutor, tests: &[String]) -> String {
        let mut lines = vec![
            scripts::SHEBANG.to_string(),
            format!("cd {};", scripts::TEST_WORKDIR),
        ];

        let base_cmd = self.base_command(executor);
        for test in tests {
            match &base_cmd {
                Some(cmd) => lines.push(format!(
                    "echo \"Running {test}\"; {cmd} --run_s {test};"
                )),
                None => lines.push(format!("echo \"Running {test}\";")),
            }
        }

        // Forensic retention: the executor copies its logs and reports into
        // the shared run directory so they survive into the final archive.
        let results_dir = run_dir.join(executor.as_str());
        let results_dir = results_dir.display();
        lines.push(format!(
            "echo \"Creating the run results dir {results_dir}...\"; mkdir {results_dir};"
        ));
        for src in [
            forensics::SERVER_LOG_DIR,
            forensics::TEST_REPORT_DIR,
            forensics::SYSTEM_LOG_DIR,
        ] {
            lines.push(format!(
                "echo \"Copying {src} dir into {results_dir}...\"; cp -R {src} {results_dir};"
            ));
        }

        let mut script = lines.join("\n");
        script.push('\n');
        script
    }
}
