use crate::archive::zip_dir_tree;
use crate::error::StagingError;
use crate::testgen::TestFileGenerator;
use crate::util::{prune_subdirectories, purge_stale_archives, set_mode};
use gridstage_core::config::Settings;
use gridstage_core::constants::{archives, modes};
use gridstage_core::gateway::RunDataGateway;
use gridstage_core::model::{StagingType, WorkflowType};
use std::fs;
use std::io;
use std::path::Path;

/// Orchestrates one staging phase for one run. Holds no state across calls;
/// every invocation re-fetches the run definition from the gateway.
pub struct StagingEngine<G> {
    gateway: G,
    settings: Settings,
}

impl<G: RunDataGateway> StagingEngine<G> {
    pub fn new(gateway: G, settings: Settings) -> Self {
        StagingEngine { gateway, settings }
    }

    /// Perform the staging phase selected by `step_type`.
    pub fn run(
        &self,
        run_id: &str,
        run_dir: &Path,
        step_type: StagingType,
        workflow_type: WorkflowType,
    ) -> Result<(), StagingError> {
        match step_type {
            StagingType::Initial => self.initial_staging(run_id, run_dir, workflow_type),
            StagingType::Final => self.final_staging(run_id, run_dir),
        }
    }

    pub fn initial_staging(
        &self,
        run_id: &str,
        run_dir: &Path,
        workflow_type: WorkflowType,
    ) -> Result<(), StagingError> {
        tracing::info!(
            "Initial staging version {} start: run_id: {}, run_dir: {}, workflow type: {}",
            self.settings.app_version,
            run_id,
            run_dir.display(),
            workflow_type
        );

        let new_run_dir = run_dir.join(run_id);
        let result = self.initial_staging_steps(run_id, run_dir, &new_run_dir, workflow_type);

        match &result {
            Ok(()) => tracing::info!(
                "Initial staging complete: run_dir: {}",
                new_run_dir.display()
            ),
            Err(e) => tracing::error!(
                "Initial staging failed for run directory {}: {}",
                new_run_dir.display(),
                e
            ),
        }

        result
    }

    fn initial_staging_steps(
        &self,
        run_id: &str,
        run_dir: &Path,
        new_run_dir: &Path,
        workflow_type: WorkflowType,
    ) -> Result<(), StagingError> {
        // Nothing on disk may change until the run resolves.
        let run_def = self.gateway.fetch_run_definition(run_id)?;

        // Reset the working directory; a leftover tree from an earlier
        // attempt is replaced, not merged.
        if let Err(e) = fs::remove_dir_all(new_run_dir) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }

        purge_stale_archives(run_dir)?;

        if let Err(e) = self.gateway.clear_previous_results(run_id) {
            tracing::warn!("Could not clear previous results for run {}: {}", run_id, e);
        }

        fs::create_dir_all(new_run_dir)?;
        set_mode(new_run_dir, modes::RUN_DIR)?;

        if run_def.request_data.tests.is_some() {
            TestFileGenerator::new(workflow_type).generate(new_run_dir, &run_def)?;
        }

        Ok(())
    }

    pub fn final_staging(&self, run_id: &str, run_dir: &Path) -> Result<(), StagingError> {
        let new_run_dir = run_dir.join(run_id);

        tracing::info!(
            "Final staging version {} start: run_dir: {}",
            self.settings.app_version,
            new_run_dir.display()
        );

        let result = self.final_staging_steps(run_id, run_dir, &new_run_dir);

        match &result {
            Ok(()) => tracing::info!(
                "Final staging complete: run_dir: {}",
                new_run_dir.display()
            ),
            Err(e) => tracing::error!(
                "Final staging failed for run directory {}: {}",
                new_run_dir.display(),
                e
            ),
        }

        result
    }

    fn final_staging_steps(
        &self,
        run_id: &str,
        run_dir: &Path,
        new_run_dir: &Path,
    ) -> Result<(), StagingError> {
        // Final staging is the one phase where missing state is an error:
        // the run was supposed to have been staged and executed here.
        if !new_run_dir.is_dir() {
            return Err(StagingError::NoRunDirectory(new_run_dir.to_path_buf()));
        }

        let run_def = self.gateway.fetch_run_definition(run_id)?;
        let status = self.gateway.fetch_run_status(&run_def.request_group)?;

        if !status.fully_tested() {
            // Another executor pod is still running; a later final-staging
            // invocation picks the archive up once the counts agree.
            tracing::info!(
                "Request group '{}' has {}/{} testing jobs complete; leaving run dir {} in place",
                run_def.request_group,
                status.testing_jobs.complete,
                status.testing_jobs.total,
                new_run_dir.display()
            );
            return Ok(());
        }

        let archive_name = format!(
            "{}.{}.{}",
            run_def.request_group,
            archives::RESULTS_SUFFIX,
            archives::ZIP_EXTENSION
        );
        let archive_path = run_dir.join(&archive_name);

        tracing::info!("Creating results archive: {}", archive_path.display());
        zip_dir_tree(run_dir, &archive_path)?;

        let package_dir = run_def
            .request_data
            .package_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(package_dir) = package_dir {
            let packaged = package_dir.join(&archive_name);
            tracing::info!("Publishing results archive: {}", packaged.display());

            fs::create_dir_all(package_dir)?;
            fs::copy(&archive_path, &packaged)?;
            set_mode(&packaged, modes::PACKAGED_ARCHIVE)?;
        }

        prune_subdirectories(run_dir)?;

        Ok(())
    }
}
