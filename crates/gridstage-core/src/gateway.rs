use crate::model::{RunDefinition, RunStatus};
use thiserror::Error;

/// Failure sentinel for the supervisor's data store. The staging engine does
/// not branch on the variant; any gateway failure is the DB-error outcome.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("run '{0}' could not be resolved")]
    RunNotFound(String),

    #[error("supervisor store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed record from the supervisor store: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read access to the supervisor's run records, injected into the engine so
/// staging stays testable against a fake store.
pub trait RunDataGateway {
    /// Resolve the full run definition for a run id.
    fn fetch_run_definition(&self, run_id: &str) -> Result<RunDefinition, GatewayError>;

    /// Aggregate job-completion counts for every run sharing a request group.
    fn fetch_run_status(&self, request_group: &str) -> Result<RunStatus, GatewayError>;

    /// Drop any previously recorded test results for the run. Callers treat
    /// this as best-effort and must not fail staging on an error.
    fn clear_previous_results(&self, run_id: &str) -> Result<(), GatewayError>;
}

impl<G: RunDataGateway + ?Sized> RunDataGateway for &G {
    fn fetch_run_definition(&self, run_id: &str) -> Result<RunDefinition, GatewayError> {
        (**self).fetch_run_definition(run_id)
    }

    fn fetch_run_status(&self, request_group: &str) -> Result<RunStatus, GatewayError> {
        (**self).fetch_run_status(request_group)
    }

    fn clear_previous_results(&self, run_id: &str) -> Result<(), GatewayError> {
        (**self).clear_previous_results(run_id)
    }
}
