use clap::Parser;
use gridstage_core::model::{StagingType, WorkflowType};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "gridstage",
    version,
    about = "Two-phase staging step for grid test runs.",
    long_about = "Materializes the per-run working directory and test driver scripts \
before test execution, and archives the run's results afterwards. Invoked once per \
phase by the job supervisor."
)]
pub struct Cli {
    #[arg(long, help = "The run identifier assigned by the supervisor")]
    pub run_id: String,

    #[arg(long, help = "Base directory holding per-run working directories")]
    pub run_dir: PathBuf,

    #[arg(
        long,
        value_parser = StagingType::from_str,
        help = "The staging step to perform: initial or final"
    )]
    pub step_type: StagingType,

    #[arg(
        long,
        default_value = "CORE",
        value_parser = WorkflowType::from_str,
        help = "The workflow type of the run: CORE, TOPOLOGY, FEDERATION, PLUGIN or UNIT"
    )]
    pub workflow_type: WorkflowType,
}
