use clap::Parser;
use colored::Colorize;
use gridstage_core::{config::Settings, logging};
use gridstage_engine::cli::Cli;
use gridstage_engine::engine::StagingEngine;
use gridstage_engine::error::exit_codes;
use gridstage_gateway::SupervisorGateway;

fn main() {
    let cli = Cli::parse();

    logging::set_log_level_from_env();
    logging::init_stderr_logger();

    let settings = Settings::from_env();
    tracing::info!(
        "gridstage {} on {}",
        settings.app_version,
        settings.system
    );

    let gateway = match SupervisorGateway::new(&settings.supervisor_url) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("{}", format!("[ERROR] {}", e).red());
            std::process::exit(exit_codes::DB_ERROR);
        }
    };

    let engine = StagingEngine::new(gateway, settings);
    if let Err(e) = engine.run(&cli.run_id, &cli.run_dir, cli.step_type, cli.workflow_type) {
        eprintln!("{}", format!("[ERROR] {}", e).red());
        std::process::exit(e.exit_code());
    }
}
