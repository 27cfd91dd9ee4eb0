//! # Job Queue - Entry Point
//! src/main.rs
//!
//! Lee la configuración, arranca el pool de workers y atiende HTTP hasta
//! que el proceso termine.

use job_queue::config::Config;
use job_queue::jobs::{JobManager, JobManagerConfig};
use job_queue::server::Server;
use job_queue::telemetry;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let config = Config::new();
    telemetry::init_tracing(config.log_json);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        return ExitCode::FAILURE;
    }
    config.log_summary();

    let manager = match JobManager::new(JobManagerConfig::from_config(&config)) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            tracing::error!(error = %e, "failed to start workers");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::bind(&config, Arc::clone(&manager)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, address = %config.address(), "failed to bind");
            manager.shutdown();
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "server stopped");
        manager.shutdown();
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
