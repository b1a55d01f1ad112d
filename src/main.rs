//! Signing Load Tester - Main CLI Application
//!
//! Runs the selected load scenarios against the signing coordinator over
//! mutual TLS and exits 0 only if every scenario met the success threshold.

use clap::Parser;
use signing_load_tester::{
    cli::Cli,
    client::SecureClientFactory,
    config::{display_config_summary, load_config, validate_config, EnvManager},
    error::{AppError, Result},
    executor::ExecutorFactory,
    logging::{init_logging, LoggingConfig},
    output::suite_to_json,
    PKG_NAME, VERSION,
};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Worker panics surface as join errors and count against the scenario
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();

    if let Some(code) = handle_env_actions(&cli) {
        process::exit(code);
    }

    match run_application(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e.format_for_console(use_color));
            print_error_suggestions(&e);
            process::exit(e.exit_code());
        }
    }
}

/// Standalone .env helpers that run instead of a load test
fn handle_env_actions(cli: &Cli) -> Option<i32> {
    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        let warnings = EnvManager::validate_current_env();
        for warning in &warnings {
            println!("{}", warning);
        }
        return Some(if warnings.is_empty() { 0 } else { 2 });
    }

    if let Some(ref path) = cli.init_env {
        return Some(match EnvManager::save_example_env_file(path) {
            Ok(()) => {
                println!("Example configuration written to {}", path.display());
                0
            }
            Err(e) => {
                eprintln!("{}", e.format_for_console(cli.use_colors()));
                e.exit_code()
            }
        });
    }

    None
}

/// Main application logic; returns the suite exit status
async fn run_application(cli: Cli) -> Result<i32> {
    let config = load_config(cli)?;

    init_logging(&LoggingConfig::from_app_config(&config));
    tracing::debug!("{} v{} ({})", PKG_NAME, VERSION, signing_load_tester::BUILD_TIME);
    tracing::debug!("Configuration loaded:\n{}", display_config_summary(&config));

    for warning in validate_config(&config)? {
        warning.log();
    }

    let driver = ExecutorFactory::create_suite_driver(&config, Arc::new(SecureClientFactory));
    let suite = driver.run(&config.scenario_configs()).await;

    if config.json_output {
        println!("{}", suite_to_json(&suite)?);
    }

    Ok(suite.exit_code())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Coordinator URL must start with https:// (or http:// for mocks)");
            eprintln!("  - Success threshold must be between 0 and 100");
            eprintln!("  - Run with --help to list every option");
        }
        AppError::Tls(_) => {
            eprintln!();
            eprintln!("TLS troubleshooting:");
            eprintln!("  - Verify --ca-cert, --client-cert and --client-key point at PEM files");
            eprintln!("  - Ensure the client key matches the client certificate");
        }
        _ => {}
    }
}
