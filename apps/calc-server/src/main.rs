mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use calc_runtime::{init_logging, shutdown_token, to_yaml};
use calculator_gateway::{CalculatorGatewayModule, RoutingTable};
use calculator_sdk::Operation;
use load_simulator::{LoadSimulatorModule, LoadTestPlan, TrafficClient, run_load_test};
use metrics_dashboard::MetricsDashboardModule;
use operation_service::OperationServiceModule;

use crate::config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Calculator mesh server - frontend router, operation services, load simulator and dashboard
#[derive(Parser)]
#[command(name = "calc-server")]
#[command(about = "Calculator mesh server - frontend router, operation services, load simulator and dashboard")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the selected service (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the frontend router (default)
    Frontend,
    /// Run one operation service
    Operation {
        /// Operation to serve (add, subtract, multiply, divide, exponent)
        #[arg(long, value_parser = parse_operation)]
        op: Option<Operation>,
    },
    /// Run the load simulator control API
    Simulator,
    /// Run the metrics dashboard
    Dashboard,
    /// Run a batch load test against the frontend and exit
    LoadTest {
        /// Number of concurrent virtual users
        #[arg(long, default_value_t = 5)]
        users: u32,
        /// Operations per user
        #[arg(long, default_value_t = 20)]
        ops: u32,
        /// Frontend base URL (overrides config)
        #[arg(long)]
        frontend_url: Option<String>,
        /// Write the full JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration and exit
    Check,
}

fn parse_operation(s: &str) -> Result<Operation, String> {
    s.parse::<Operation>()
        .map_err(|_| format!("unknown operation '{s}' (expected add, subtract, multiply, divide or exponent)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Frontend);

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (CALC__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &command, cli.port)?;

    init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", to_yaml(&config)?);
        return Ok(());
    }

    match command {
        Commands::Frontend => {
            let module = CalculatorGatewayModule::new(&config.frontend)?;
            module.serve(shutdown_token()).await
        }
        Commands::Operation { .. } => {
            let module = OperationServiceModule::new(&config.operation)?;
            module.serve(shutdown_token()).await
        }
        Commands::Simulator => {
            let module = LoadSimulatorModule::new(&config.simulator)?;
            module.serve(shutdown_token()).await
        }
        Commands::Dashboard => {
            let module = MetricsDashboardModule::new(&config.dashboard)?;
            module.serve(shutdown_token()).await
        }
        Commands::LoadTest {
            users, ops, output, ..
        } => load_test(&config, users, ops, output.as_deref()).await,
        Commands::Check => check_config(&config),
    }
}

/// Apply `--op`, `--port` and `--frontend-url` to the section of the selected role.
fn apply_cli_overrides(config: &mut AppConfig, command: &Commands, port: Option<u16>) -> Result<()> {
    if let Commands::Operation { op: Some(op) } = command {
        config.operation.operation = *op;
    }
    if let Commands::LoadTest {
        frontend_url: Some(url),
        ..
    } = command
    {
        config.simulator.frontend_url.clone_from(url);
    }

    let Some(port) = port else {
        return Ok(());
    };
    match command {
        Commands::Frontend => config.frontend.server.override_port(port),
        Commands::Operation { .. } => {
            let mut server = config.operation.effective_server();
            server.override_port(port)?;
            config.operation.server = Some(server);
            Ok(())
        }
        Commands::Simulator => config.simulator.server.override_port(port),
        Commands::Dashboard => config.dashboard.server.override_port(port),
        Commands::LoadTest { .. } | Commands::Check => {
            tracing::debug!(port, "port override ignored for this command");
            Ok(())
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    config.frontend.server.socket_addr()?;
    config.operation.effective_server().socket_addr()?;
    config.simulator.server.socket_addr()?;
    config.dashboard.server.socket_addr()?;
    RoutingTable::from_endpoints(&config.frontend.services).context("frontend services")?;
    config.simulator.validate().context("simulator")?;
    TrafficClient::new(
        &config.simulator.frontend_url,
        Duration::from_millis(config.simulator.request_timeout_ms),
    )
    .context("simulator frontend_url")?;
    MetricsDashboardModule::new(&config.dashboard).context("dashboard services")?;

    println!("Configuration is valid");
    println!("{}", to_yaml(config)?);
    Ok(())
}

async fn load_test(config: &AppConfig, users: u32, ops: u32, output: Option<&Path>) -> Result<()> {
    config.simulator.validate().context("simulator")?;
    let client = TrafficClient::new(
        &config.simulator.frontend_url,
        Duration::from_millis(config.simulator.request_timeout_ms),
    )?;
    let plan = LoadTestPlan {
        users,
        operations_per_user: ops,
        think_time: config.simulator.think_time,
        operand_range: config.simulator.operand_range,
    };
    let report = run_load_test(Arc::new(client), plan).await;

    let stats = &report.stats;
    println!("=== Load Test Statistics ===");
    println!("Total Requests: {}", stats.total_requests);
    println!("Successful: {}", stats.successful_requests);
    println!("Failed: {}", stats.failed_requests);
    if stats.total_requests > 0 {
        println!("Success Rate: {:.2}%", stats.success_rate);
        println!("Average Response Time: {:.1} ms", stats.avg_response_time_ms);
    }
    println!("Operation Distribution:");
    for (op, count) in &report.operation_counts {
        println!("  {op}: {count}");
    }

    if let Some(path) = output {
        report.write_json(path)?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}
