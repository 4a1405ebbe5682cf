use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use users::UsersModule;

mod db;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Users Server - CRUD service for user records over HTTP/JSON
#[derive(Parser)]
#[command(name = "users-server")]
#[command(about = "Users Server - CRUD service for user records over HTTP/JSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Users Server starting");
    tracing::debug!("Effective server configuration: {:?}", config.server);

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

fn database_config(config: &AppConfig) -> DatabaseConfig {
    config.database.clone().unwrap_or_else(|| {
        tracing::warn!("No database configuration found, using the default SQLite file");
        DatabaseConfig::default()
    })
}

fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(api_ingress::MODULE_NAME)?;
    if config.server.timeout_sec > 0 {
        cfg.request_timeout_sec = config.server.timeout_sec;
    }
    Ok(cfg)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);

    let db_config = database_config(&config);
    let dsn = db::effective_dsn(&db_config, &base_dir, args.mock, true)?;
    if args.mock {
        tracing::info!("Using in-memory database (--mock)");
    }

    tracing::info!("Connecting to database: {}", dsn);
    let conn = db::connect(&dsn, &db_config).await?;
    tracing::info!("Connected to database");

    tracing::info!("Initializing modules...");
    let users = UsersModule::new(conn);
    users.migrate().await?;

    let ingress = ApiIngress::new(ingress_config(&config)?);
    let router = ingress.build_router(users.register_rest(Router::new()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind address {addr}"))?;
    tracing::info!(
        "Server is running on port {} (API under '{}')",
        config.server.port,
        ingress.config().api_prefix
    );

    ApiIngress::serve(listener, router, api_ingress::shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load already normalized & created home_dir
    let db_config = database_config(&config);
    let dsn = db::effective_dsn(
        &db_config,
        Path::new(&config.server.home_dir),
        args.mock,
        false,
    )?;
    let ingress = ingress_config(&config)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Database: {dsn}");
    println!("API prefix: {}", ingress.api_prefix);
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
