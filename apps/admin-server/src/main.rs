use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{ModuleCtxBuilder, ModuleEntry, ModuleRegistry, RegistryBuilder};
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use api_ingress::ApiIngress;
use user_admin::UserAdmin;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// User Admin Server - users and access profiles administration
#[derive(Parser)]
#[command(name = "admin-server")]
#[command(about = "User Admin Server - users and access profiles administration")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

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
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);
    apply_server_settings(&mut config, args.port.is_some())?;

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("User Admin Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
    }
}

/// Fill the HTTP host's section from `server`.
///
/// The host listens on `server.host:server.port` unless `api_ingress.bind_addr`
/// is set explicitly; a `--port` flag always wins. A non-zero `server.timeout_sec`
/// becomes the request timeout when the section does not set one.
fn apply_server_settings(config: &mut AppConfig, port_overridden: bool) -> Result<()> {
    let derived = format!("{}:{}", config.server.host, config.server.port);
    let section = config
        .modules
        .entry("api_ingress".to_string())
        .or_insert_with(|| serde_json::json!({}));
    let obj = section
        .as_object_mut()
        .context("modules.api_ingress must be a mapping")?;

    let explicit = obj
        .get("bind_addr")
        .and_then(|v| v.as_str())
        .map(str::to_owned);
    let bind_addr = match explicit {
        Some(addr) if port_overridden => match addr.rsplit_once(':') {
            Some((host, _)) => format!("{}:{}", host, config.server.port),
            None => derived,
        },
        Some(addr) => addr,
        None => derived,
    };
    obj.insert("bind_addr".to_string(), serde_json::Value::String(bind_addr));

    if config.server.timeout_sec > 0 && !obj.contains_key("request_timeout_sec") {
        obj.insert(
            "request_timeout_sec".to_string(),
            serde_json::Value::from(config.server.timeout_sec),
        );
    }
    Ok(())
}

fn build_registry(ingress: Arc<ApiIngress>, users: Arc<UserAdmin>) -> Result<ModuleRegistry> {
    let registry = RegistryBuilder::default()
        .register(
            ModuleEntry::new("api_ingress", ingress.clone())
                .with_rest_host(ingress.clone())
                .with_stateful(ingress),
        )
        .register(ModuleEntry::new("user_admin", users.clone()).with_rest(users))
        .build()?;
    Ok(registry)
}

fn config_provider(config: &AppConfig) -> Arc<dyn modkit::ConfigProvider> {
    Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config.clone(),
    ))))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let registry = build_registry(Arc::new(ApiIngress::default()), Arc::new(UserAdmin::new()))?;
    tracing::debug!(?registry, "Module registry built");

    // Run the server via modkit
    let run_options = modkit::RunOptions {
        modules_cfg: config_provider(&config),
        registry,
        shutdown: modkit::ShutdownOptions::Signals,
    };

    modkit::run(run_options).await
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // Module init parses every typed module section
    let ingress = Arc::new(ApiIngress::default());
    let registry = build_registry(ingress.clone(), Arc::new(UserAdmin::new()))?;
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .with_config_provider(config_provider(&config))
        .build();
    registry.run_init_phase(&ctx).await?;

    let bind_addr = ingress.get_config().bind_addr().to_string();
    bind_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", bind_addr))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
