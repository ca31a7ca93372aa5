use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tmc_provider::config::{Config, Overrides, ProviderConfig};
use tmc_provider::resource::{self, Operation, Request, Response};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Declarative provider for Tanzu Mission Control
#[derive(Parser, Debug)]
#[command(name = "tmc-provider", version = tmc_provider::VERSION, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the provider, resource and data-source schemas
    Schema {
        /// Only print the schema of this type
        #[arg(long = "type")]
        type_name: Option<String>,
    },
    /// Create a resource from its planned configuration
    Create(RequestArgs),
    /// Refresh a resource's state from TMC
    Read(RequestArgs),
    /// Apply in-place changes to a resource
    Update(RequestArgs),
    /// Delete a resource
    Delete(RequestArgs),
    /// Classify changes as in-place or replacing (no API calls)
    Plan(RequestArgs),
    /// Read a data source
    ReadData(RequestArgs),
    /// Write connection settings to the config file
    Configure {
        #[arg(long)]
        org_url: Option<String>,
        #[arg(long)]
        csp_url: Option<String>,
        #[arg(long)]
        request_timeout_secs: Option<u64>,
    },
}

#[derive(ClapArgs, Debug)]
struct RequestArgs {
    /// Request document (JSON); reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Resource or data-source type, overrides `type_name` in the request
    #[arg(long = "type")]
    type_name: Option<String>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[derive(ClapArgs, Debug)]
struct ConnectionArgs {
    /// Organization URL, e.g. https://myorg.tmc.cloud.vmware.com
    #[arg(long, env = "TMC_ORG_URL")]
    org_url: Option<String>,

    /// API token generated in the VMware Cloud Services console
    #[arg(long, env = "TMC_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Pre-issued access token (skips the API token exchange)
    #[arg(long, env = "TMC_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// VMware Cloud Services console used for the token exchange
    #[arg(long, env = "TMC_CSP_URL")]
    csp_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

impl From<&ConnectionArgs> for Overrides {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            org_url: args.org_url.clone(),
            api_token: args.api_token.clone(),
            access_token: args.access_token.clone(),
            csp_url: args.csp_url.clone(),
            request_timeout_secs: args.request_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tmc-provider started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tmc-provider").join("tmc-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tmc-provider").join("tmc-provider.log");
    }
    PathBuf::from("tmc-provider.log")
}

fn read_request(args: &RequestArgs) -> Result<Request> {
    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let mut request: Request =
        serde_json::from_str(&content).context("Request is not a valid JSON document")?;
    if let Some(type_name) = &args.type_name {
        request.type_name = type_name.clone();
    }
    Ok(request)
}

fn write_output<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn exit_code(response: &Response) -> ExitCode {
    if response.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_request(
    op: Option<Operation>,
    args: RequestArgs,
    format: OutputFormat,
) -> Result<ExitCode> {
    let request = read_request(&args)?;

    let response = match op {
        Some(Operation::Plan) => resource::plan_resource(request),
        _ => {
            let file = Config::load()?;
            let config = ProviderConfig::resolve(Overrides::from(&args.connection), file)?;
            let client = config.build_client()?;
            match op {
                Some(op) => resource::dispatch(&client, op, request).await,
                None => resource::dispatch_data_source(&client, request).await,
            }
        }
    };

    write_output(format, &response)?;
    Ok(exit_code(&response))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match args.command {
        Command::Schema { type_name } => {
            let registry = resource::get_registry();
            match type_name {
                Some(name) => {
                    let schema = resource::get_resource(&name)
                        .or_else(|| resource::get_data_source(&name))
                        .with_context(|| format!("Unknown type: {}", name))?;
                    write_output(args.output, schema)?;
                }
                None => write_output(args.output, registry)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Create(req) => run_request(Some(Operation::Create), req, args.output).await,
        Command::Read(req) => run_request(Some(Operation::Read), req, args.output).await,
        Command::Update(req) => run_request(Some(Operation::Update), req, args.output).await,
        Command::Delete(req) => run_request(Some(Operation::Delete), req, args.output).await,
        Command::Plan(req) => run_request(Some(Operation::Plan), req, args.output).await,
        Command::ReadData(req) => run_request(None, req, args.output).await,
        Command::Configure {
            org_url,
            csp_url,
            request_timeout_secs,
        } => {
            let path = Config::config_path().context("No config directory on this system")?;
            let mut config = Config::load_from(&path)?;
            if org_url.is_some() {
                config.org_url = org_url;
            }
            if csp_url.is_some() {
                config.csp_url = csp_url;
            }
            if request_timeout_secs.is_some() {
                config.request_timeout_secs = request_timeout_secs;
            }
            config.save_to(&path)?;
            tracing::info!("Saved configuration to {:?}", path);
            println!("Saved configuration to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
