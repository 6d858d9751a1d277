//! proxycheck CLI.

use anyhow::{Context, Result};
use clap::Parser;
use proxycheck::{Config, InetAddress, ProxyCheckApi, ProxyCheckClient, RequestConfiguration};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proxycheck")]
#[command(about = "Look up IP addresses with the proxycheck.io v3 API")]
#[command(version)]
struct Args {
    /// Path to configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "warn")]
    log_level: String,

    /// Print example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Ask the service to pretty-print its response
    #[arg(long)]
    pretty: bool,

    /// Include the serving node in the response
    #[arg(long)]
    node: bool,

    /// Only consider detections from the last N days
    #[arg(long, value_name = "N")]
    days: Option<u32>,

    /// Tag shown in the dashboard for this query
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Addresses to look up
    #[arg(value_name = "ADDRESS")]
    addresses: Vec<String>,
}

impl Args {
    /// Configured request defaults with the command-line overrides applied.
    fn request(&self, defaults: &RequestConfiguration) -> RequestConfiguration {
        RequestConfiguration {
            pretty_print: self.pretty || defaults.pretty_print,
            max_days: self.days.unwrap_or(defaults.max_days),
            return_node: self.node || defaults.return_node,
            tag: self.tag.clone().or_else(|| defaults.tag.clone()),
        }
    }
}

fn parse_addresses(values: &[String]) -> Result<Vec<InetAddress>> {
    values
        .iter()
        .map(|value| {
            value
                .parse::<InetAddress>()
                .with_context(|| format!("invalid address '{}'", value))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --print-config
    if args.print_config {
        println!("{}", Config::example());
        return Ok(());
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            Config::load(path)?
        }
        None => {
            let config = Config::default();
            config.validate()?;
            config
        }
    };

    // Handle --validate
    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    if args.addresses.is_empty() {
        anyhow::bail!("no addresses given");
    }
    let addresses = parse_addresses(&args.addresses)?;
    let request = args.request(&config.request);

    let client = ProxyCheckClient::new(&config)?;
    let response = client.check(&addresses, &request).await?;

    let json = response.to_json()?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if let Err(unsuccessful) = response.success_or_err() {
        anyhow::bail!(unsuccessful);
    }

    Ok(())
}
