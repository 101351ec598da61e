use anyhow::{bail, Context, Result};
use bridge_config::{Config, ConfigLoader, LogFormat};
use bridge_core::select_variant;
use bridge_estimation::{signer_channel, EstimateState, GasEstimateRequest};
use bridge_providers::{LocalSigner, ReadOnlySigner};
use bridge_types::{Adapters, Address, ChainId, Route, TransferSigner, U256};
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;

use app::App;

#[derive(Parser)]
#[command(name = "bridge-service")]
#[command(about = "Bridge transfer resolution and gas estimation", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	/// Overrides the configured log level
	#[arg(long, env = "BRIDGE_LOG_LEVEL")]
	log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Validate the configuration file
	Validate,
	/// Classify a route and show the strategy it resolves to
	Classify(RouteArgs),
	/// Estimate gas for a transfer
	Estimate(EstimateArgs),
}

#[derive(Args)]
struct RouteArgs {
	/// Source chain id
	#[arg(long)]
	from: ChainId,
	/// Destination chain id
	#[arg(long)]
	to: ChainId,
	/// Token contract on the source chain
	#[arg(long)]
	source_token: Option<Address>,
	/// Token contract on the destination chain
	#[arg(long)]
	destination_token: Option<Address>,
	/// Custom deposit adapter for the token
	#[arg(long)]
	deposit_adapter: Option<Address>,
	/// Custom withdrawal adapter for the token
	#[arg(long)]
	withdrawal_adapter: Option<Address>,
}

impl RouteArgs {
	fn route(&self) -> Route {
		Route {
			source_chain_id: self.from,
			destination_chain_id: self.to,
			source_token_address: self.source_token,
			destination_token_address: self.destination_token,
		}
	}

	fn adapters(&self) -> Option<Adapters> {
		let adapters = Adapters {
			deposit: self.deposit_adapter,
			withdrawal: self.withdrawal_adapter,
		};
		(!adapters.is_empty()).then_some(adapters)
	}
}

#[derive(Args)]
struct EstimateArgs {
	#[command(flatten)]
	route: RouteArgs,

	/// Amount in the token's smallest unit
	#[arg(long)]
	amount: U256,

	/// Private key of the sending wallet
	#[arg(long, env = "BRIDGE_PRIVATE_KEY", hide_env_values = true)]
	private_key: Option<String>,

	/// Sending wallet address, when no private key is given
	#[arg(long, conflicts_with = "private_key")]
	wallet: Option<Address>,

	/// Print the first estimate and exit instead of following refreshes
	#[arg(long)]
	once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	let log_level = cli
		.log_level
		.clone()
		.unwrap_or_else(|| config.service.log_level.clone());
	setup_tracing(&log_level, config.service.log_format)?;

	info!("Loaded configuration from {:?}", cli.config);

	match cli.command {
		Commands::Validate => validate_config(&config),
		Commands::Classify(args) => classify(config, &args),
		Commands::Estimate(args) => estimate(config, args).await,
	}
}

fn validate_config(config: &Config) -> Result<()> {
	info!("Configuration is valid");
	info!("Service name: {}", config.service.name);

	for chain in &config.chains {
		match chain.parent_chain_id {
			Some(parent) => info!("  Chain: {} ({}), parent {}", chain.name, chain.chain_id, parent),
			None => info!("  Chain: {} ({})", chain.name, chain.chain_id),
		}
	}

	info!(
		"Estimation: refresh every {}s, {} retries {}s apart",
		config.estimation.refresh_interval_secs,
		config.estimation.retry_count,
		config.estimation.retry_interval_secs
	);

	Ok(())
}

fn classify(config: Config, args: &RouteArgs) -> Result<()> {
	let app = App::from_config(config)?;
	let route = args.route();
	let adapters = args.adapters();

	let characteristics = app.factory.classifier().classify(&route, adapters.as_ref());
	let strategy = characteristics
		.is_supported
		.then(|| select_variant(&characteristics, adapters.as_ref()).to_string());

	let output = serde_json::json!({
		"route": route,
		"characteristics": characteristics,
		"strategy": strategy,
	});
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

async fn estimate(config: Config, args: EstimateArgs) -> Result<()> {
	let app = App::from_config(config)?;

	let signer: Arc<dyn TransferSigner> = match (&args.private_key, args.wallet) {
		(Some(key), _) => Arc::new(LocalSigner::new(key).context("Failed to load wallet")?),
		(None, Some(address)) => Arc::new(ReadOnlySigner(address)),
		(None, None) => bail!("Either --private-key or --wallet is required"),
	};
	let wallet = signer.address().await.context("Failed to get wallet address")?;

	let mut request = GasEstimateRequest::new(args.route.route(), args.amount).with_wallet(wallet);
	if let Some(adapters) = args.route.adapters() {
		request = request.with_adapters(adapters);
	}

	let (_signer_tx, signer_rx) = signer_channel(Some(signer));
	let service = app.estimation_service(signer_rx);
	let mut subscription = service.subscribe(request);

	info!("Estimating gas for {} from {}", request.route, wallet);

	if args.once {
		let state = subscription
			.wait_for(|state| !state.is_empty())
			.await
			.context("Estimation stopped before producing a result")?;
		print_state(&state)?;
		if let Some(e) = state.error {
			bail!("Gas estimation failed: {}", e);
		}
		return Ok(());
	}

	let mut states = Box::pin(subscription.into_stream());
	let shutdown = setup_shutdown_signal();
	tokio::pin!(shutdown);

	loop {
		tokio::select! {
			state = states.next() => match state {
				Some(state) if state.is_empty() => continue,
				Some(state) => print_state(&state)?,
				None => break,
			},
			_ = &mut shutdown => {
				info!("Shutdown signal received");
				break;
			}
		}
	}

	Ok(())
}

fn print_state(state: &EstimateState) -> Result<()> {
	let output = serde_json::json!({
		"result": state.result,
		"error": state.error.as_ref().map(|e| e.to_string()),
	});
	println!("{}", serde_json::to_string(&output)?);
	Ok(())
}

fn setup_tracing(log_level: &str, format: LogFormat) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	// Logs go to stderr so stdout only carries command output
	let registry = tracing_subscriber::registry().with(env_filter);
	match format {
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.try_init(),
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.try_init(),
	}
	.context("Failed to initialize logging")?;

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
