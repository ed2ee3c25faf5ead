//! Chainboard: builds, signs and broadcasts dashboard actions from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chainboard_signing_adapters::{AdapterConfig, NodeRestAdapter, WalletBridgeSigner};
use chainboard_signing_core::{
    events, ActionOrchestrator, ActionOutcome, ActionRequest, BroadcastResult, NodePort, Registry, SigningError,
    TxOutcome,
};
use clap::{Args, Parser, Subcommand};
use eyre::{bail, eyre, Result, WrapErr};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "chainboard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign and broadcast one action request.
    Invoke(InvokeArgs),
    /// Read a chain-assigned identifier out of a saved broadcast result.
    Extract(ExtractArgs),
    /// Print the amino messages an action request would sign.
    Amino(AminoArgs),
}

#[derive(Debug, Args)]
struct Overrides {
    /// Node REST endpoint, overrides CHAINBOARD_REST_URL.
    #[arg(long)]
    rest_url: Option<String>,
    /// Chain id, overrides CHAINBOARD_CHAIN_ID.
    #[arg(long)]
    chain_id: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut AdapterConfig) {
        if let Some(url) = self.rest_url {
            config.rest_url = Some(url.trim_end_matches('/').to_owned());
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
    }
}

#[derive(Debug, Args)]
struct InvokeArgs {
    /// JSON action request.
    #[arg(long)]
    request: PathBuf,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// JSON broadcast result.
    #[arg(long)]
    result: PathBuf,
    #[arg(long)]
    event_type: String,
    #[arg(long = "attribute")]
    attribute_key: String,
}

#[derive(Debug, Args)]
struct AminoArgs {
    #[arg(long)]
    request: PathBuf,
    /// Sender address; defaults to the development signer's.
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeSummary {
    outcome: TxOutcome,
    tx_hash: Option<String>,
    code: Option<u32>,
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Invoke(args) => invoke(args).await,
        Command::Extract(args) => extract(args),
        Command::Amino(args) => amino(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

async fn invoke(args: InvokeArgs) -> Result<()> {
    let request: ActionRequest = read_json(&args.request)?;
    let mut config = AdapterConfig::from_env()?;
    args.overrides.apply(&mut config);

    let node = NodeRestAdapter::with_config(&config);
    let reported = node
        .chain_id()
        .await
        .wrap_err("failed to query node chain id")?;
    if reported != config.chain_id {
        bail!(
            "node reports chain id {reported}, configured chain id is {}",
            config.chain_id
        );
    }

    let wallet = WalletBridgeSigner::with_config(&config);
    let orchestrator = ActionOrchestrator::new(
        Arc::new(Registry::with_defaults()),
        node,
        wallet,
        config.into_pipeline_config()?,
    );

    tracing::info!(action = request.action.name(), "invoking action");
    let summary = summarize(orchestrator.invoke(request).await);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn summarize(result: Result<ActionOutcome, SigningError>) -> InvokeSummary {
    match result {
        Ok(outcome) => InvokeSummary {
            outcome: TxOutcome::Applied,
            tx_hash: Some(outcome.result.tx_hash),
            code: Some(outcome.result.code),
            identifier: outcome.identifier,
            error: None,
        },
        Err(err) => InvokeSummary {
            outcome: err.outcome(),
            tx_hash: failed_tx_hash(&err),
            code: failed_code(&err),
            identifier: None,
            error: Some(err.to_string()),
        },
    }
}

fn failed_tx_hash(err: &SigningError) -> Option<String> {
    match err {
        SigningError::BroadcastTimeout { tx_hash, .. }
        | SigningError::BroadcastRejected { tx_hash, .. }
        | SigningError::OnChainExecutionFailure { tx_hash, .. } => Some(tx_hash.clone()),
        _ => None,
    }
}

fn failed_code(err: &SigningError) -> Option<u32> {
    match err {
        SigningError::BroadcastRejected { code, .. }
        | SigningError::OnChainExecutionFailure { code, .. } => Some(*code),
        _ => None,
    }
}

fn extract(args: ExtractArgs) -> Result<()> {
    let result: BroadcastResult = read_json(&args.result)?;
    let value = events::extract(&result, &args.event_type, &args.attribute_key).ok_or_else(|| {
        eyre!(
            "no {}.{} attribute in tx {}",
            args.event_type,
            args.attribute_key,
            result.tx_hash
        )
    })?;
    println!("{value}");
    Ok(())
}

fn amino(args: AminoArgs) -> Result<()> {
    let request: ActionRequest = read_json(&args.request)?;
    let sender = match args.sender {
        Some(sender) => sender,
        None => AdapterConfig::from_env()?.dev_address,
    };
    let registry = Registry::with_defaults();
    let msgs = request
        .action
        .messages(&sender)?
        .iter()
        .map(|intent| registry.amino.to_amino(intent))
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&msgs)?);
    Ok(())
}
