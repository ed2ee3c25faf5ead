use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::actions::ActionRequest;
use crate::amino_client::{AminoSigningClient, FeeSetting};
use crate::capability::{classify, SignerCapability};
use crate::config::PipelineConfig;
use crate::direct::DirectSigningPipeline;
use crate::domain::{BroadcastResult, WalletAccount};
use crate::error::SigningError;
use crate::fee::FeeEstimator;
use crate::ports::{NodePort, WalletConnection};
use crate::registry::Registry;
use crate::state_machine::{ActorState, InFlightGuard};

/// Successful invocation: the included transaction and the identifier the
/// chain assigned, when the action produces one and it could be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub result: BroadcastResult,
    pub identifier: Option<String>,
}

/// Runs actions for one actor (one connected wallet account), at most one at
/// a time.
pub struct ActionOrchestrator<N, W>
where
    N: NodePort,
    W: WalletConnection,
{
    registry: Arc<Registry>,
    node: N,
    wallet: W,
    config: PipelineConfig,
    guard: InFlightGuard,
}

impl<N, W> ActionOrchestrator<N, W>
where
    N: NodePort,
    W: WalletConnection,
{
    pub fn new(registry: Arc<Registry>, node: N, wallet: W, config: PipelineConfig) -> Self {
        Self {
            registry,
            node,
            wallet,
            config,
            guard: InFlightGuard::new(),
        }
    }

    pub fn state(&self) -> ActorState {
        self.guard.state()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Errors are returned as produced by the failing stage and are never
    /// retried here. The in-flight guard is released on every exit path.
    pub async fn invoke(&self, request: ActionRequest) -> Result<ActionOutcome, SigningError> {
        let action = request.action.name();
        let permit = self.guard.try_enter().inspect_err(|_| {
            warn!(action, "rejected: another transaction is in flight");
        })?;
        debug!(action, transition = ?permit.transition(), "actor state changed");

        let outcome = self.run(&request).await;
        match permit.settle() {
            Ok(transition) => debug!(action, ?transition, "actor state changed"),
            Err(e) => warn!(action, "{e}"),
        }

        match &outcome {
            Ok(done) => info!(
                action,
                tx_hash = %done.result.tx_hash,
                identifier = ?done.identifier,
                "action completed"
            ),
            Err(e) => error!(action, outcome = ?e.outcome(), "action failed: {e}"),
        }
        outcome
    }

    async fn run(&self, request: &ActionRequest) -> Result<ActionOutcome, SigningError> {
        // Classified before anything touches the network.
        let capability = classify(&self.wallet)?;
        let account = self.signer_account().await?;

        let messages = request.action.messages(&account.address)?;
        let encoded = messages
            .iter()
            .map(|intent| self.registry.messages.encode_any(intent))
            .collect::<Result<Vec<_>, _>>()?;

        let fee = FeeEstimator::new(&self.node, &self.config)
            .estimate(
                &account,
                &encoded,
                &request.memo,
                request.timeout_height,
            )
            .await?;

        let result = match capability {
            SignerCapability::Direct(signer) => {
                DirectSigningPipeline::new(&self.registry.messages, &self.node, signer, &self.config)
                    .sign_and_broadcast(
                        &account,
                        &messages,
                        &fee,
                        &request.memo,
                        request.timeout_height,
                    )
                    .await?
            }
            SignerCapability::AminoOnly(signer) => {
                AminoSigningClient::new(&self.registry, &self.node, signer, &self.config)
                    .sign_and_broadcast(
                        &account,
                        &messages,
                        FeeSetting::Explicit(fee),
                        &request.memo,
                        request.timeout_height,
                    )
                    .await?
            }
        };

        let identifier = request
            .action
            .event_selector()
            .and_then(|selector| selector.extract(&result));
        if identifier.is_none() && request.action.event_selector().is_some() {
            warn!(tx_hash = %result.tx_hash, "no identifier found in the transaction events");
        }
        Ok(ActionOutcome { result, identifier })
    }

    async fn signer_account(&self) -> Result<WalletAccount, SigningError> {
        let accounts = self
            .wallet
            .accounts()
            .await
            .map_err(|e| SigningError::account_query("wallet", e))?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| SigningError::account_query("wallet", "wallet exposes no accounts"))
    }
}
