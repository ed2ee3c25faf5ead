use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::BroadcastConfig;
use crate::domain::BroadcastResult;
use crate::error::SigningError;
use crate::ports::NodePort;
use crate::tx::tx_hash;

/// Submits signed bytes and waits for inclusion. Never resubmits.
pub struct Broadcaster<'a, N: ?Sized> {
    node: &'a N,
    config: BroadcastConfig,
}

impl<'a, N: NodePort + ?Sized> Broadcaster<'a, N> {
    pub fn new(node: &'a N, config: BroadcastConfig) -> Self {
        Self { node, config }
    }

    pub async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<BroadcastResult, SigningError> {
        let local_hash = tx_hash(&tx_bytes);
        let check = self
            .node
            .broadcast_tx_sync(tx_bytes)
            .await
            .map_err(|e| SigningError::BroadcastFailed(format!("tx {local_hash}: {e}")))?;

        let hash = if check.tx_hash.is_empty() {
            local_hash
        } else {
            check.tx_hash
        };

        if check.code != 0 {
            warn!(tx_hash = %hash, code = check.code, "broadcast rejected by CheckTx");
            return Err(SigningError::BroadcastRejected {
                code: check.code,
                raw_log: check.raw_log,
                tx_hash: hash,
            });
        }

        info!(tx_hash = %hash, "broadcast accepted, waiting for inclusion");

        let result = match timeout(self.config.timeout, self.wait_for_inclusion(&hash)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(tx_hash = %hash, timeout = ?self.config.timeout, "no inclusion observed");
                return Err(SigningError::BroadcastTimeout {
                    tx_hash: hash,
                    timeout: self.config.timeout,
                });
            }
        };

        if result.code != 0 {
            warn!(tx_hash = %result.tx_hash, code = result.code, "tx failed on chain");
            return Err(SigningError::OnChainExecutionFailure {
                code: result.code,
                raw_log: result.raw_log,
                tx_hash: result.tx_hash,
            });
        }

        info!(tx_hash = %result.tx_hash, height = result.height, "tx included");
        Ok(result)
    }

    async fn wait_for_inclusion(&self, hash: &str) -> BroadcastResult {
        loop {
            match self.node.query_tx(hash).await {
                Ok(Some(result)) => return result,
                Ok(None) => debug!(tx_hash = %hash, "tx not yet included"),
                // The outcome stays unknown until the deadline; keep polling.
                Err(e) => warn!(tx_hash = %hash, "inclusion query failed: {e}"),
            }
            sleep(self.config.poll_interval).await;
        }
    }
}
