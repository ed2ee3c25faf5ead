//! Signing client for wallets that can only sign amino JSON. One call runs
//! fee resolution, the JSON transformation, the wallet prompt and the
//! broadcast.

use tracing::{debug, info};

use crate::amino::{AminoMsg, StdFee, StdSignDoc};
use crate::broadcast::Broadcaster;
use crate::config::PipelineConfig;
use crate::direct::SignedTx;
use crate::domain::{BroadcastResult, Fee, MessageIntent, WalletAccount};
use crate::error::SigningError;
use crate::fee::FeeEstimator;
use crate::ports::{AminoSigner, NodePort};
use crate::proto::cosmos::tx::signing::v1beta1::SignMode;
use crate::proto::cosmos::tx::v1beta1::TxRaw;
use crate::registry::Registry;
use crate::tx::{
    auth_info_and_bytes, decode_signature, encode_tx_raw, fetch_account, resolve_pub_key,
    signer_info, tx_body_and_bytes, tx_hash,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeSetting {
    /// Simulate and derive the fee from the configured gas settings.
    Auto,
    Explicit(Fee),
}

impl From<&Fee> for StdFee {
    fn from(fee: &Fee) -> Self {
        StdFee {
            amount: fee.amount.clone(),
            gas: fee.gas_limit,
        }
    }
}

impl From<StdFee> for Fee {
    fn from(fee: StdFee) -> Self {
        Fee {
            amount: fee.amount,
            gas_limit: fee.gas,
        }
    }
}

pub struct AminoSigningClient<'a, N: ?Sized> {
    registry: &'a Registry,
    node: &'a N,
    signer: &'a dyn AminoSigner,
    config: &'a PipelineConfig,
}

impl<'a, N: NodePort + ?Sized> AminoSigningClient<'a, N> {
    pub fn new(
        registry: &'a Registry,
        node: &'a N,
        signer: &'a dyn AminoSigner,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            registry,
            node,
            signer,
            config,
        }
    }

    pub async fn sign(
        &self,
        account: &WalletAccount,
        messages: &[MessageIntent],
        fee: FeeSetting,
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<SignedTx, SigningError> {
        let fee = match fee {
            FeeSetting::Explicit(fee) => fee,
            FeeSetting::Auto => {
                let anys = messages
                    .iter()
                    .map(|intent| self.registry.messages.encode_any(intent))
                    .collect::<Result<Vec<_>, _>>()?;
                FeeEstimator::new(self.node, self.config)
                    .estimate(account, &anys, memo, timeout_height)
                    .await?
            }
        };

        let msgs = messages
            .iter()
            .map(|intent| self.registry.amino.to_amino(intent))
            .collect::<Result<Vec<AminoMsg>, _>>()?;

        let on_chain = fetch_account(self.node, &account.address).await?;
        debug!(
            address = %account.address,
            account_number = on_chain.account_number,
            sequence = on_chain.sequence,
            "account sequence fetched"
        );

        let sign_doc = StdSignDoc {
            account_number: on_chain.account_number,
            chain_id: self.config.chain_id.clone(),
            fee: StdFee::from(&fee),
            memo: memo.to_owned(),
            msgs,
            sequence: on_chain.sequence,
            timeout_height,
        };

        let response = self
            .signer
            .sign_amino(&account.address, sign_doc)
            .await
            .map_err(SigningError::from_signer)?;
        let signature = decode_signature(&response.signature)?;

        // The wallet may have edited fee or memo; the signature covers the
        // returned document, so the transaction is built from it.
        let signed = response.signed;
        let anys = signed
            .msgs
            .iter()
            .map(|msg| {
                let intent = self.registry.amino.from_amino(msg)?;
                self.registry.messages.encode_any(&intent)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let (_, body_bytes) = tx_body_and_bytes(anys, &signed.memo, signed.timeout_height);

        let pub_key = resolve_pub_key(&on_chain, account, self.config.pub_key_type)?;
        let (_, auth_info_bytes) = auth_info_and_bytes(
            signer_info(pub_key, signed.sequence, SignMode::LegacyAminoJson),
            &Fee::from(signed.fee),
        );

        let tx_raw = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![signature.signature],
        };
        let tx_bytes = encode_tx_raw(&tx_raw);
        let tx_hash = tx_hash(&tx_bytes);
        debug!(tx_hash = %tx_hash, "amino signature obtained");
        Ok(SignedTx {
            tx_raw,
            tx_bytes,
            tx_hash,
        })
    }

    pub async fn sign_and_broadcast(
        &self,
        account: &WalletAccount,
        messages: &[MessageIntent],
        fee: FeeSetting,
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<BroadcastResult, SigningError> {
        let signed = self
            .sign(account, messages, fee, memo, timeout_height)
            .await?;
        info!(tx_hash = %signed.tx_hash, mode = "amino", "broadcasting");
        Broadcaster::new(self.node, self.config.broadcast)
            .broadcast(signed.tx_bytes)
            .await
    }
}
