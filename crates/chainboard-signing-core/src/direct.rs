use tracing::{debug, info};

use crate::broadcast::Broadcaster;
use crate::codec::MessageCodecRegistry;
use crate::config::PipelineConfig;
use crate::domain::{BroadcastResult, Fee, MessageIntent, WalletAccount};
use crate::error::SigningError;
use crate::ports::{DirectSigner, NodePort};
use crate::proto::cosmos::tx::signing::v1beta1::SignMode;
use crate::proto::cosmos::tx::v1beta1::{SignDoc, TxRaw};
use crate::tx::{
    auth_info_and_bytes, decode_signature, encode_tx_raw, fetch_account, resolve_pub_key,
    signer_info, tx_body_and_bytes, tx_hash,
};

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTx {
    pub tx_raw: TxRaw,
    pub tx_bytes: Vec<u8>,
    pub tx_hash: String,
}

/// Binary (`SIGN_MODE_DIRECT`) signing. Each step consumes the previous
/// step's output and aborts the attempt on the first failure.
pub struct DirectSigningPipeline<'a, N: ?Sized> {
    codecs: &'a MessageCodecRegistry,
    node: &'a N,
    signer: &'a dyn DirectSigner,
    config: &'a PipelineConfig,
}

impl<'a, N: NodePort + ?Sized> DirectSigningPipeline<'a, N> {
    pub fn new(
        codecs: &'a MessageCodecRegistry,
        node: &'a N,
        signer: &'a dyn DirectSigner,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            codecs,
            node,
            signer,
            config,
        }
    }

    pub async fn sign(
        &self,
        account: &WalletAccount,
        messages: &[MessageIntent],
        fee: &Fee,
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<SignedTx, SigningError> {
        let anys = messages
            .iter()
            .map(|intent| self.codecs.encode_any(intent))
            .collect::<Result<Vec<_>, _>>()?;
        let (_, body_bytes) = tx_body_and_bytes(anys, memo, timeout_height);

        // Read as late as possible: only the SignDoc is built after this.
        let on_chain = fetch_account(self.node, &account.address).await?;
        debug!(
            address = %account.address,
            account_number = on_chain.account_number,
            sequence = on_chain.sequence,
            "account sequence fetched"
        );
        let pub_key = resolve_pub_key(&on_chain, account, self.config.pub_key_type)?;
        let (_, auth_info_bytes) = auth_info_and_bytes(
            signer_info(pub_key, on_chain.sequence, SignMode::Direct),
            fee,
        );

        let sign_doc = SignDoc {
            body_bytes,
            auth_info_bytes,
            chain_id: self.config.chain_id.clone(),
            account_number: on_chain.account_number,
        };

        let response = self
            .signer
            .sign_direct(&account.address, sign_doc)
            .await
            .map_err(SigningError::from_signer)?;
        let signature = decode_signature(&response.signature)?;

        let tx_raw = TxRaw {
            body_bytes: response.signed.body_bytes,
            auth_info_bytes: response.signed.auth_info_bytes,
            signatures: vec![signature.signature],
        };
        let tx_bytes = encode_tx_raw(&tx_raw);
        let tx_hash = tx_hash(&tx_bytes);
        debug!(tx_hash = %tx_hash, "direct signature obtained");
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
        fee: &Fee,
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<BroadcastResult, SigningError> {
        let signed = self
            .sign(account, messages, fee, memo, timeout_height)
            .await?;
        info!(tx_hash = %signed.tx_hash, mode = "direct", "broadcasting");
        Broadcaster::new(self.node, self.config.broadcast)
            .broadcast(signed.tx_bytes)
            .await
    }
}
