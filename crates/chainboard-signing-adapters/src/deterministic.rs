use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chainboard_signing_core::{StdPubKey, StdSignature, WalletAccount};
use sha2::{Digest, Sha256};

/// Development-only signer. Produces stable, verifiably fake signatures so
/// the pipeline can be exercised end to end without a wallet.
#[derive(Debug, Clone)]
pub struct DeterministicSigner {
    address: String,
    pub_key: [u8; 33],
}

impl DeterministicSigner {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let digest = Sha256::digest(address.as_bytes());
        let mut pub_key = [0u8; 33];
        pub_key[0] = 0x02;
        pub_key[1..].copy_from_slice(&digest);
        Self { address, pub_key }
    }

    pub fn account(&self) -> WalletAccount {
        WalletAccount {
            address: self.address.clone(),
            algo: "secp256k1".to_owned(),
            pub_key: self.pub_key.to_vec(),
        }
    }

    /// 64 bytes: `sha256(mode ‖ address ‖ payload)` followed by the sha256
    /// of that digest.
    pub fn signature(&self, mode: &str, payload: &[u8]) -> StdSignature {
        let mut hasher = Sha256::new();
        hasher.update(mode.as_bytes());
        hasher.update(self.address.as_bytes());
        hasher.update(payload);
        let first = hasher.finalize();
        let second = Sha256::digest(first);

        let mut sig = Vec::with_capacity(64);
        sig.extend_from_slice(&first);
        sig.extend_from_slice(&second);
        StdSignature {
            pub_key: StdPubKey {
                kind: "tendermint/PubKeySecp256k1".to_owned(),
                value: BASE64.encode(self.pub_key),
            },
            signature: BASE64.encode(sig),
        }
    }
}
