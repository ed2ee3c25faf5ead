use std::fmt;

use tracing::debug;

use crate::error::SigningError;
use crate::ports::{AminoSigner, DirectSigner, WalletConnection};
use crate::proto::cosmos::tx::signing::v1beta1::SignMode;

/// Which signing pipeline a connected wallet can drive.
#[derive(Clone, Copy)]
pub enum SignerCapability<'a> {
    Direct(&'a dyn DirectSigner),
    AminoOnly(&'a dyn AminoSigner),
}

impl SignerCapability<'_> {
    pub fn sign_mode(&self) -> SignMode {
        match self {
            SignerCapability::Direct(_) => SignMode::Direct,
            SignerCapability::AminoOnly(_) => SignMode::LegacyAminoJson,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignerCapability::Direct(_) => "direct",
            SignerCapability::AminoOnly(_) => "amino",
        }
    }
}

impl fmt::Debug for SignerCapability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerCapability::{}", self.name())
    }
}

/// Classifies the wallet once per attempt. Binary signing is preferred when
/// the wallet offers both.
pub fn classify<W: WalletConnection + ?Sized>(
    wallet: &W,
) -> Result<SignerCapability<'_>, SigningError> {
    let capability = if let Some(direct) = wallet.as_direct() {
        SignerCapability::Direct(direct)
    } else if let Some(amino) = wallet.as_amino() {
        SignerCapability::AminoOnly(amino)
    } else {
        return Err(SigningError::UnsupportedSigner);
    };
    debug!(capability = capability.name(), "classified wallet signer");
    Ok(capability)
}
