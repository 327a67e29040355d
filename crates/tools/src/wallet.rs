//! Signing identity derivation.

use std::fmt;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroize;

use crate::error::{ConfigError, Result};
use crate::secrets::SecretMaterial;

/// A wallet derived from secret material, able to authorize transactions
/// on a remote network.
///
/// `Debug` and `Display` show only the public address; the underlying key
/// never reaches any formatting or logging sink.
#[derive(Clone)]
pub struct SigningIdentity {
    signer: PrivateKeySigner,
}

impl SigningIdentity {
    /// Derive an identity from a hex-encoded private key. Deterministic:
    /// the same hex input always yields the same identity.
    ///
    /// `field` is the secret field name, carried into errors so the
    /// operator knows which entry to fix.
    pub fn derive(field: &str, material: &SecretMaterial) -> Result<Self> {
        let invalid = |reason: String| ConfigError::InvalidKey {
            field: field.to_string(),
            reason,
        };

        let mut bytes = hex::decode(material.reveal()).map_err(|e| invalid(e.to_string()))?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(invalid(format!("expected 32 key bytes, got {len}")));
        }

        let key = B256::from_slice(&bytes);
        bytes.zeroize();

        let signer =
            PrivateKeySigner::from_bytes(&key).map_err(|e| invalid(e.to_string()))?;
        Ok(Self { signer })
    }

    /// Public address of the derived account.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Consume the identity into a transaction-signing wallet.
    pub fn into_wallet(self) -> EthereumWallet {
        EthereumWallet::new(self.signer)
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningIdentity")
            .field(&self.signer.address())
            .finish()
    }
}

impl fmt::Display for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signer.address())
    }
}
