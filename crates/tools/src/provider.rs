//! Network provider construction.
//!
//! Remote bindings hand the deployment engine a provider with the alloy
//! recommended fillers, a retry-backoff HTTP transport, and a wallet
//! filler carrying the signing identity. Construction is lazy: no
//! connection is opened until the engine issues its first RPC call.

use alloy::network::EthereumWallet;
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy::providers::{Identity, ProviderBuilder, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::layers::RetryBackoffLayer;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::wallet::SigningIdentity;

pub type RecommendedFillers = JoinFill<
    Identity,
    JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
>;

/// What a remote network binding carries: a provider whose transactions
/// are signed by the binding's own identity.
pub type ProviderHandle =
    FillProvider<JoinFill<RecommendedFillers, WalletFiller<EthereumWallet>>, RootProvider>;

const RETRY_MAX: u32 = 5;
const RETRY_INITIAL_BACKOFF_MS: u64 = 1000;
const RETRY_CUPS: u64 = 100;

/// Parse and validate a remote endpoint URL. The error is scoped to the
/// named network; other bindings stay unaffected.
pub fn parse_endpoint(network: &str, endpoint: &str) -> Result<Url> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        network: network.to_string(),
        endpoint: endpoint.to_string(),
        reason,
    };

    let url: Url = endpoint.parse().map_err(|e: url::ParseError| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

/// Bind a signing identity to a network endpoint.
pub fn build_provider(identity: SigningIdentity, endpoint: Url) -> ProviderHandle {
    let retry_layer = RetryBackoffLayer::new(RETRY_MAX, RETRY_INITIAL_BACKOFF_MS, RETRY_CUPS);
    let client = RpcClient::builder().layer(retry_layer).http(endpoint);
    let wallet_filler = WalletFiller::new(identity.into_wallet());
    ProviderBuilder::new()
        .connect_client(client)
        .join_with(wallet_filler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretMaterial;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_endpoint_accepts_https() {
        let url = parse_endpoint("kovan", "https://kovan.infura.io/").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        let err = parse_endpoint("kovan", "not a url").unwrap_err();
        match err {
            ConfigError::InvalidEndpoint { network, endpoint, .. } => {
                assert_eq!(network, "kovan");
                assert_eq!(endpoint, "not a url");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_endpoint_rejects_non_http_scheme() {
        assert!(matches!(
            parse_endpoint("kovan", "ftp://kovan.infura.io/"),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_build_provider_is_lazy() {
        // No node listens here; construction alone must succeed.
        let identity =
            SigningIdentity::derive("devPK", &SecretMaterial::new(KEY)).unwrap();
        let url = parse_endpoint("kovan", "http://127.0.0.1:1/").unwrap();
        let _provider = build_provider(identity, url);
    }
}
