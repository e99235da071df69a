//! Provider and signer construction.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use color_eyre::eyre::{eyre, Result};

/// A connected provider plus the identity signing through it.
#[derive(Debug)]
pub struct Connection {
    pub provider: DynProvider,
    pub signer: Address,
}

/// Connect to `rpc_url` signing with `private_key`.
///
/// The chain id fetch doubles as a reachability check so a dead endpoint
/// or malformed key fails before any task starts.
pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Connection> {
    // Accept keys with or without the 0x prefix
    let private_key = if private_key.starts_with("0x") {
        private_key.to_string()
    } else {
        format!("0x{private_key}")
    };

    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| eyre!("Invalid private key: {e}"))?;
    let address = signer.address();

    let url: Url = rpc_url
        .parse()
        .map_err(|e| eyre!("Invalid RPC URL '{rpc_url}': {e}"))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased();

    provider
        .get_chain_id()
        .await
        .map_err(|e| eyre!("Could not reach {rpc_url}: {e}"))?;

    Ok(Connection {
        provider,
        signer: address,
    })
}

/// Read-only connection for lookups that don't sign anything.
pub fn connect_readonly(rpc_url: &str) -> Result<DynProvider> {
    let url: Url = rpc_url
        .parse()
        .map_err(|e| eyre!("Invalid RPC URL '{rpc_url}': {e}"))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_key_fails_before_any_network_io() {
        let err = connect("http://localhost:8545", "not-a-key")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let key = "0x0000000000000000000000000000000000000000000000000000000000000001";
        let err = connect("not a url", key).await.unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[test]
    fn test_readonly_connection_accepts_valid_urls() {
        assert!(connect_readonly("http://localhost:8545").is_ok());
        assert!(connect_readonly("also not a url").is_err());
    }
}
