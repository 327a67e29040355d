//! Deployment target configuration.
//!
//! This module provides typed, strongly-validated configuration for the
//! deployment targets. Targets are described by a manifest resolved in
//! priority order:
//!
//! 1. `deploy.toml` in the working directory (or an explicit path)
//! 2. Built-in defaults matching the historical targets
//!
//! Remote targets name their own secret field, so every network signs with
//! an independently configurable key.
//!
//! # Examples
//!
//! ```rust,no_run
//! use evmdeploy_tools::{Configuration, Manifest, SecretStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::load()?;
//! let secrets = SecretStore::load()?;
//! let config = Configuration::build(&manifest, &secrets)?;
//! println!("{} networks configured", config.networks.len());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::provider::{self, ProviderHandle};
use crate::secrets::SecretStore;
use crate::wallet::SigningIdentity;

/// Default manifest file probed when no path is given.
pub const DEFAULT_MANIFEST_PATH: &str = "deploy.toml";

fn default_network_id() -> String {
    "*".to_string()
}

/// One deployment target, before secrets are resolved.
///
/// A single parameterized spec per target replaces per-network copy-paste:
/// the full target list is iterated once by [`Configuration::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkSpec {
    /// Local node, assumed unlocked; no signing identity involved.
    Local {
        host: String,
        port: u16,
        /// Matches any network id by default.
        #[serde(default = "default_network_id")]
        network_id: String,
    },
    /// Remote endpoint authenticated with a named secret.
    Remote {
        /// Secret field holding this target's private key.
        secret_field: String,
        endpoint: String,
        network_id: String,
        #[serde(default)]
        gas: Option<u64>,
    },
}

impl NetworkSpec {
    /// Resolve this spec into a binding. Failure is scoped to the one
    /// target: a local spec never touches the secret store, so it stays
    /// constructible when a remote sibling is misconfigured.
    pub fn build(&self, name: &str, secrets: &SecretStore) -> Result<NetworkBinding> {
        match self {
            NetworkSpec::Local {
                host,
                port,
                network_id,
            } => Ok(NetworkBinding::Local {
                host: host.clone(),
                port: *port,
                network_id: network_id.clone(),
            }),
            NetworkSpec::Remote {
                secret_field,
                endpoint,
                network_id,
                gas,
            } => {
                let url = provider::parse_endpoint(name, endpoint)?;
                let material = secrets.get(secret_field)?;
                let identity = SigningIdentity::derive(secret_field, &material)?;
                let from = identity.address();
                let handle = provider::build_provider(identity, url.clone());
                tracing::debug!(network = name, from = %from, "bound remote network");
                Ok(NetworkBinding::Remote {
                    provider: handle,
                    endpoint: url,
                    network_id: network_id.clone(),
                    gas: *gas,
                    from,
                })
            }
        }
    }
}

impl fmt::Display for NetworkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkSpec::Local {
                host,
                port,
                network_id,
            } => write!(f, "{host}:{port} (local, network_id {network_id})"),
            NetworkSpec::Remote {
                endpoint,
                network_id,
                ..
            } => write!(f, "{endpoint} (network_id {network_id})"),
        }
    }
}

/// Optimizer tuning: gas-cost efficiency versus code size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolcTuning {
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

/// Solidity compiler selection and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolcSettings {
    pub version: String,
    /// Compile inside the versioned compiler container.
    #[serde(default)]
    pub docker: bool,
    #[serde(default)]
    pub settings: SolcTuning,
}

impl Default for SolcSettings {
    fn default() -> Self {
        Self {
            version: "0.4.24".to_string(),
            docker: true,
            settings: SolcTuning::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    pub solc: SolcSettings,
}

/// Deployment manifest: the full target list plus compiler settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkSpec>,
    #[serde(default)]
    pub compilers: Option<CompilerSettings>,
}

impl Manifest {
    /// Load `deploy.toml` from the working directory, falling back to the
    /// built-in targets when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_or_default(Path::new(DEFAULT_MANIFEST_PATH))
    }

    /// Load a manifest file; a missing file yields [`Manifest::builtin`],
    /// a present but malformed file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();

        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "no deployment manifest, using built-in targets"
            );
            return Ok(Self::builtin());
        }

        let content = std::fs::read_to_string(path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            networks = manifest.networks.len(),
            "loaded deployment manifest"
        );
        Ok(manifest)
    }

    /// The historical target list: a local development node and the kovan
    /// testnet, compiled with solc 0.4.24 in docker.
    pub fn builtin() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "development".to_string(),
            NetworkSpec::Local {
                host: "localhost".to_string(),
                port: 7545,
                network_id: "*".to_string(),
            },
        );
        networks.insert(
            "kovan".to_string(),
            NetworkSpec::Remote {
                secret_field: "ropstenPK".to_string(),
                endpoint: "https://kovan.infura.io/".to_string(),
                network_id: "42".to_string(),
                gas: Some(5_687_344),
            },
        );

        Self {
            networks,
            compilers: Some(CompilerSettings::default()),
        }
    }
}

/// A resolved deployment target.
pub enum NetworkBinding {
    /// Local unlocked node reached by host and port.
    Local {
        host: String,
        port: u16,
        network_id: String,
    },
    /// Remote endpoint with a bound signing provider.
    Remote {
        provider: ProviderHandle,
        endpoint: Url,
        network_id: String,
        gas: Option<u64>,
        /// Sender address of the derived identity, for operator display.
        from: Address,
    },
}

impl fmt::Debug for NetworkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkBinding::Local {
                host,
                port,
                network_id,
            } => f
                .debug_struct("Local")
                .field("host", host)
                .field("port", port)
                .field("network_id", network_id)
                .finish(),
            NetworkBinding::Remote {
                endpoint,
                network_id,
                gas,
                from,
                ..
            } => f
                .debug_struct("Remote")
                .field("endpoint", &endpoint.as_str())
                .field("network_id", network_id)
                .field("gas", gas)
                .field("from", from)
                .finish_non_exhaustive(),
        }
    }
}

// Manual Serialize: the provider handle has no structural representation,
// so the remote variant serializes its descriptive fields only.
impl Serialize for NetworkBinding {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            NetworkBinding::Local {
                host,
                port,
                network_id,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("host", host)?;
                map.serialize_entry("port", port)?;
                map.serialize_entry("network_id", network_id)?;
                map.end()
            }
            NetworkBinding::Remote {
                endpoint,
                network_id,
                gas,
                from,
                ..
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("endpoint", endpoint.as_str())?;
                map.serialize_entry("network_id", network_id)?;
                map.serialize_entry("gas", gas)?;
                map.serialize_entry("from", &from.to_string())?;
                map.end()
            }
        }
    }
}

/// Immutable record handed to the deployment engine: one binding per
/// target network plus compiler settings.
#[derive(Debug, Serialize)]
pub struct Configuration {
    pub networks: BTreeMap<String, NetworkBinding>,
    pub compilers: Option<CompilerSettings>,
}

impl Configuration {
    /// Resolve every target in the manifest. Any failing binding aborts
    /// the build; no partial configuration is produced.
    pub fn build(manifest: &Manifest, secrets: &SecretStore) -> Result<Self> {
        let mut networks = BTreeMap::new();
        for (name, spec) in &manifest.networks {
            let binding = spec.build(name, secrets)?;
            networks.insert(name.clone(), binding);
        }

        Ok(Self {
            networks,
            compilers: manifest.compilers.clone(),
        })
    }

    /// Print the resolved configuration. Sender addresses are the only
    /// identity-derived values shown.
    pub fn print_summary(&self) {
        println!("Resolved deployment configuration");
        for (name, binding) in &self.networks {
            match binding {
                NetworkBinding::Local {
                    host,
                    port,
                    network_id,
                } => {
                    println!("  {name:<12} {host}:{port} (network_id {network_id})");
                }
                NetworkBinding::Remote {
                    endpoint,
                    network_id,
                    gas,
                    from,
                    ..
                } => {
                    print!("  {name:<12} {endpoint} (network_id {network_id}");
                    if let Some(gas) = gas {
                        print!(", gas {gas}");
                    }
                    println!(") from {from}");
                }
            }
        }
        if let Some(compilers) = &self.compilers {
            let solc = &compilers.solc;
            let optimizer = &solc.settings.optimizer;
            println!(
                "  solc {} (docker: {}, optimizer: {}, runs: {})",
                solc.version, solc.docker, optimizer.enabled, optimizer.runs
            );
        }
    }

    /// Get the configuration as JSON (provider handles excluded).
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
