//! EVM Deployment Tools Library
//!
//! Provides configuration management for smart contract deployment: secret
//! loading, wallet derivation, and per-network provider bindings.

pub mod config;
pub mod error;
pub mod provider;
pub mod secrets;
pub mod wallet;

pub use config::{CompilerSettings, Configuration, Manifest, NetworkBinding, NetworkSpec};
pub use error::{ConfigError, Result};
pub use provider::ProviderHandle;
pub use secrets::{SecretMaterial, SecretStore};
pub use wallet::SigningIdentity;
