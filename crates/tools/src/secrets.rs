//! Secret material loading.
//!
//! Signing keys live in an untracked `secrets.toml` next to the deployment
//! manifest, one named hex field per key:
//!
//! ```toml
//! ropstenPK = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
//! ```
//!
//! Fields are resolved in priority order:
//!
//! 1. Environment variable `EVMDEPLOY_SECRET_<FIELD>` (field name uppercased)
//! 2. The secrets file
//! 3. `MissingSecret` error
//!
//! A `.env` file is honored before resolution. Empty values count as missing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ConfigError, Result};

/// Default secrets file probed when no path is given.
pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

const ENV_PREFIX: &str = "EVMDEPLOY_SECRET_";

/// A hex-encoded private key read from the secret source.
///
/// The raw value never appears in `Debug` output and is wiped from memory
/// on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretMaterial(String);

impl SecretMaterial {
    /// Wrap a hex value, accepting an optional `0x` prefix.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value
            .strip_prefix("0x")
            .map(str::to_owned)
            .unwrap_or(value);
        Self(trimmed)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the raw hex string. Callers must not pass the result to any
    /// logging or display sink.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretMaterial(<redacted>)")
    }
}

/// Named secret fields backing the remote network bindings.
#[derive(Debug, Default)]
pub struct SecretStore {
    source_path: String,
    fields: BTreeMap<String, SecretMaterial>,
}

impl SecretStore {
    /// Load the default secrets file from the working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_SECRETS_PATH))
    }

    /// Load a secrets file. A missing file yields an empty store so that
    /// purely env-provided secrets (and secret-free local targets) still
    /// work; a present but malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let fields = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let raw: BTreeMap<String, String> = toml::from_str(&content)?;
            raw.into_iter()
                .map(|(field, value)| (field, SecretMaterial::new(value)))
                .collect()
        } else {
            BTreeMap::new()
        };

        tracing::debug!(
            path = %path.display(),
            fields = fields.len(),
            "loaded secret store"
        );

        Ok(Self {
            source_path: path.display().to_string(),
            fields,
        })
    }

    /// Build a store directly from field/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source_path: "<memory>".to_string(),
            fields: pairs
                .into_iter()
                .map(|(field, value)| (field.into(), SecretMaterial::new(value)))
                .collect(),
        }
    }

    /// Look up a named secret, environment override first.
    pub fn get(&self, field: &str) -> Result<SecretMaterial> {
        let env_key = format!("{ENV_PREFIX}{}", field.to_uppercase());
        let material = match std::env::var(&env_key) {
            Ok(value) => Some(SecretMaterial::new(value)),
            Err(_) => self.fields.get(field).cloned(),
        };

        match material {
            Some(material) if !material.is_empty() => Ok(material),
            _ => Err(ConfigError::MissingSecret {
                field: field.to_string(),
                source_path: self.source_path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_get_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "ropstenPK = \"{KEY}\"").unwrap();

        let store = SecretStore::load_from(&path).unwrap();
        assert_eq!(store.get("ropstenPK").unwrap().reveal(), KEY);
    }

    #[test]
    fn test_missing_field() {
        let store = SecretStore::from_pairs([("ropstenPK", KEY)]);
        let err = store.get("kovanPK").unwrap_err();
        match err {
            ConfigError::MissingSecret { field, .. } => assert_eq!(field, "kovanPK"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(store.get("ropstenPK").is_err());
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let store = SecretStore::from_pairs([("ropstenPK", "")]);
        assert!(matches!(
            store.get("ropstenPK"),
            Err(ConfigError::MissingSecret { .. })
        ));
    }

    #[test]
    fn test_env_override_wins() {
        let store = SecretStore::from_pairs([("deployPK", "deadbeef")]);
        temp_env::with_var("EVMDEPLOY_SECRET_DEPLOYPK", Some(KEY), || {
            assert_eq!(store.get("deployPK").unwrap().reveal(), KEY);
        });
    }

    #[test]
    fn test_hex_prefix_is_stripped() {
        let material = SecretMaterial::new(format!("0x{KEY}"));
        assert_eq!(material.reveal(), KEY);
    }

    #[test]
    fn test_debug_is_redacted() {
        let material = SecretMaterial::new(KEY);
        let rendered = format!("{material:?}");
        assert!(!rendered.contains(KEY));
        assert!(rendered.contains("redacted"));
    }
}
