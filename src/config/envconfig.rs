use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    /// Keys whose values are comma-separated lists.
    const LIST_KEYS: &'static [&'static str] = &[];
    /// Unprefixed variables read as `(variable, key)` when the prefixed one is unset.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    fn load_dotenv() {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::from_vars(None)
    }

    /// Reads `vars` instead of the process environment when given.
    fn from_vars(vars: Option<config_rs::Map<String, String>>) -> Result<Self> {
        let mut builder = config_rs::Config::builder();
        for (variable, key) in Self::ALIASES {
            let value = match &vars {
                Some(vars) => vars.get(*variable).cloned(),
                None => std::env::var(variable).ok(),
            };
            if let Some(value) = value {
                builder = builder
                    .set_default(*key, value)
                    .with_context(|| format!("failed to apply {variable}"))?;
            }
        }

        let mut source = config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true)
            .source(vars);
        if !Self::LIST_KEYS.is_empty() {
            source = source.list_separator(",");
            for key in Self::LIST_KEYS {
                source = source.with_list_parse_key(key);
            }
        }

        let settings = builder
            .add_source(source)
            .build()
            .context("failed to read environment variables for config")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
