//! Front-end configuration sourced from the environment.

use anyhow::{bail, Result};
use std::env;

/// Identifiers produced by the setup binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assistant_id: String,
    pub vector_store_id: String,
}

impl AppConfig {
    /// Reads `ASSISTANT_ID` and `VECTOR_STORE_ID`, refusing to start when
    /// either is missing so the operator runs setup first.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            assistant_id: require("ASSISTANT_ID")?,
            vector_store_id: require("VECTOR_STORE_ID")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{name} is not set"),
    }
}
