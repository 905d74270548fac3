//! Credentials applied by the HTTP executor
//!
//! Loaded from a YAML or JSON file, e.g.
//!
//! ```yaml
//! type: bearer
//! token: AAAA...
//! ```

use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

fn default_api_key_header() -> String {
    "Authorization".to_string()
}

/// How requests are authenticated
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// No authentication
    #[default]
    None,

    /// `Authorization: Bearer <token>`
    Bearer { token: String },

    /// Key sent in a header, optionally prefixed
    ApiKey {
        #[serde(default = "default_api_key_header")]
        header: String,
        #[serde(default)]
        prefix: Option<String>,
        value: String,
    },

    /// HTTP Basic authentication
    Basic { username: String, password: String },

    /// Arbitrary pre-computed headers
    Headers { headers: BTreeMap<String, String> },
}

impl Credentials {
    /// Load credentials from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read credentials {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&contents)
    }

    /// Parse credentials from YAML or JSON text
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Short name of the credential kind, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::None => "none",
            Credentials::Bearer { .. } => "bearer",
            Credentials::ApiKey { .. } => "api_key",
            Credentials::Basic { .. } => "basic",
            Credentials::Headers { .. } => "headers",
        }
    }

    /// Apply the credentials to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::None => req,
            Credentials::Bearer { token } => req.bearer_auth(token),
            Credentials::ApiKey {
                header,
                prefix,
                value,
            } => req.header(
                header.as_str(),
                format!("{}{}", prefix.as_deref().unwrap_or(""), value),
            ),
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
            Credentials::Headers { headers } => headers
                .iter()
                .fold(req, |req, (name, value)| req.header(name.as_str(), value.as_str())),
        }
    }
}

// Secrets stay out of debug output
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
