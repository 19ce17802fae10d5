//! Client Configuration

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::error::{Error, Result};

/// Characters left as-is in query keys and values. Everything else is
/// percent-encoded.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'*')
    .remove(b',');

/// Project URL and public (anon) API key
#[derive(Debug, Clone)]
pub struct ClientConfig {
    url: Url,
    anon_key: String,
}

impl ClientConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(Error::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            url,
            anon_key: anon_key.into(),
        })
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Absolute URL for a service path such as `/auth/v1/user`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.as_str().trim_end_matches('/'), path)
    }

    /// Storage key for the persisted session: `sb-<project-ref>-auth-token`
    pub fn storage_key(&self) -> String {
        let project = self
            .url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or("local");
        format!("sb-{}-auth-token", project)
    }
}

/// Percent-encode a query key or value
pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY).to_string()
}
