//! Pool store data models.

use super::errors::{StoreError, StoreResult};
use crate::pool::{CardEntry, CardList};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque pool identifier issued by the pool-hosting service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePoolId(String);

impl RemotePoolId {
    /// Wrap an id that is already known to be bare
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a bare id or a pool link.
    ///
    /// Accepts `AbC123`, `` `AbC123` `` and `https://sealeddeck.tech/AbC123`;
    /// for links the id is the last non-empty path segment. Ids are limited
    /// to ASCII letters, digits, `_` and `-`.
    ///
    /// # Errors
    ///
    /// * `StoreError::InvalidReference` - No well-formed id could be extracted
    pub fn from_reference(reference: &str) -> StoreResult<Self> {
        let trimmed = reference.trim().trim_matches('`').trim();
        let candidate = if trimmed.contains("://") {
            Url::parse(trimmed).ok().and_then(|url| {
                url.path_segments()?
                    .rfind(|segment| !segment.is_empty())
                    .map(str::to_string)
            })
        } else {
            Some(trimmed.to_string())
        };

        match candidate {
            Some(id) if is_pool_id(&id) => Ok(Self(id)),
            _ => Err(StoreError::InvalidReference(reference.to_string())),
        }
    }

    /// Render the public link under `base`
    pub fn link(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.0)
    }

    /// Borrow the bare id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_pool_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for RemotePoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored pool as returned by `GET /pools/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolContents {
    #[serde(default)]
    pub sideboard: CardList,
    #[serde(default)]
    pub deck: CardList,
    #[serde(default)]
    pub hidden: CardList,
}

impl PoolContents {
    /// Union of all three partitions, sideboard first
    pub fn into_cards(self) -> CardList {
        let Self {
            mut sideboard,
            deck,
            hidden,
        } = self;
        sideboard.extend(deck);
        sideboard.extend(hidden);
        sideboard
    }
}

/// Body of `POST /pools`
#[derive(Debug, Serialize)]
pub struct CreatePoolRequest<'a> {
    pub sideboard: &'a [CardEntry],
    #[serde(rename = "poolId", skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<&'a str>,
}

/// Response of `POST /pools`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolResponse {
    #[serde(rename = "poolId")]
    pub pool_id: String,
}
