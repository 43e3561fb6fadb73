//! Credentials for the forum and the object store.
//!
//! Values come from the process environment, optionally seeded from a `.env` file.
//! They are read and validated once at startup and then passed explicitly to the
//! collaborators that need them.
use mention_common::net::DEFAULT_REGION;
use mention_common::{MentionError, Result};

use crate::args::PublishTarget;

/// Forum OAuth client id.
pub const CLIENT_ID_VAR: &str = "REDDIT_API_CLIENT_ID";
/// Forum OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_API_CLIENT_SECRET";
/// User agent sent with every forum request.
pub const USER_AGENT_VAR: &str = "REDDIT_API_USER_AGENT";
/// Object store access key id.
pub const STORAGE_KEY_VAR: &str = "S3_KEY";
/// Object store secret access key.
pub const STORAGE_SECRET_VAR: &str = "S3_SECRET";
/// Object store region, optional.
pub const STORAGE_REGION_VAR: &str = "S3_REGION";

/// Credentials of the forum API application.
#[derive(Clone)]
pub struct ForumCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Credentials of the object store.
#[derive(Clone)]
pub struct StorageCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Everything a run needs besides its CLI arguments.
#[derive(Clone)]
pub struct Config {
    pub forum: ForumCredentials,
    pub storage: Option<StorageCredentials>,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Forum credentials are mandatory. Storage credentials are optional as a pair:
    /// setting only one of key and secret is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &str| read(name).ok_or_else(|| MentionError::MissingConfig(name.to_string()));

        let forum = ForumCredentials {
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
            user_agent: require(USER_AGENT_VAR)?,
        };

        let storage = match (read(STORAGE_KEY_VAR), read(STORAGE_SECRET_VAR)) {
            (Some(access_key), Some(secret_key)) => {
                let region = read(STORAGE_REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string());
                if !region
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                {
                    return Err(MentionError::InvalidConfig {
                        field: STORAGE_REGION_VAR.to_string(),
                        reason: format!("{:?} is not a region name", region),
                    });
                }
                Some(StorageCredentials {
                    access_key,
                    secret_key,
                    region,
                })
            }
            (None, None) => None,
            (Some(_), None) => return Err(MentionError::MissingConfig(STORAGE_SECRET_VAR.to_string())),
            (None, Some(_)) => return Err(MentionError::MissingConfig(STORAGE_KEY_VAR.to_string())),
        };

        Ok(Config { forum, storage })
    }

    /// Storage credentials, required when the report is going to be uploaded.
    pub fn storage_for(&self, target: PublishTarget) -> Result<Option<&StorageCredentials>> {
        match target {
            PublishTarget::Local => Ok(None),
            PublishTarget::S3 => self
                .storage
                .as_ref()
                .map(Some)
                .ok_or_else(|| MentionError::MissingConfig(STORAGE_KEY_VAR.to_string())),
        }
    }
}
