//! Credential verification for the login endpoint

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::AuthConfig;

/// Boolean predicate over a username/password pair.
///
/// Where credentials live and how they are compared is up to the
/// implementation; callers only learn whether the pair is accepted.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// Credentials held in memory, usually taken from the `auth` config section
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(user, password)| (user.into(), password.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config
                .users
                .iter()
                .map(|user| (user.username.clone(), user.password.clone())),
        )
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), password.as_bytes()))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
