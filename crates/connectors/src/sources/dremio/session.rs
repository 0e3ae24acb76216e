//! Session token cache.

use super::JobApi;
use quarry_error::Result;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;

/// Login credentials plus the token obtained with them.
///
/// The token is fetched on first use and kept for the lifetime of the session;
/// there is no expiry or refresh. Concurrent first callers wait on a single login.
/// A failed login leaves the cache empty, so the next call tries again.
pub struct Session {
    user: String,
    password: SecretString,
    token: OnceCell<SecretString>,
}

impl Session {
    pub fn new(user: impl Into<String>, password: SecretString) -> Self {
        Self {
            user: user.into(),
            password,
            token: OnceCell::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Cached token, logging in first if there is none yet.
    pub async fn token(&self, api: &dyn JobApi) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                tracing::info!(user = %self.user, "No session token cached, logging in");
                let token = api
                    .authenticate(&self.user, self.password.expose_secret())
                    .await?;
                Ok::<_, quarry_error::QuarryError>(SecretString::from(token))
            })
            .await?;
        Ok(token.expose_secret())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.initialized()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
