//! Server configuration from the environment

use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8090";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub google: GoogleOAuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw_addr = env_value("CONSOLE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid CONSOLE_BIND_ADDR {:?}: {}", raw_addr, e))?;

        Ok(Self {
            bind_addr,
            google: GoogleOAuthConfig::from_env(),
        })
    }
}

/// Google OAuth client settings; secrets never leave the server
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub token_url: String,
    pub userinfo_url: String,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

impl GoogleOAuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: env_value("GOOGLE_CLIENT_ID"),
            client_secret: env_value("GOOGLE_CLIENT_SECRET"),
            redirect_uri: env_value("GOOGLE_REDIRECT_URI"),
            token_url: env_value("GOOGLE_TOKEN_URL").unwrap_or(defaults.token_url),
            userinfo_url: env_value("GOOGLE_USERINFO_URL").unwrap_or(defaults.userinfo_url),
        }
    }

    /// Client id and secret, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_need_id_and_secret() {
        let mut config = GoogleOAuthConfig {
            client_id: Some("id".into()),
            ..GoogleOAuthConfig::default()
        };
        assert_eq!(config.credentials(), None);

        config.client_secret = Some("secret".into());
        assert_eq!(config.credentials(), Some(("id", "secret")));
        assert!(!format!("{:?}", config).contains("\"secret\""));
    }
}
