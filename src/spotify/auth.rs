use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{Res, config, spotify::api_error_message, types::Token};

/// Application credentials for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Res<Self> {
        Ok(Self {
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret()?,
            token_url: config::spotify_apitoken_url(),
        })
    }

    /// Value of the `Authorization` header for the token endpoint.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw.as_bytes()))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

/// Requests an app access token with the client-credentials grant.
///
/// No user interaction is involved: the application's id and secret are sent
/// as HTTP Basic credentials and the service answers with a bearer token that
/// is valid for catalog reads (search, playlists, audio features).
///
/// # API Endpoint
///
/// `POST {SPOTIFY_API_TOKEN_URL}` with `grant_type=client_credentials`
///
/// # Errors
///
/// Returns an error for network failures and for any non-success status,
/// carrying the service's `error_description` when present.
pub async fn request_token(credentials: &Credentials) -> Res<Token> {
    let client = Client::new();
    let response = client
        .post(&credentials.token_url)
        .header("Authorization", credentials.basic_auth_header())
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!(
            "Token request failed with {}: {}",
            status,
            api_error_message(&body)
        )
        .into());
    }

    let json = response.json::<TokenResponse>().await?;
    Ok(Token {
        access_token: json.access_token,
        token_type: json.token_type,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
