use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, header};
use serde_json::Value;

use crate::{
    config,
    types::{Token, UserResponse},
};

/// Client credentials for the Spotify token endpoint.
///
/// Holds the application's client ID and secret and derives the Basic
/// authorization header the token endpoint expects. The credentials are
/// constructed explicitly where a token grant is performed and handed to
/// the grant functions; nothing else in the application ever sees the
/// secret. Request handlers pass only the resulting short-lived bearer
/// token further down.
///
/// # Example
///
/// ```
/// let creds = ClientCredentials::from_env();
/// let token = exchange_code(&creds, &code).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Builds credentials from the application configuration.
    ///
    /// # Panics
    ///
    /// Panics if `SPOTIFY_API_AUTH_CLIENT_ID` or
    /// `SPOTIFY_API_AUTH_CLIENT_SECRET` is not set, matching the behavior
    /// of the underlying config getters.
    pub fn from_env() -> Self {
        ClientCredentials {
            client_id: config::spotify_client_id(),
            client_secret: config::spotify_client_secret(),
        }
    }

    pub fn new(client_id: String, client_secret: String) -> Self {
        ClientCredentials {
            client_id,
            client_secret,
        }
    }

    // "Basic base64(id:secret)" per RFC 6749 section 2.3.1.
    fn basic_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}

/// Exchanges an authorization code for an access token.
///
/// Completes the OAuth 2.0 authorization-code flow: the client application
/// obtained the code by sending the user through Spotify's consent page and
/// forwards it here for the confidential exchange. The redirect URI sent
/// with the exchange must match the one used for the consent request.
///
/// # Arguments
///
/// * `creds` - Client credentials for the Basic authorization header
/// * `code` - Authorization code received by the client application
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Token)` - Access token, refresh token, scope and expiry metadata
/// - `Err(reqwest::Error)` - HTTP error, network error, or API error
///
/// # Token Contents
///
/// Fields missing from the upstream response decode to empty defaults
/// rather than failing; a response without an `access_token` surfaces to
/// the caller as a token that fails on first use, never as a crash.
///
/// # Example
///
/// ```
/// let creds = ClientCredentials::from_env();
/// let token = exchange_code(&creds, "AQA...auth_code").await?;
/// println!("Access token: {}", token.access_token);
/// ```
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly (typically 10
/// minutes). The exchange should happen immediately after receiving it.
pub async fn exchange_code(
    creds: &ClientCredentials,
    code: &str,
) -> Result<Token, reqwest::Error> {
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header(header::AUTHORIZATION, creds.basic_header())
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &redirect_uri),
        ])
        .send()
        .await?;

    let json: Value = res.json().await?;

    Ok(token_from_json(&json))
}

/// Obtains a fresh access token from a refresh token.
///
/// Every data endpoint of this server receives the client's long-lived
/// refresh token and derives a short-lived bearer token per request, so no
/// credential state survives between requests.
///
/// # Arguments
///
/// * `creds` - Client credentials for the Basic authorization header
/// * `refresh_token` - Refresh token obtained from a previous code exchange
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Token)` - New token with fresh access token and updated expiration
/// - `Err(String)` - Error message describing the failure
///
/// # Error Conditions
///
/// Common failures include network connectivity issues, an invalid or
/// revoked refresh token, and Spotify API service errors.
///
/// # Example
///
/// ```
/// let token = refresh_token(&creds, "AQC...refresh_token").await?;
/// println!("New access token expires in {} seconds", token.expires_in);
/// ```
pub async fn refresh_token(
    creds: &ClientCredentials,
    refresh_token: &str,
) -> Result<Token, String> {
    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header(header::AUTHORIZATION, creds.basic_header())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let json: Value = res.json().await.map_err(|e| e.to_string())?;

    Ok(token_from_json(&json))
}

/// Retrieves the id of the user the given bearer token belongs to.
///
/// # Arguments
///
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(String)` - The Spotify user id
/// - `Err(reqwest::Error)` - Network error, API error, or decode error
///
/// # Example
///
/// ```
/// let user_id = current_user(&token.access_token).await?;
/// ```
pub async fn current_user(token: &str) -> Result<String, reqwest::Error> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());

    let client = Client::new();
    let res = client
        .get(&api_url)
        .bearer_auth(token)
        .send()
        .await?
        .json::<UserResponse>()
        .await?;

    Ok(res.id)
}

fn token_from_json(json: &Value) -> Token {
    Token {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
