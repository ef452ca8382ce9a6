use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use tokio::sync::{oneshot, Mutex};
use tokio::time::timeout;
use url::Url;
use uuid::Uuid;
use warp::Filter;
use crate::config::Config;
use crate::kick::api::client::KickAPIClient;
use crate::kick::api::errors::ApiError;
use crate::kick::api::models::User;
use crate::kick::api::requests::get_user_info;

pub const OAUTH_SCOPES: &str = "channel:read channel:write chat:read chat:write";
const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(300);

type CallbackParams = HashMap<String, String>;
type CallbackSender = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

pub fn authorize_url(config: &Config, state: &str) -> Result<Url, ApiError> {
    let client_id = config.client_id.as_deref().ok_or(ApiError::MissingCredential("client_id"))?;
    let url = Url::parse_with_params(
        &config.oauth_authorize_url,
        &[
            ("client_id", client_id),
            ("redirect_uri", config.redirect_uri().as_str()),
            ("response_type", "code"),
            ("scope", OAUTH_SCOPES),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// Pulls the authorization code out of the redirect's query parameters.
pub fn parse_callback(params: &CallbackParams, expected_state: &str) -> Result<String, ApiError> {
    if let Some(error) = params.get("error") {
        let detail = params.get("error_description").unwrap_or(error);
        return Err(ApiError::AuthorizationDenied(detail.clone()));
    }
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(ApiError::StateMismatch);
    }
    params
        .get("code")
        .filter(|code| !code.is_empty())
        .cloned()
        .ok_or_else(|| ApiError::AuthorizationDenied("no code in callback".to_string()))
}

/// Runs the browser authorization-code flow and logs the user in.
///
/// A one-shot local server on the redirect port receives the callback.
pub async fn login(api_client: &KickAPIClient) -> Result<User, ApiError> {
    let expected_state = Uuid::new_v4().to_string();
    let (url, port) = {
        let config = api_client.config().read().await;
        (authorize_url(&config, &expected_state)?, config.redirect_port)
    };

    let (code_tx, code_rx) = oneshot::channel::<CallbackParams>();
    let code_tx: CallbackSender = Arc::new(Mutex::new(Some(code_tx)));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let routes = warp::get()
        .and(warp::path("callback"))
        .and(warp::query::<CallbackParams>())
        .and(warp::any().map(move || code_tx.clone()))
        .and_then(|params: CallbackParams, code_tx: CallbackSender| async move {
            let reply = if params.contains_key("code") {
                "Authorization received! You can close this window now."
            } else {
                "Authorization failed. Please try again."
            };
            if let Some(tx) = code_tx.lock().await.take() {
                let _ = tx.send(params);
            }
            Ok::<_, Infallible>(reply)
        });

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(([127, 0, 0, 1], port), async {
            shutdown_rx.await.ok();
        })
        .map_err(|e| ApiError::CallbackServer(e.to_string()))?;
    info!("Waiting for OAuth callback on http://{}", addr);
    let server_handle = tokio::spawn(server);

    println!("Please open the following URL in your browser to authorize kickwatch:");
    println!("{}", url);
    if webbrowser::open(url.as_str()).is_err() {
        warn!("Failed to open the browser automatically. Please open the URL manually.");
    }

    let outcome = timeout(AUTHORIZATION_TIMEOUT, code_rx).await;
    let _ = shutdown_tx.send(());
    if let Err(e) = server_handle.await {
        warn!("Callback server did not shut down cleanly: {}", e);
    }

    let params = match outcome {
        Ok(Ok(params)) => params,
        Ok(Err(_)) | Err(_) => return Err(ApiError::AuthorizationTimeout),
    };
    let code = parse_callback(&params, &expected_state)?;

    api_client.exchange_code(&code).await?;
    let user = get_user_info(api_client).await?;
    if let Err(e) = api_client.config().write().await.set_user(user.clone()) {
        warn!("Failed to save user to config: {}", e);
    }
    info!("Logged in as {}", user.username);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> CallbackParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn authorize_url_carries_everything() {
        let mut config = Config::default();
        config.client_id = Some("abc".to_string());
        config.redirect_port = 4000;
        let url = authorize_url(&config, "xyz").unwrap();
        let query: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("kick.com"));
        assert_eq!(query["client_id"], "abc");
        assert_eq!(query["redirect_uri"], "http://localhost:4000/callback");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], OAUTH_SCOPES);
        assert_eq!(query["state"], "xyz");
    }

    #[test]
    fn authorize_url_needs_client_id() {
        let config = Config::default();
        assert!(matches!(authorize_url(&config, "s"), Err(ApiError::MissingCredential("client_id"))));
    }

    #[test]
    fn callback_with_code_and_state() {
        let p = params(&[("code", "c0de"), ("state", "s1")]);
        assert_eq!(parse_callback(&p, "s1").unwrap(), "c0de");
    }

    #[test]
    fn callback_with_wrong_state() {
        let p = params(&[("code", "c0de"), ("state", "other")]);
        assert!(matches!(parse_callback(&p, "s1"), Err(ApiError::StateMismatch)));
    }

    #[test]
    fn callback_with_error() {
        let p = params(&[("error", "access_denied"), ("state", "s1")]);
        match parse_callback(&p, "s1") {
            Err(ApiError::AuthorizationDenied(detail)) => assert_eq!(detail, "access_denied"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
