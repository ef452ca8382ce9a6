use log::info;
use reqwest::Method;
use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::BanRequest;

pub async fn ban_user(api_client: &KickAPIClient, channel_id: &str, ban: &BanRequest) -> Result<(), ApiError> {
    api_client
        .send_empty(Method::POST, &format!("channels/{}/bans", channel_id), Some(ban))
        .await?;
    match ban.duration {
        Some(seconds) => info!("Timed out user {} for {}s", ban.user_id, seconds),
        None => info!("Banned user {}", ban.user_id),
    }
    Ok(())
}

pub async fn unban_user(api_client: &KickAPIClient, channel_id: &str, user_id: &str) -> Result<(), ApiError> {
    api_client
        .send_empty::<()>(Method::DELETE, &format!("channels/{}/bans/{}", channel_id, user_id), None)
        .await?;
    info!("Unbanned user {}", user_id);
    Ok(())
}
