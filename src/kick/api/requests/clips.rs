use reqwest::Method;
use serde_json::json;
use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::Clip;

pub async fn get_clips(api_client: &KickAPIClient, channel_id: &str) -> Result<Vec<Clip>, ApiError> {
    api_client.get(&format!("channels/{}/clips", channel_id)).await
}

pub async fn create_clip(api_client: &KickAPIClient, channel_id: &str, title: &str) -> Result<Clip, ApiError> {
    api_client
        .request(Method::POST, &format!("channels/{}/clips", channel_id), Some(&json!({ "title": title })))
        .await
}

pub async fn delete_clip(api_client: &KickAPIClient, clip_id: &str) -> Result<(), ApiError> {
    api_client
        .send_empty::<()>(Method::DELETE, &format!("clips/{}", clip_id), None)
        .await
}
