use reqwest::Method;
use serde_json::json;
use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::ChatMessage;

pub async fn get_chat_messages(api_client: &KickAPIClient, channel_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
    api_client.get(&format!("channels/{}/chat", channel_id)).await
}

pub async fn send_chat_message(api_client: &KickAPIClient, channel_id: &str, message: &str) -> Result<ChatMessage, ApiError> {
    api_client
        .request(Method::POST, &format!("channels/{}/chat", channel_id), Some(&json!({ "message": message })))
        .await
}

pub async fn delete_chat_message(api_client: &KickAPIClient, channel_id: &str, message_id: &str) -> Result<(), ApiError> {
    api_client
        .send_empty::<()>(Method::DELETE, &format!("channels/{}/chat/{}", channel_id, message_id), None)
        .await
}
