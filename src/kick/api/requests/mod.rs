pub mod channel;
pub mod chat;
pub mod clips;
pub mod moderation;
pub mod stream;
pub mod subscriptions;

pub use channel::{get_channel_info, get_channel_stats, get_user_info};
pub use chat::{delete_chat_message, get_chat_messages, send_chat_message};
pub use clips::{create_clip, delete_clip, get_clips};
pub use moderation::{ban_user, unban_user};
pub use stream::{get_categories, get_stream_info, update_stream_info};
pub use subscriptions::get_subscribers;
