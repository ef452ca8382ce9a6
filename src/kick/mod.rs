pub mod api;
pub mod public;

pub use api::{ApiError, KickAPIClient};
pub use public::{ChannelSource, KickPublicClient};
