//! Synthetic audience activity shown while a channel is live.
//!
//! Nothing here performs I/O. Every tick takes the live flag, its inputs,
//! the current time and a [`RandomSource`], and returns a snapshot the caller
//! can render.

mod catalog;
mod chat;
mod errors;
mod random;
mod roster;
mod weighted;

pub use catalog::{default_message_templates, default_viewer_names, DEFAULT_MESSAGE_TEMPLATES, DEFAULT_VIEWER_NAMES};
pub use chat::{ChatLog, ChatTick, SimulatedMessage, CHAT_HISTORY_LIMIT, NEW_FOLLOWER_PROBABILITY};
pub use errors::SimulationError;
pub use random::{shuffle, RandomSource, RngSource};
pub use roster::{ViewerRoster, ViewerSnapshot, LEAVE_PROBABILITY, MIN_PRESENT_VIEWERS};
pub use weighted::{select_weighted, ChatRole, RoleWeights, DEFAULT_ROLE_WEIGHTS};
