mod manager;
pub mod render;
mod runner;
mod state;

pub use manager::{Dashboard, ViewerUpdate};
pub use runner::{parse_control, run_dashboard, Control};
pub use state::{DashboardStats, StatsSnapshot};
