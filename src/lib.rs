pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod ui;

pub use api::{HttpApi, WorkoutApi};
pub use config::ClientConfig;
pub use errors::ClientError;
pub use session::SessionController;
pub use state::SessionState;
