pub mod api;
pub mod config;
pub mod pipeline;
pub mod transcribe;
pub mod translate;

pub use api::{AppState, router};
pub use config::Settings;
