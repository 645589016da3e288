pub mod settings;

pub use settings::{DatabaseConfig, SecurityConfig, ServerConfig, Settings};
