pub mod builtin_font;
pub mod config;
pub mod error;
pub mod font;
pub mod generator;
pub mod icon;
pub mod logger;
pub mod models;

pub use config::GeneratorConfig;
pub use error::IconError;
pub use generator::{generate, generate_all};
pub use models::{IconSpec, Theme};
