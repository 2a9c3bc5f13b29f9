pub mod config;
pub mod json_path;
