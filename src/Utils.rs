//! different utility modules used throughout the project
/// logger initialisation from string log levels
pub mod logger;
/// TOML configuration of the engine and the critical point search
pub mod config;
