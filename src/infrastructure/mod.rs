// Infrastructure layer - External dependencies and adapters
pub mod anthropic_client;
pub mod config;
pub mod csv_loader;
