//! Configuration loading and management for the Rental Pricing Engine.
//!
//! This module provides functionality to load tariff configurations from YAML
//! files, including tariff metadata, pricing policy, and effective-dated
//! rate tables.
//!
//! # Example
//!
//! ```no_run
//! use rental_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded tariff: {}", config.tariff().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DocumentPolicy, PricingPolicy, RateEntry, RateTable, TariffConfig, TariffMetadata,
};
