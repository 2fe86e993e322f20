pub mod config;
pub mod data;
pub mod market_data;
pub mod rounding;
