pub mod client;
pub mod types;

pub use client::StockVideoClient;
pub use types::MediaAsset;
