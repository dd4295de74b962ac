pub mod browser;
pub mod error;
pub mod marketplace;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use browser::{ChromeOptions, ChromeSession};
pub use marketplace::MarketplaceCollector;
pub use types::CollectionParams;
