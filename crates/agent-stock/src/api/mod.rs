//! API clients for market data providers

pub mod sec_edgar;
pub mod serper;
pub mod yahoo;

pub use sec_edgar::{FilingType, SecEdgarClient, SecFiling};
pub use serper::{SearchResult, SerperClient};
pub use yahoo::{NewsItem, YahooNewsClient};
