mod alpha_vantage;
mod iex;
mod yahoo;

pub use alpha_vantage::AlphaVantageProvider;
pub use iex::IexProvider;
pub use yahoo::YahooProvider;
