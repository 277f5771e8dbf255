//! Utility modules shared by sources and the analyzer.
//!
//! - [`HttpClient`]: reqwest client with the crate user agent and timeouts
//!
//! ```rust,no_run
//! use preprint_digest::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.get("https://api.biorxiv.org/details/biorxiv/2024-03-01/2024-03-02/0/json")
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpClient;
