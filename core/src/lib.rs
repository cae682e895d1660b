pub mod error;
pub mod gateway;
pub mod http;
pub mod prompt;
pub mod provider;
pub mod schema;
pub use anyhow::Result;
pub use anyhow::Error;
pub use anyhow::anyhow as anyhow;
