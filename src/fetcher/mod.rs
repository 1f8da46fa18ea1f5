pub mod client;
pub mod errors;
pub mod pipeline;
pub mod safety;
pub mod types;

pub use client::fetch;
pub use errors::FetchError;
pub use safety::is_safe_url;
pub use types::{Charset, PageResponse};
