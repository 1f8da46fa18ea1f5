pub mod claims;
pub mod middleware;

pub use middleware::AuthenticatedUser;
