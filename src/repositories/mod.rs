pub mod memory;
pub mod postgres;
pub mod web_content;

pub use memory::InMemoryWebContentRepository;
pub use postgres::PgWebContentRepository;
pub use web_content::{PageCursor, WebContentPage, WebContentRepositoryTrait};
