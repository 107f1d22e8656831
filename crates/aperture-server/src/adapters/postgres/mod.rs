//! PostgreSQL Repository Implementations

mod crm_search;
mod session_repository;
mod studio_repository;

pub use crm_search::PgCrmSearch;
pub use session_repository::PgSessionRepository;
pub use studio_repository::PgStudioRepository;
