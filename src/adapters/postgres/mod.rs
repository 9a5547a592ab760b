//! PostgreSQL implementations of the storage ports.

mod answer_repository;
mod field_catalog;

pub use answer_repository::PostgresAnswerRepository;
pub use field_catalog::PostgresFieldCatalog;
