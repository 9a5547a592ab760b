//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `FieldCatalogReader` - Loads a campaign's enabled field definitions
//! - `AnswerRepository` - Persists and retrieves per-user answer rows

mod answer_repository;
mod field_catalog;

pub use answer_repository::AnswerRepository;
pub use field_catalog::FieldCatalogReader;
