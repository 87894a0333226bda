//! In-memory adapters for the Cascade entity-store ports.
//!
//! Durable storage is an external collaborator; these adapters back tests and
//! embedded single-process deployments. `MemoryStore::create` for builds
//! carries the idempotency contract the trigger engine relies on.

mod memory;
mod scm;

pub use memory::MemoryStore;
pub use scm::StaticScm;
