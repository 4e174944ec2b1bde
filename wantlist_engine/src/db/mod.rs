//! Storage backends for the wantlist engine.
//!
//! Persistence schemas belong to the host application; the engine only speaks the [`crate::traits::WantlistManagement`]
//! contract. The bundled [`memory::MemoryDatabase`] backend upholds that contract in process memory and is the
//! default for embedding and for tests.
pub mod memory;
