//! Bookshelf application library
//!
//! Project modules plus the registry wiring shared by the binary and the tests.

use std::sync::Arc;

use bookshelf_db::BookStore;
use bookshelf_kernel::ModuleRegistry;

pub mod modules;

/// Build a registry with every module wired to `store`
pub fn build_registry(store: Arc<dyn BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}
