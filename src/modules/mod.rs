pub mod books;

use std::sync::Arc;

use bookshelf_db::{BookRepo, BookStore, DatabaseModule};
use bookshelf_kernel::ModuleRegistry;

/// Register the store lifecycle module and every project module
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) {
    registry.register_core(Arc::new(DatabaseModule::new(store.clone())));
    registry.register_custom(books::create_module(BookRepo::new(store)));
}
