use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bookshelf_kernel::{InitCtx, Module};

use crate::store::BookStore;

/// Core module owning the document store connection: checked at init,
/// closed at shutdown.
pub struct DatabaseModule {
    store: Arc<dyn BookStore>,
}

impl DatabaseModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store
            .ping()
            .await
            .with_context(|| format!("{} store is not reachable", self.store.backend()))?;

        tracing::info!(
            module = self.name(),
            backend = self.store.backend(),
            collection = %ctx.settings.database.collection,
            "document store reachable"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store
            .close()
            .await
            .context("failed to close document store")?;
        tracing::info!(module = self.name(), "document store closed");
        Ok(())
    }
}
