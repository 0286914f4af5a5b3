pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_db::BookRepo;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

/// Book catalog CRUD, mounted under `/books`
pub struct BooksModule {
    repo: BookRepo,
}

impl BooksModule {
    pub fn new(repo: BookRepo) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = self.repo.store().backend(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::list_books)
                    .post(handlers::create_books)
                    .delete(handlers::delete_all_books),
            )
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.repo.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn response(description: &str, schema: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": format!("#/components/schemas/{schema}") }))
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_parameter = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "24-character hexadecimal book identifier",
        "schema": { "type": "string" }
    });
    let book_list = json!({ "type": "array", "items": { "$ref": "#/components/schemas/Book" } });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": { "description": "All books", "content": json_content(book_list.clone()) },
                        "500": response("Store failure", "ErrorResponse")
                    }
                },
                "post": {
                    "summary": "Create one book, or a batch when the body is an array",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({
                            "oneOf": [
                                { "$ref": "#/components/schemas/BookInput" },
                                { "type": "array", "items": { "$ref": "#/components/schemas/BookInput" } }
                            ]
                        }))
                    },
                    "responses": {
                        "201": {
                            "description": "Created book, or every created book for a batch",
                            "content": json_content(json!({
                                "oneOf": [{ "$ref": "#/components/schemas/Book" }, book_list]
                            }))
                        },
                        "400": response("Validation failed; nothing was stored", "ErrorResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                },
                "delete": {
                    "summary": "Delete every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": response("Confirmation", "MessageResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter.clone()],
                    "responses": {
                        "200": response("The book", "Book"),
                        "400": response("Invalid book ID", "MessageResponse"),
                        "404": response("Book not found", "MessageResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                },
                "put": {
                    "summary": "Update the supplied fields of a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter.clone()],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/BookInput" }))
                    },
                    "responses": {
                        "200": response("The updated book", "Book"),
                        "400": response("Invalid book ID (message) or validation failure (error)", "ErrorResponse"),
                        "404": response("Book not found", "MessageResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter],
                    "responses": {
                        "200": response("Confirmation", "MessageResponse"),
                        "400": response("Invalid book ID", "MessageResponse"),
                        "404": response("Book not found", "MessageResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string", "description": "Store-assigned identifier" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "publishedYear": { "type": "integer" }
                    },
                    "required": ["_id", "title"]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "description": "Required on create; must not be blank" },
                        "author": { "type": "string" },
                        "publishedYear": { "type": "integer" }
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(repo: BookRepo) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repo))
}
