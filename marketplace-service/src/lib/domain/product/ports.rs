use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::user::models::UserId;

/// Persistence operations for the product aggregate.
///
/// `save` has insert-or-replace semantics keyed by id. The store enforces a
/// compound unique index over (name, description, price).
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Persist a product, inserting or replacing by id.
    ///
    /// # Errors
    /// * `Duplicate` - another product already holds this (name,
    ///   description, price) triple
    /// * `StoreFailure` - store operation failed
    async fn save(&self, product: Product) -> Result<Product, ProductError>;

    /// Retrieve a product by identifier.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Retrieve every product owned by a user.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Product>, ProductError>;

    /// Retrieve all products.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    /// Remove a product.
    ///
    /// # Errors
    /// * `NotFound` - product does not exist
    /// * `StoreFailure` - store operation failed
    async fn delete_by_id(&self, id: &ProductId) -> Result<(), ProductError>;
}
