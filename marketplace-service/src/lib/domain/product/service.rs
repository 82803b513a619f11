use std::sync::Arc;

use auth::Identity;
use chrono::Utc;

use crate::domain::access;
use crate::domain::access::AccessError;
use crate::domain::access::Caller;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::UserRepository;

/// Domain service for product operations.
///
/// Mutations resolve the caller and the ownership fact against the store on
/// every call; neither is cached, so a concurrent ownership change cannot
/// leak a stale allow. Lookups are ordered 404-first: a missing product is
/// reported before any permission evaluation.
pub struct ProductService<PR, UR>
where
    PR: ProductRepository,
    UR: UserRepository,
{
    products: Arc<PR>,
    users: Arc<UR>,
}

impl<PR, UR> ProductService<PR, UR>
where
    PR: ProductRepository,
    UR: UserRepository,
{
    pub fn new(products: Arc<PR>, users: Arc<UR>) -> Self {
        Self { products, users }
    }

    /// Resolve a token identity to a stored user row.
    ///
    /// The role is taken from the store, not the token, so a demotion takes
    /// effect on the caller's next request rather than at token expiry.
    async fn resolve_caller(&self, identity: Option<&Identity>) -> Result<Caller, ProductError> {
        let identity = identity.ok_or(AccessError::Unauthenticated)?;

        let email = EmailAddress::new(identity.subject.clone())
            .map_err(|_| AccessError::Unauthenticated)?;

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(ProductError::from)?
            .ok_or(AccessError::Unauthenticated)?;

        Ok(Caller {
            id: user.id,
            role: user.role,
        })
    }

    /// Public listing of every product.
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.products.list_all().await
    }

    /// Public single-product read.
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(format!("Product not found with id: {}", id)))
    }

    /// The caller's own products.
    pub async fn my_products(
        &self,
        identity: Option<&Identity>,
    ) -> Result<Vec<Product>, ProductError> {
        let caller = self.resolve_caller(identity).await?;
        self.products.find_by_owner(&caller.id).await
    }

    /// Create a product owned by the caller.
    pub async fn create_product(
        &self,
        identity: Option<&Identity>,
        command: CreateProductCommand,
    ) -> Result<Product, ProductError> {
        let caller = self.resolve_caller(identity).await?;

        let product = Product {
            id: ProductId::new(),
            name: command.name,
            description: command.description,
            price: command.price,
            owner_id: caller.id,
            created_at: Utc::now(),
        };

        let created = self.products.save(product).await?;
        tracing::info!(product_id = %created.id, owner_id = %created.owner_id, "Product created");

        Ok(created)
    }

    /// Update a product: 404 lookup, then owner-or-admin, then the
    /// empty-update rejection, then apply.
    pub async fn update_product(
        &self,
        identity: Option<&Identity>,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let mut product = self.get_product(id).await?;

        let caller = self.resolve_caller(identity).await?;
        access::require_owner_or_admin(Some(&caller), &product.owner_id)
            .map_err(|e| denial(e, "You don't have permission to modify this product."))?;

        if command.is_empty() {
            return Err(ProductError::NothingToUpdate);
        }

        if let Some(name) = command.name {
            product.name = name;
        }
        if let Some(description) = command.description {
            product.description = description;
        }
        if let Some(price) = command.price {
            product.price = price;
        }

        self.products.save(product).await
    }

    /// Delete a product: 404 lookup, then owner-or-admin.
    pub async fn delete_product(
        &self,
        identity: Option<&Identity>,
        id: &ProductId,
    ) -> Result<(), ProductError> {
        let product = self.get_product(id).await?;

        let caller = self.resolve_caller(identity).await?;
        access::require_owner_or_admin(Some(&caller), &product.owner_id)
            .map_err(|e| denial(e, "You don't have permission to delete this product."))?;

        self.products.delete_by_id(id).await?;
        tracing::info!(product_id = %id, "Product deleted");

        Ok(())
    }
}

fn denial(err: AccessError, message: &str) -> ProductError {
    match err {
        AccessError::Forbidden => ProductError::PermissionDenied(message.to_string()),
        other => ProductError::Access(other),
    }
}
