use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::UserId;

/// In-memory product store.
///
/// Enforces the compound unique index over (name, description, price); the
/// price participates via its bit pattern so equal floats compare equal.
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn same_triple(a: &Product, b: &Product) -> bool {
    a.name == b.name && a.description == b.description && a.price.to_bits() == b.price.to_bits()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> Result<Product, ProductError> {
        let mut products = self.products.write().await;

        let triple_taken = products
            .values()
            .any(|existing| existing.id != product.id && same_triple(existing, &product));
        if triple_taken {
            return Err(ProductError::Duplicate);
        }

        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Product>, ProductError> {
        let mut owned: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|product| product.owner_id == *owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|product| product.created_at);
        Ok(owned)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let mut all: Vec<Product> = self.products.read().await.values().cloned().collect();
        all.sort_by_key(|product| product.created_at);
        Ok(all)
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<(), ProductError> {
        self.products
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ProductError::NotFound(format!("Product not found with id: {}", id)))
    }
}
