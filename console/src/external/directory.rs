//! Product directory client
//!
//! Read-only lookups used to pick products and fill filter options.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{Category, Product, ProductGroup, SessionContext, Supplier};

use super::api::{accepted, ApiClient};
use crate::error::ConsoleResult;

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_products(
        &self,
        session: &SessionContext,
        search: Option<&str>,
    ) -> ConsoleResult<Vec<Product>>;

    async fn list_suppliers(&self, session: &SessionContext) -> ConsoleResult<Vec<Supplier>>;

    async fn list_categories(&self, session: &SessionContext) -> ConsoleResult<Vec<Category>>;

    async fn list_groups(&self, session: &SessionContext) -> ConsoleResult<Vec<ProductGroup>>;
}

#[derive(Debug, Default, Serialize)]
struct SearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ProductList {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct SupplierList {
    suppliers: Vec<Supplier>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct GroupList {
    groups: Vec<ProductGroup>,
}

/// REST client for the product directory
#[derive(Clone)]
pub struct DirectoryClient {
    api: ApiClient,
}

impl DirectoryClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DirectoryApi for DirectoryClient {
    async fn list_products(
        &self,
        session: &SessionContext,
        search: Option<&str>,
    ) -> ConsoleResult<Vec<Product>> {
        let query = SearchQuery {
            search: search.map(str::trim).filter(|s| !s.is_empty()),
        };
        let list: ProductList = accepted(self.api.get("products", &query, Some(session)).await?)?;
        Ok(list.products)
    }

    async fn list_suppliers(&self, session: &SessionContext) -> ConsoleResult<Vec<Supplier>> {
        let list: SupplierList =
            accepted(self.api.get("suppliers", &SearchQuery::default(), Some(session)).await?)?;
        Ok(list.suppliers)
    }

    async fn list_categories(&self, session: &SessionContext) -> ConsoleResult<Vec<Category>> {
        let list: CategoryList =
            accepted(self.api.get("categories", &SearchQuery::default(), Some(session)).await?)?;
        Ok(list.categories)
    }

    async fn list_groups(&self, session: &SessionContext) -> ConsoleResult<Vec<ProductGroup>> {
        let list: GroupList =
            accepted(self.api.get("groups", &SearchQuery::default(), Some(session)).await?)?;
        Ok(list.groups)
    }
}
