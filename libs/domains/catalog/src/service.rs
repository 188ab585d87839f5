//! Product service: slug resolution, search filters, and not-found
//! translation.

use std::sync::Arc;

use repository::{EntityStore, Filter, ListOptions, Page, Sort};
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, CursorQuery, NewProduct, Product, ProductQuery, UpdateProduct};
use crate::repository::{CursorPage, ProductRepository};
use crate::slug::slugify;

/// Fields the free-text search matches against.
const SEARCH_FIELDS: &[&str] = &["name", "description"];

/// Service wrapping a [`ProductRepository`].
///
/// Lookups that come back empty are translated to
/// [`CatalogError::NotFound`], so callers never branch on `Option`.
pub struct ProductService<S: EntityStore<Product>> {
    products: Arc<ProductRepository<S>>,
}

impl<S: EntityStore<Product>> Clone for ProductService<S> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
        }
    }
}

impl<S: EntityStore<Product>> ProductService<S> {
    pub fn new(products: ProductRepository<S>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Create a product, resolving the slug explicitly: a supplied slug is
    /// normalized to lowercase, a missing one is derived from the name.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let slug = match input.slug {
            Some(slug) => slug.to_lowercase(),
            None => slugify(&input.name),
        };

        let product = self
            .products
            .create(NewProduct {
                name: input.name,
                slug,
                description: input.description,
                price: input.price,
                image: input.image,
            })
            .await?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    /// Offset-paginated listing of active products, newest first.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: ProductQuery) -> CatalogResult<Page<Product>> {
        let options = ListOptions {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(10),
            filter: search_filter(query.search.as_deref()),
            sort: Sort::newest_first(),
        };
        self.products.find_all(options).await
    }

    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Product> {
        self.products
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: &str,
        update: UpdateProduct,
    ) -> CatalogResult<Product> {
        self.products
            .update_by_id(id, update)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Soft delete. The product stays in storage and can be restored.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> CatalogResult<Product> {
        self.products
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn restore_product(&self, id: &str) -> CatalogResult<Product> {
        self.products
            .restore(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Paginated listing of soft-deleted products for admin surfaces.
    #[instrument(skip(self))]
    pub async fn get_deleted_products(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> CatalogResult<Page<Product>> {
        self.products
            .find_deleted(page, limit, search_filter(search))
            .await
    }

    /// Cursor-paginated listing for infinite scroll.
    #[instrument(skip(self))]
    pub async fn get_products_infinite(&self, query: CursorQuery) -> CatalogResult<CursorPage> {
        self.products.infinite_scroll(query).await
    }
}

/// A present, non-blank search term becomes a case-insensitive substring
/// match across name and description; anything else matches everything.
fn search_filter(search: Option<&str>) -> Filter {
    match search {
        Some(term) if !term.trim().is_empty() => Filter::new().search(SEARCH_FIELDS, term.trim()),
        _ => Filter::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_ignores_blank_terms() {
        assert!(search_filter(None).is_empty());
        assert!(search_filter(Some("")).is_empty());
        assert!(search_filter(Some("   ")).is_empty());
    }

    #[test]
    fn test_search_filter_trims_the_term() {
        let filter = search_filter(Some("  walnut  "));
        assert_eq!(
            filter.clauses(),
            &[repository::Clause::Search {
                fields: SEARCH_FIELDS,
                term: "walnut".to_string()
            }]
        );
    }
}
