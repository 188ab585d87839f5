//! End-to-end wiring demo: connect, create indexes, then run a
//! create / list / soft-delete / restore round trip.
//!
//! ```bash
//! MONGODB_URL=mongodb://localhost:27017 MONGODB_DATABASE=catalog \
//!     cargo run -p domain_catalog --example catalog_demo
//! ```

use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::mongodb::{connect, MongoConfig};
use domain_catalog::{CreateProduct, ProductQuery, ProductRepository, ProductService};
use repository::MongoEntityStore;
use uuid::Uuid;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = MongoConfig::from_env()?;
    let client = connect(&config).await?;
    let db = client.database(&config.database);

    let repository = ProductRepository::new(MongoEntityStore::new(&db));
    repository.init_indexes().await?;
    let service = ProductService::new(repository);

    // Unique name per run so the demo can be re-run against the same
    // database without tripping the slug index.
    let run_tag = Uuid::now_v7().simple().to_string();
    let product = service
        .create_product(CreateProduct {
            name: format!("Walnut Desk Organizer {run_tag}"),
            slug: None,
            description: "Five-compartment organizer in oiled walnut".to_string(),
            price: 49.90,
            image: "https://example.com/img/walnut-organizer.jpg".to_string(),
        })
        .await?;
    tracing::info!(product_id = %product.id, slug = %product.slug, "Created");

    let by_slug = service.get_product_by_slug(&product.slug).await?;
    tracing::info!(name = %by_slug.name, price = by_slug.price, "Fetched by slug");

    let listing = service.get_products(ProductQuery::default()).await?;
    tracing::info!(
        total = listing.total_count,
        pages = listing.total_pages,
        "Active listing"
    );

    let id = product.id.to_string();
    service.delete_product(&id).await?;
    let trash = service.get_deleted_products(1, 10, None).await?;
    tracing::info!(deleted = trash.total_count, "After soft delete");

    let restored = service.restore_product(&id).await?;
    tracing::info!(product_id = %restored.id, "Restored");

    Ok(())
}
