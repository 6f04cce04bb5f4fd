//! Browse Example - drive the engine against the live catalog API
//!
//! Loads the first page and the category list, pages once, then runs a
//! debounced search, printing state snapshots along the way.
//!
//! Run: cargo run -p vitrine-engine --example browse

use std::time::Duration;
use vitrine_engine::{CatalogEngine, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vitrine_engine::logger::init_logger();

    let config = EngineConfig::from_env();
    let engine = CatalogEngine::open(&config)?;

    println!("=== Initial load ===");
    engine.load_initial().await;
    let state = engine.snapshot().await;
    println!("categories: {}", state.categories.len());
    println!("products:   {}", state.all_products.len());
    if let Some(error) = &state.error {
        println!("error:      {error}");
    }

    println!("\n=== Next page ===");
    engine.load_next_page().await;
    let state = engine.snapshot().await;
    println!("products:   {} (has_more: {})", state.all_products.len(), state.has_more);

    println!("\n=== Debounced search: \"phone\" ===");
    engine.set_search_text("phone").await;
    tokio::time::sleep(Duration::from_millis(config.debounce_ms + 200)).await;
    let state = engine.snapshot().await;
    for product in state.visible_products().iter().take(5) {
        println!("  #{:<4} {} ({})", product.id, product.title, product.category);
    }

    println!("\n=== Back to a category ===");
    if let Some(first) = engine.snapshot().await.categories.first().cloned() {
        engine.select_category(Some(&first.slug)).await;
        let state = engine.snapshot().await;
        println!("{}: {} products", first.slug, state.visible_products().len());
    }

    Ok(())
}
