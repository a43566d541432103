//! Catalog listing.

use super::{CommandError, Session};

/// Log every product in the catalog.
pub async fn list(session: &Session) -> Result<(), CommandError> {
    let products = session.cart.client().list_mobiles().await?;

    if products.is_empty() {
        tracing::info!("The catalog is empty");
        return Ok(());
    }

    for product in products.iter() {
        tracing::info!(
            "[{}] {} ({}) {}",
            product.id,
            product.model,
            product.company,
            session.currency.format(product.price.amount())
        );
    }
    tracing::info!("{} phones", products.len());

    Ok(())
}
