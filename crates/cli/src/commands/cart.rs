//! Cart commands.
//!
//! Each command re-reads the cart first so product lookups see the API's
//! current quantities, then logs the cart the API sent back.

use mobile_store_core::CartAction;
use mobile_store_storefront::store::NOTICE_MESSAGE;

use super::{CommandError, Session};

/// Log the cart lines and total.
fn log_cart(session: &Session) {
    let cart = session.cart.store().snapshot().cart;

    if cart.is_empty() {
        tracing::info!("Cart is empty");
    }
    for line in cart.lines() {
        tracing::info!(
            "[{}] {} x{} @ {} = {}",
            line.id,
            line.model,
            line.qty,
            session.currency.format(line.price.amount()),
            session.currency.format(line.subtotal())
        );
    }
    tracing::info!(
        "Total: {} ({} items)",
        session.currency.format(cart.total()),
        cart.item_count()
    );
}

/// Show the cart.
pub async fn show(session: &Session) -> Result<(), CommandError> {
    session.cart.refresh().await?;
    log_cart(session);
    Ok(())
}

/// Add one unit of `id`.
pub async fn add(session: &Session, id: &str) -> Result<(), CommandError> {
    change(session, id, CartAction::Increment).await
}

/// Remove one unit of `id`.
pub async fn remove(session: &Session, id: &str) -> Result<(), CommandError> {
    change(session, id, CartAction::Decrement).await
}

async fn change(session: &Session, id: &str, action: CartAction) -> Result<(), CommandError> {
    session.cart.refresh().await?;

    let product = session
        .cart
        .resolve_product(id)
        .await?
        .ok_or_else(|| CommandError::ProductNotFound(id.to_owned()))?;

    tracing::info!("{action}: {}", product.model);
    session.cart.update(&product, action).await?;
    log_cart(session);
    Ok(())
}

/// Submit the cart.
pub async fn checkout(session: &Session) -> Result<(), CommandError> {
    session.cart.refresh().await?;
    log_cart(session);

    session.cart.checkout().await?;
    tracing::info!("{NOTICE_MESSAGE}");
    Ok(())
}
