//! Marketplace order routes.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use grow_smart_core::{ListingId, OrderId, OrderStatus};

use crate::db::listings::ListingRepository;
use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::mailer::OrderNote;
use crate::state::AppState;

/// Request to place an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub listing_id: ListingId,
    pub quantity_kg: Decimal,
}

/// Place an order against a listing.
///
/// POST /api/orders
///
/// Stock reservation and order creation commit as one transaction, so two
/// buyers cannot both take the last of the stock and a failed insert
/// leaves the stock untouched. The seller is notified by email; if that
/// email fails the order still stands and the failure is only logged.
///
/// # Errors
///
/// Returns 404 for an unknown listing, 409 if the listing is inactive or
/// short on stock, 400 for buying from yourself or a non-positive quantity.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<Order>> {
    if req.quantity_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "quantity_kg must be positive".to_owned(),
        ));
    }

    let listing = ListingRepository::new(state.pool())
        .get(req.listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("listing {}", req.listing_id)))?;

    if listing.seller_id == current.id {
        return Err(AppError::BadRequest(
            "you cannot order from your own listing".to_owned(),
        ));
    }

    // Conditional UPDATE inside the transaction; loses cleanly against a
    // concurrent order
    let (order, listing) = OrderRepository::new(state.pool())
        .place(req.listing_id, current.id, req.quantity_kg)
        .await?;

    tracing::info!(
        order_id = %order.id,
        listing_id = %listing.id,
        buyer_id = %current.id,
        "Order placed"
    );

    // Seller notification is best effort: the order already exists
    notify_seller(&state, &order, &listing.crop_name).await;

    Ok(Json(order))
}

/// Email the seller about a new order. Failures are logged, never returned.
async fn notify_seller(state: &AppState, order: &Order, crop_name: &str) {
    let seller = match UserRepository::new(state.pool()).get_by_id(order.seller_id).await {
        Ok(Some(seller)) => seller,
        Ok(None) => {
            tracing::warn!(order_id = %order.id, "Seller account missing, notification skipped");
            return;
        }
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "Could not load seller for notification");
            return;
        }
    };

    let buyer_email = match UserRepository::new(state.pool()).get_by_id(order.buyer_id).await {
        Ok(Some(buyer)) => buyer.email.as_str().to_owned(),
        _ => String::new(),
    };

    let reference = order.reference.to_string();
    let quantity_kg = order.quantity_kg.to_string();
    let total_price = order.total_price.to_string();
    let note = OrderNote {
        reference: &reference,
        crop_name,
        quantity_kg: &quantity_kg,
        total_price: &total_price,
        buyer_email: &buyer_email,
    };

    if let Err(e) = state.mailer().send_order_notification(&seller.email, &note).await {
        tracing::warn!(
            order_id = %order.id,
            error = %e,
            "Seller notification email failed"
        );
    }
}

/// All orders the logged-in user is a party to, newest first.
///
/// GET /api/orders
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;

    Ok(Json(orders))
}

/// Request to move an order to a new status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Move an order through its lifecycle.
///
/// POST /api/orders/{id}/status
///
/// The seller accepts, rejects, or completes; the buyer may cancel while
/// the order is still pending.
///
/// # Errors
///
/// Returns 404 for an order the user is not a party to, 403 if the wrong
/// party asks, 409 for an illegal transition or a concurrent change.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let orders = OrderRepository::new(state.pool());

    let order = orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    // Non-parties see the same response as for an unknown order
    if order.buyer_id != current.id && order.seller_id != current.id {
        return Err(AppError::NotFound(format!("order {id}")));
    }

    if !order.status.can_transition_to(req.status) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {} to {}",
            order.status, req.status
        )));
    }

    let allowed = match req.status {
        OrderStatus::Accepted | OrderStatus::Rejected | OrderStatus::Completed => {
            order.seller_id == current.id
        }
        OrderStatus::Cancelled => order.buyer_id == current.id,
        OrderStatus::Pending => false,
    };
    if !allowed {
        return Err(AppError::Forbidden(
            "you are not allowed to make this status change".to_owned(),
        ));
    }

    let updated = orders.update_status(id, order.status, req.status).await?;

    tracing::info!(
        order_id = %id,
        from = %order.status,
        to = %req.status,
        "Order status changed"
    );

    Ok(Json(updated))
}
