//! # Order Repository
//!
//! Orders, their line items and return requests.
//!
//! ## Placing an Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(&OrderDraft)                                                    │
//! │                                                                         │
//! │  for number in draft.order_number_candidates():                        │
//! │      BEGIN                                                              │
//! │        INSERT orders (order_number = number) ── UNIQUE clash? ──┐       │
//! │        INSERT order_items × n                                   │       │
//! │      COMMIT ──► Order                                    ROLLBACK,      │
//! │                                                          next number    │
//! │                                                                         │
//! │  All candidates taken ──► DbError::UniqueViolation                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Header and items land together or not at all.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use furnish_core::cart::CartItem;
use furnish_core::checkout::OrderDraft;
use furnish_core::orders::{ReturnRequest, ValidatedReturn};
use furnish_core::{Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, order_number, status, payment_method, payment_status, \
     customer_name, customer_email, customer_phone, shipping_address, \
     subtotal_minor, shipping_minor, tax_minor, total_minor, tracking_number, \
     created_at, estimated_delivery";

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a draft as a new `processing` order.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] if every candidate order number is taken.
    pub async fn create(&self, draft: &OrderDraft) -> DbResult<Order> {
        for order_number in draft.order_number_candidates() {
            let order = order_from_draft(draft, order_number);

            let mut tx = self.begin().await?;
            match insert_order(&mut tx, &order).await {
                Ok(()) => {}
                Err(err) if err.is_unique_violation() => {
                    warn!(order_number = %order.order_number, "Order number taken, retrying");
                    tx.rollback()
                        .await
                        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                    continue;
                }
                Err(err) => return Err(err),
            }

            for (position, item) in draft.items.iter().enumerate() {
                insert_item(&mut tx, &item_from_cart(&order.id, item), position as i64).await?;
            }

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            info!(
                order_number = %order.order_number,
                total = order.total_minor,
                items = draft.items.len(),
                "Order placed"
            );
            return Ok(order);
        }

        Err(DbError::duplicate("orders.order_number", "all candidates"))
    }

    /// Inserts a fully-formed order with its items, keeping the given
    /// number and status. Used by the seed data.
    pub async fn insert(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(order_number = %order.order_number, "Inserting order");

        let mut tx = self.begin().await?;
        insert_order(&mut tx, order).await?;
        for (position, item) in items.iter().enumerate() {
            insert_item(&mut tx, item, position as i64).await?;
        }
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_number = ?1",
            ORDER_COLUMNS
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Most recent first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC, order_number DESC LIMIT ?1",
            ORDER_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Line items in the order they were in the cart.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, name_snapshot, image_url,
                   unit_price_minor, quantity, line_total_minor
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn update_status(
        &self,
        order_number: &str,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2, tracking_number = COALESCE(?3, tracking_number)
            WHERE order_number = ?1
            "#,
        )
        .bind(order_number)
        .bind(status)
        .bind(tracking_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_number));
        }

        Ok(())
    }

    /// Records a return/replacement request against an order.
    pub async fn create_return(&self, order_id: &str, request: &ValidatedReturn) -> DbResult<ReturnRequest> {
        let record = ReturnRequest {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            kind: request.kind,
            reason: request.reason.clone(),
            description: request.description.clone(),
            contact_name: request.contact_name.clone(),
            contact_email: request.contact_email.clone(),
            contact_phone: request.contact_phone.clone(),
            created_at: Utc::now(),
        };

        debug!(order_id = %order_id, kind = ?record.kind, "Recording return request");

        sqlx::query(
            r#"
            INSERT INTO return_requests (
                id, order_id, kind, reason, description,
                contact_name, contact_email, contact_phone, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.order_id)
        .bind(record.kind)
        .bind(&record.reason)
        .bind(&record.description)
        .bind(&record.contact_name)
        .bind(&record.contact_email)
        .bind(&record.contact_phone)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn returns_for(&self, order_id: &str) -> DbResult<Vec<ReturnRequest>> {
        let requests = sqlx::query_as::<_, ReturnRequest>(
            r#"
            SELECT id, order_id, kind, reason, description,
                   contact_name, contact_email, contact_phone, created_at
            FROM return_requests
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

fn order_from_draft(draft: &OrderDraft, order_number: String) -> Order {
    let method = draft.checkout.payment_method;
    Order {
        id: Uuid::new_v4().to_string(),
        order_number,
        status: OrderStatus::Processing,
        payment_method: method,
        payment_status: method.initial_status(),
        customer_name: draft.checkout.customer_name.clone(),
        customer_email: draft.checkout.email.clone(),
        customer_phone: draft.checkout.phone.clone(),
        shipping_address: draft.checkout.shipping_address.clone(),
        subtotal_minor: draft.breakdown.subtotal.minor(),
        shipping_minor: draft.breakdown.shipping.minor(),
        tax_minor: draft.breakdown.tax.minor(),
        total_minor: draft.breakdown.total.minor(),
        tracking_number: None,
        created_at: draft.placed_at,
        estimated_delivery: Some(draft.estimated_delivery),
    }
}

fn item_from_cart(order_id: &str, item: &CartItem) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        product_id: item.id.clone(),
        name_snapshot: item.name.clone(),
        image_url: item.image_url.clone(),
        unit_price_minor: item.price.minor(),
        quantity: item.quantity,
        line_total_minor: item.line_total().minor(),
    }
}

async fn insert_order(tx: &mut Transaction<'static, Sqlite>, order: &Order) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, status, payment_method, payment_status,
            customer_name, customer_email, customer_phone, shipping_address,
            subtotal_minor, shipping_minor, tax_minor, total_minor,
            tracking_number, created_at, estimated_delivery
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8, ?9,
            ?10, ?11, ?12, ?13,
            ?14, ?15, ?16
        )
        "#,
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(order.status)
    .bind(order.payment_method)
    .bind(order.payment_status)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.shipping_address)
    .bind(order.subtotal_minor)
    .bind(order.shipping_minor)
    .bind(order.tax_minor)
    .bind(order.total_minor)
    .bind(&order.tracking_number)
    .bind(order.created_at)
    .bind(order.estimated_delivery)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_item(
    tx: &mut Transaction<'static, Sqlite>,
    item: &OrderItem,
    position: i64,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, product_id, name_snapshot, image_url,
            unit_price_minor, quantity, line_total_minor, position
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.product_id)
    .bind(&item.name_snapshot)
    .bind(&item.image_url)
    .bind(item.unit_price_minor)
    .bind(item.quantity)
    .bind(item.line_total_minor)
    .bind(position)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
