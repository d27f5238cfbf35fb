//! Cart editing, order placement, reorder and order history.
//!
//! Placement and reorder each write one `orders` row plus all of its
//! `order_items` rows inside a single transaction, so a reader never sees an
//! order with only part of its lines.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use super::{catalog, now, MAX_SHORT_TEXT_LEN};
use crate::cart::Cart;
use crate::entities::{menu_item, order, order_item};
use crate::error::{CafeError, CafeResult};

/// Upper bound for a single cart line.
pub const MAX_QUANTITY: u32 = 999;

#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct OrderLineView {
    #[serde(skip)]
    pub order_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderSummary {
    pub id: i32,
    pub customer_id: i32,
    pub date: chrono::NaiveDateTime,
    pub upi_number: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub total: Decimal,
}

/// Sets the quantity of `item_id` in the cart. Zero removes the line without
/// consulting the menu; anything else is priced from the current menu.
pub async fn update_cart(
    db: &DatabaseConnection,
    cart: &mut Cart,
    item_id: i32,
    quantity: u32,
) -> CafeResult<()> {
    if quantity == 0 {
        cart.remove(item_id);
        return Ok(());
    }
    if quantity > MAX_QUANTITY {
        return Err(CafeError::Validation(format!(
            "quantity must be at most {MAX_QUANTITY}, got {quantity}"
        )));
    }
    let item = catalog::get_item(db, item_id).await?;
    cart.set_quantity(&item, quantity);
    Ok(())
}

/// Reprices pending lines from the current menu and drops lines whose item
/// was removed from the menu in the meantime.
pub async fn refresh_cart(db: &DatabaseConnection, cart: &mut Cart) -> CafeResult<()> {
    if cart.is_empty() {
        return Ok(());
    }
    let items = find_menu_items(db, cart.item_ids()).await?;
    for item_id in cart.item_ids() {
        match items.get(&item_id) {
            Some(item) => cart.reprice(item),
            None => {
                warn!(item_id, "Dropping cart line for item no longer on the menu");
                cart.remove(item_id);
            }
        }
    }
    Ok(())
}

/// Commits the cart as a new order for `customer_id` and empties the cart.
/// On any failure nothing is written and the cart is left as it was.
pub async fn place_order(
    db: &DatabaseConnection,
    customer_id: i32,
    cart: &mut Cart,
    upi_number: Option<String>,
) -> CafeResult<i32> {
    if cart.is_empty() {
        return Err(CafeError::EmptyCart);
    }
    let upi_number = normalize_upi(upi_number)?;

    let txn = db.begin().await?;

    // Subtotals are frozen at the prices in force right now.
    let mut priced = cart.clone();
    let items = find_menu_items(&txn, cart.item_ids()).await?;
    for item_id in cart.item_ids() {
        let item = items
            .get(&item_id)
            .ok_or_else(|| CafeError::not_found("Menu item", item_id))?;
        priced.reprice(item);
    }

    let order = insert_order(&txn, customer_id, upi_number).await?;
    let lines = priced
        .lines()
        .iter()
        .map(|line| {
            Ok(order_item::ActiveModel {
                order_id: Set(order.id),
                item_id: Set(line.item_id),
                quantity: Set(to_db_quantity(line.quantity)?),
                total_price: Set(line.subtotal),
                ..Default::default()
            })
        })
        .collect::<CafeResult<Vec<_>>>()?;
    order_item::Entity::insert_many(lines).exec(&txn).await?;
    txn.commit().await?;

    cart.clear();
    info!(
        order_id = order.id,
        customer_id,
        total = %priced.total(),
        "Placed order"
    );
    Ok(order.id)
}

/// Copies the lines of one of the customer's past orders, prices included,
/// into a new order stamped now. Orders of other customers are reported as
/// not found. Without a new UPI reference the original one is reused.
pub async fn reorder(
    db: &DatabaseConnection,
    customer_id: i32,
    order_id: i32,
    upi_number: Option<String>,
) -> CafeResult<i32> {
    let upi_number = normalize_upi(upi_number)?;
    let txn = db.begin().await?;

    let original = order::Entity::find_by_id(order_id)
        .filter(order::Column::CustomerId.eq(customer_id))
        .one(&txn)
        .await?
        .ok_or_else(|| CafeError::not_found("Order", order_id))?;

    let original_lines = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(original.id))
        .order_by_asc(order_item::Column::Id)
        .all(&txn)
        .await?;
    if original_lines.is_empty() {
        return Err(CafeError::Validation(format!(
            "Order {order_id} has no lines left to reorder"
        )));
    }

    let order = insert_order(&txn, customer_id, upi_number.or(original.upi_number)).await?;
    let lines = original_lines.into_iter().map(|line| order_item::ActiveModel {
        order_id: Set(order.id),
        item_id: Set(line.item_id),
        quantity: Set(line.quantity),
        total_price: Set(line.total_price),
        ..Default::default()
    });
    order_item::Entity::insert_many(lines).exec(&txn).await?;
    txn.commit().await?;

    info!(
        order_id = order.id,
        reordered_from = original.id,
        customer_id,
        "Placed reorder"
    );
    Ok(order.id)
}

/// One customer's orders, newest first.
pub async fn order_history(
    db: &DatabaseConnection,
    customer_id: i32,
) -> CafeResult<Vec<OrderSummary>> {
    summarize(
        db,
        order::Entity::find().filter(order::Column::CustomerId.eq(customer_id)),
    )
    .await
}

/// Every order in the store, newest first.
pub async fn list_orders(db: &DatabaseConnection) -> CafeResult<Vec<OrderSummary>> {
    summarize(db, order::Entity::find()).await
}

async fn summarize(
    db: &DatabaseConnection,
    orders: Select<order::Entity>,
) -> CafeResult<Vec<OrderSummary>> {
    let orders = orders
        .order_by_desc(order::Column::Date)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    if orders.is_empty() {
        return Ok(vec![]);
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut lines_by_order: HashMap<i32, Vec<OrderLineView>> = HashMap::new();
    for line in order_item::Entity::find()
        .select_only()
        .column_as(order_item::Column::OrderId, "order_id")
        .column_as(order_item::Column::ItemId, "item_id")
        .column_as(menu_item::Column::Name, "item_name")
        .column_as(order_item::Column::Quantity, "quantity")
        .column_as(order_item::Column::TotalPrice, "total_price")
        .join(JoinType::InnerJoin, order_item::Relation::MenuItem.def())
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::Id)
        .into_model::<OrderLineView>()
        .all(db)
        .await?
    {
        lines_by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let lines = lines_by_order.remove(&order.id).unwrap_or_default();
            let total = lines.iter().map(|l| l.total_price).sum();
            OrderSummary {
                id: order.id,
                customer_id: order.customer_id,
                date: order.date,
                upi_number: order.upi_number,
                lines,
                total,
            }
        })
        .collect())
}

async fn find_menu_items<C>(db: &C, ids: Vec<i32>) -> CafeResult<HashMap<i32, menu_item::Model>>
where
    C: sea_orm::ConnectionTrait,
{
    Ok(menu_item::Entity::find()
        .filter(menu_item::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect())
}

async fn insert_order(
    txn: &DatabaseTransaction,
    customer_id: i32,
    upi_number: Option<String>,
) -> CafeResult<order::Model> {
    let new_order = order::ActiveModel {
        customer_id: Set(customer_id),
        date: Set(now()),
        upi_number: Set(upi_number),
        ..Default::default()
    };
    Ok(new_order.insert(txn).await?)
}

/// Blank references are stored as absent. The value is kept verbatim
/// otherwise; nothing is checked against a payment provider.
fn normalize_upi(upi_number: Option<String>) -> CafeResult<Option<String>> {
    match upi_number.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.chars().count() > MAX_SHORT_TEXT_LEN => Err(CafeError::Validation(
            format!("upi_number is too long (max {MAX_SHORT_TEXT_LEN} chars)"),
        )),
        Some(value) => Ok(Some(value.to_owned())),
    }
}

fn to_db_quantity(quantity: u32) -> CafeResult<i32> {
    i32::try_from(quantity)
        .map_err(|_| CafeError::Validation(format!("quantity {quantity} is out of range")))
}
