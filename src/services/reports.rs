//! Sales aggregation over placed order lines.
//!
//! Rows are fetched once and summed here with `Decimal`, so many small line
//! totals add up without floating point drift. Buckets are keyed by the
//! parent order's local timestamp.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QuerySelect,
    RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::entities::{customer, menu_item, order, order_item};
use crate::error::CafeResult;

const TOP_ITEMS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Granularity {
    Day,
    Month,
}

impl Granularity {
    fn bucket(self, date: &NaiveDateTime) -> String {
        match self {
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
            Granularity::Month => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalesBucket {
    pub bucket: String,
    pub total_sales: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopItem {
    pub item_id: i32,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub customers: u64,
    pub menu_items: u64,
    pub orders: u64,
    pub total_revenue: Decimal,
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, FromQueryResult)]
struct SaleRow {
    date: NaiveDateTime,
    total_price: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct ItemSaleRow {
    item_id: i32,
    name: String,
    quantity: i32,
    total_price: Decimal,
}

pub async fn daily_sales(db: &DatabaseConnection, order: SortOrder) -> CafeResult<Vec<SalesBucket>> {
    sales_by(db, Granularity::Day, order).await
}

pub async fn monthly_sales(
    db: &DatabaseConnection,
    order: SortOrder,
) -> CafeResult<Vec<SalesBucket>> {
    sales_by(db, Granularity::Month, order).await
}

async fn sales_by(
    db: &DatabaseConnection,
    granularity: Granularity,
    order: SortOrder,
) -> CafeResult<Vec<SalesBucket>> {
    let rows = order_item::Entity::find()
        .select_only()
        .column_as(order::Column::Date, "date")
        .column_as(order_item::Column::TotalPrice, "total_price")
        .join(JoinType::InnerJoin, order_item::Relation::Order.def())
        .into_model::<SaleRow>()
        .all(db)
        .await?;

    Ok(aggregate(
        rows.iter().map(|row| (row.date, row.total_price)),
        granularity,
        order,
    ))
}

fn aggregate<I>(rows: I, granularity: Granularity, order: SortOrder) -> Vec<SalesBucket>
where
    I: IntoIterator<Item = (NaiveDateTime, Decimal)>,
{
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for (date, amount) in rows {
        *buckets.entry(granularity.bucket(&date)).or_default() += amount.round_dp(2);
    }

    let series = buckets
        .into_iter()
        .map(|(bucket, total_sales)| SalesBucket {
            bucket,
            total_sales,
        });
    match order {
        SortOrder::Asc => series.collect(),
        SortOrder::Desc => series.rev().collect(),
    }
}

pub async fn dashboard(db: &DatabaseConnection) -> CafeResult<DashboardSummary> {
    let rows = order_item::Entity::find()
        .select_only()
        .column_as(order_item::Column::ItemId, "item_id")
        .column_as(menu_item::Column::Name, "name")
        .column_as(order_item::Column::Quantity, "quantity")
        .column_as(order_item::Column::TotalPrice, "total_price")
        .join(JoinType::InnerJoin, order_item::Relation::MenuItem.def())
        .into_model::<ItemSaleRow>()
        .all(db)
        .await?;

    let total_revenue = rows.iter().map(|r| r.total_price.round_dp(2)).sum();

    Ok(DashboardSummary {
        customers: customer::Entity::find().count(db).await?,
        menu_items: menu_item::Entity::find().count(db).await?,
        orders: order::Entity::find().count(db).await?,
        total_revenue,
        top_items: top_items(rows),
    })
}

/// Best sellers by quantity, ties broken by revenue and then item id.
fn top_items(rows: Vec<ItemSaleRow>) -> Vec<TopItem> {
    let mut by_item: HashMap<i32, TopItem> = HashMap::new();
    for row in rows {
        let entry = by_item.entry(row.item_id).or_insert_with(|| TopItem {
            item_id: row.item_id,
            name: row.name.clone(),
            quantity_sold: 0,
            revenue: Decimal::ZERO,
        });
        entry.quantity_sold += i64::from(row.quantity);
        entry.revenue += row.total_price.round_dp(2);
    }

    let mut items: Vec<TopItem> = by_item.into_values().collect();
    items.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.item_id.cmp(&b.item_id))
    });
    items.truncate(TOP_ITEMS);
    items
}
