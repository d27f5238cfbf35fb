use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use super::{required_text, MAX_NAME_LEN};
use crate::entities::{menu_item, review};
use crate::error::{CafeError, CafeResult};

/// Shown in place of an average when an item has no reviews yet.
pub const NO_RATING: &str = "No ratings yet";

/// Largest price the `Decimal(10, 2)` menu column holds: 99999999.99,
/// i.e. 9_999_999_999 split into 32-bit words with scale 2.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuListing {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub average_rating: Option<Decimal>,
    pub rating_label: String,
    pub review_count: i64,
}

impl MenuListing {
    fn new(item: menu_item::Model, rating: Option<&RatingAggregate>) -> Self {
        let average_rating = rating.and_then(RatingAggregate::average);
        let rating_label = match average_rating {
            Some(avg) => format!("{avg:.1}"),
            None => NO_RATING.to_owned(),
        };
        MenuListing {
            id: item.id,
            name: item.name,
            category: item.category,
            price: item.price,
            average_rating,
            rating_label,
            review_count: rating.map(|r| r.review_count).unwrap_or(0),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct RatingAggregate {
    item_id: i32,
    rating_sum: i64,
    review_count: i64,
}

impl RatingAggregate {
    /// Mean rating to one decimal place, half away from zero.
    fn average(&self) -> Option<Decimal> {
        if self.review_count == 0 {
            return None;
        }
        let mean = Decimal::from(self.rating_sum) / Decimal::from(self.review_count);
        Some(mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Validated fields of a menu item, shared by create and update.
#[derive(Debug)]
struct ItemFields {
    name: String,
    category: String,
    price: Decimal,
}

impl ItemFields {
    fn validate(name: &str, category: &str, price: Decimal) -> CafeResult<Self> {
        let name = required_text(name, "name", MAX_NAME_LEN)?;
        let category = required_text(category, "category", MAX_NAME_LEN)?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CafeError::Validation(format!(
                "price must not be negative, got {price}"
            )));
        }
        if price > MAX_PRICE {
            return Err(CafeError::Validation(format!(
                "price must be at most {MAX_PRICE}, got {price}"
            )));
        }
        if price.normalize().scale() > 2 {
            return Err(CafeError::Validation(format!(
                "price has more than two decimal places: {price}"
            )));
        }
        Ok(Self {
            name,
            category,
            price,
        })
    }
}

pub async fn list_items(db: &DatabaseConnection, with_ratings: bool) -> CafeResult<Vec<MenuListing>> {
    let items = menu_item::Entity::find()
        .order_by_asc(menu_item::Column::Id)
        .all(db)
        .await?;

    let ratings: HashMap<i32, RatingAggregate> = if with_ratings {
        review::Entity::find()
            .select_only()
            .column_as(review::Column::ItemId, "item_id")
            .column_as(Expr::col(review::Column::Rating).sum(), "rating_sum")
            .column_as(Expr::col(review::Column::Id).count(), "review_count")
            .group_by(review::Column::ItemId)
            .into_model::<RatingAggregate>()
            .all(db)
            .await?
            .into_iter()
            .map(|aggregate| (aggregate.item_id, aggregate))
            .collect()
    } else {
        HashMap::new()
    };

    Ok(items
        .into_iter()
        .map(|item| {
            let rating = ratings.get(&item.id);
            MenuListing::new(item, rating)
        })
        .collect())
}

pub async fn get_item(db: &DatabaseConnection, id: i32) -> CafeResult<menu_item::Model> {
    menu_item::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CafeError::not_found("Menu item", id))
}

pub async fn add_item(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    price: Decimal,
) -> CafeResult<i32> {
    let fields = ItemFields::validate(name, category, price)?;
    let new_item = menu_item::ActiveModel {
        name: Set(fields.name),
        category: Set(fields.category),
        price: Set(fields.price),
        ..Default::default()
    };
    let item = new_item.insert(db).await?;
    info!(item_id = item.id, name = %item.name, "Added menu item");
    Ok(item.id)
}

/// Overwrites name, category and price. Concurrent updates of one item are
/// last-writer-wins.
pub async fn update_item(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
    category: &str,
    price: Decimal,
) -> CafeResult<menu_item::Model> {
    let fields = ItemFields::validate(name, category, price)?;
    let mut item: menu_item::ActiveModel = get_item(db, id).await?.into();
    item.name = Set(fields.name);
    item.category = Set(fields.category);
    item.price = Set(fields.price);
    let item = item
        .update(db)
        .await
        .map_err(|err| CafeError::from_update(err, "Menu item", id))?;
    info!(item_id = item.id, "Updated menu item");
    Ok(item)
}

/// Deleting an unknown id is a no-op. Returns whether a row was removed.
pub async fn remove_item(db: &DatabaseConnection, id: i32) -> CafeResult<bool> {
    let result = menu_item::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected > 0 {
        info!(item_id = id, "Removed menu item");
    }
    Ok(result.rows_affected > 0)
}
