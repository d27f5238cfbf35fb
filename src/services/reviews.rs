use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{catalog, now, MAX_REVIEW_LEN};
use crate::entities::review;
use crate::error::{CafeError, CafeResult};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Records a rating for a menu item. A customer may review the same item
/// any number of times.
pub async fn add_review(
    db: &DatabaseConnection,
    customer_id: i32,
    item_id: i32,
    rating: i32,
    text: &str,
) -> CafeResult<i32> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CafeError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    let text = text.trim();
    if text.chars().count() > MAX_REVIEW_LEN {
        return Err(CafeError::Validation(format!(
            "review is too long (max {MAX_REVIEW_LEN} chars)"
        )));
    }
    catalog::get_item(db, item_id).await?;

    let new_review = review::ActiveModel {
        customer_id: Set(customer_id),
        item_id: Set(item_id),
        rating: Set(rating),
        review: Set(text.to_owned()),
        created_at: Set(now()),
        ..Default::default()
    };
    let review = new_review.insert(db).await?;
    info!(review_id = review.id, item_id, rating, "Added review");
    Ok(review.id)
}

/// Reviews of one item, newest first.
pub async fn list_reviews(db: &DatabaseConnection, item_id: i32) -> CafeResult<Vec<review::Model>> {
    catalog::get_item(db, item_id).await?;
    Ok(review::Entity::find()
        .filter(review::Column::ItemId.eq(item_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await?)
}
