pub mod customer;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod review;

use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, TableCreateStatement},
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{
    customer::Entity as Customer, menu_item::Entity as MenuItem, order::Entity as Order,
    order_item::Entity as OrderItem, review::Entity as Review,
};

/// Creates every table that is missing. Safe to run on each start-up.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_review_table = schema.create_table_from_entity(Review);
    create_review_table.check(Expr::col(review::Column::Rating).between(1, 5));

    let mut statements: Vec<TableCreateStatement> = vec![
        schema.create_table_from_entity(Customer),
        schema.create_table_from_entity(MenuItem),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
        create_review_table,
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }
    Ok(())
}

/// Fills an empty menu with a few starter items. Does nothing when the menu
/// already has rows.
pub async fn seed_menu(db: &DatabaseConnection) -> Result<(), DbErr> {
    if MenuItem::find().count(db).await? > 0 {
        return Ok(());
    }

    let starters = [
        ("Espresso", "Coffee", Decimal::new(250, 2)),
        ("Cappuccino", "Coffee", Decimal::new(350, 2)),
        ("Masala Chai", "Tea", Decimal::new(200, 2)),
        ("Croissant", "Bakery", Decimal::new(300, 2)),
        ("Club Sandwich", "Food", Decimal::new(650, 2)),
    ];
    let items = starters.map(|(name, category, price)| menu_item::ActiveModel {
        name: Set(name.to_owned()),
        category: Set(category.to_owned()),
        price: Set(price),
        ..Default::default()
    });

    let txn = db.begin().await?;
    MenuItem::insert_many(items).exec(&txn).await?;
    txn.commit().await?;
    info!(count = starters.len(), "Seeded starter menu");
    Ok(())
}
