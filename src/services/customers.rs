use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use super::{now, required_text, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};
use crate::entities::customer;
use crate::error::{CafeError, CafeResult};

const MAX_EMAIL_LEN: usize = 254;

/// Registers a customer and returns the generated id. Emails are compared
/// case-insensitively, so they are stored lowercased.
pub async fn register(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
    email: &str,
) -> CafeResult<i32> {
    let name = required_text(name, "name", MAX_NAME_LEN)?;
    let phone = required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    let email = required_text(email, "email", MAX_EMAIL_LEN)?.to_lowercase();

    let new_customer = customer::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(email.clone()),
        created_at: Set(now()),
        ..Default::default()
    };

    let customer = new_customer
        .insert(db)
        .await
        .map_err(|err| CafeError::from_registration(err, &email))?;
    info!(customer_id = customer.id, "Registered customer");
    Ok(customer.id)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> CafeResult<Option<customer::Model>> {
    Ok(customer::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_customers(db: &DatabaseConnection) -> CafeResult<Vec<customer::Model>> {
    Ok(customer::Entity::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::test_db;

    #[tokio::test]
    async fn registered_customer_can_be_found() {
        let t = test_db().await;
        let id = register(&t.db, "Asha", "+91 98765 43210", "asha@example.com")
            .await
            .unwrap();

        let customer = find_by_id(&t.db, id).await.unwrap().expect("customer");
        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.phone, "+91 98765 43210");
        assert_eq!(customer.email, "asha@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_once() {
        let t = test_db().await;
        register(&t.db, "Asha", "555-0101", "asha@example.com")
            .await
            .unwrap();

        let second = register(&t.db, "Other Asha", "555-0102", "Asha@Example.com").await;
        assert!(matches!(second, Err(CafeError::DuplicateEmail(_))));
        assert_eq!(list_customers(&t.db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let t = test_db().await;
        let cases = [
            ("", "555", "a@example.com"),
            ("Ravi", " ", "a@example.com"),
            ("Ravi", "555", ""),
        ];
        for (name, phone, email) in cases {
            assert!(matches!(
                register(&t.db, name, phone, email).await,
                Err(CafeError::Validation(_))
            ));
        }
        assert!(list_customers(&t.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_customer_is_absent() {
        let t = test_db().await;
        assert!(find_by_id(&t.db, 12).await.unwrap().is_none());
    }
}
