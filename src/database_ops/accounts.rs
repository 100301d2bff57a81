use crate::accounts::{NewEnquiry, UserRecord};
use crate::database_ops::db::Db;
use crate::store::AccountStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use tracing::instrument;

#[async_trait]
impl AccountStore for Db {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT user_id, full_name, email, COALESCE(phone, '') AS phone, password_hash
             FROM users WHERE email = $1",
        )
        .persistent(false)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<UserRecord> {
            Ok(UserRecord {
                user_id: r.try_get("user_id")?,
                full_name: r.try_get("full_name")?,
                email: r.try_get("email")?,
                phone: r.try_get("phone")?,
                password_hash: r.try_get("password_hash")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    async fn insert_user(&self, user: &UserRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (user_id, full_name, email, phone, password_hash)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .persistent(false)
        .bind(&user.user_id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self, enquiry))]
    async fn insert_enquiry(&self, enquiry: &NewEnquiry) -> Result<()> {
        sqlx::query(
            "INSERT INTO enquiries (name, email, phone, message, product_id, product_name, product_category)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .persistent(false)
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.message)
        .bind(&enquiry.product_id)
        .bind(&enquiry.product_name)
        .bind(&enquiry.product_category)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
