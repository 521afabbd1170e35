use anyhow::{Context, Result};
use uuid::Uuid;

use super::db::Db;

/// A validated submission from the contact form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub async fn insert_contact_message(db: &Db, msg: &NewContactMessage) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO contact_messages (name, email, subject, message) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .persistent(false)
    .bind(&msg.name)
    .bind(&msg.email)
    .bind(&msg.subject)
    .bind(&msg.message)
    .fetch_one(&db.pool)
    .await
    .context("storing contact message")?;
    Ok(id)
}
