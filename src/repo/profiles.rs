use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;
use crate::validators::profile::ValidProfileUpdate;

pub struct NewProfile {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}

pub async fn insert(pool: &PgPool, new: NewProfile) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, email, full_name, password_hash, avatar)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.email)
    .bind(&new.full_name)
    .bind(&new.password_hash)
    .bind(&new.avatar)
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Uniqueness pre-check. `exclude` carries the caller's own id on updates so
/// re-submitting the current email passes.
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM profiles WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)",
    )
    .bind(email)
    .bind(exclude)
    .fetch_optional(pool)
    .await?;
    Ok(existing.is_some())
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &ValidProfileUpdate,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET email = $2, full_name = $3, phone = $4, location = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&update.email)
    .bind(&update.full_name)
    .bind(&update.phone)
    .bind(&update.location)
    .fetch_one(pool)
    .await
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_avatar(pool: &PgPool, id: Uuid, avatar: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET avatar = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(avatar)
        .execute(pool)
        .await?;
    Ok(())
}
