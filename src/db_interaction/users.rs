use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{prelude::*, result::DatabaseErrorKind};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{NewUser, User, UserProfileChangeset},
    schema::users,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection},
};

#[derive(Error)]
pub enum UserInsertError{
    #[error("User with email {0} already exists")]
    EmailNotUnique(String),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, password_hash)
)]
pub async fn insert_user(
    mut conn: DbConnection,
    name: String,
    email: String,
    password_hash: String
) -> Result<User, UserInsertError> {
    let new_user = NewUser{
        uuid: Uuid::new_v4(),
        name,
        email: email.clone(),
        password_hash,
        role: "user".to_string()
    };

    let user = spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .map_err(|e| match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserInsertError::EmailNotUnique(email)
        },
        other => UserInsertError::UnexpectedError(anyhow::Error::new(other).context("Failed to insert user"))
    })?;

    Ok(user)
}

#[tracing::instrument("Fetching user by email", skip(conn))]
pub async fn get_user_by_email(mut conn: DbConnection, email: String) -> Result<Option<User>, anyhow::Error> {
    let user = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query user by email")?;

    Ok(user)
}

#[tracing::instrument("Fetching user by id", skip(conn))]
pub async fn get_user_by_id(mut conn: DbConnection, user_id: i32) -> Result<Option<User>, anyhow::Error> {
    let user = spawn_blocking_with_tracing(move || {
        users::table
            .find(user_id)
            .filter(users::is_active.eq(true))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query user by id")?;

    Ok(user)
}

#[tracing::instrument("Updating user profile", skip(conn))]
pub async fn update_user_profile(
    mut conn: DbConnection,
    user_id: i32,
    name: Option<String>,
    phone: Option<String>
) -> Result<Option<User>, anyhow::Error> {
    let changes = UserProfileChangeset{ name, phone, updated_at: Utc::now() };

    let user = spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update user profile")?;

    Ok(user)
}

#[tracing::instrument("Storing user avatar url", skip(conn))]
pub async fn set_user_avatar(mut conn: DbConnection, user_id: i32, avatar_url: String) -> Result<Option<User>, anyhow::Error> {
    let user = spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((users::avatar_url.eq(Some(avatar_url)), users::updated_at.eq(Utc::now())))
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to update user avatar")?;

    Ok(user)
}
