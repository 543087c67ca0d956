//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::str::FromStr;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Language, PasswordHash, PhoneNumber, User, UserId};

use super::error_mapping::{map_diesel_error_with_duplicate, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error_with_duplicate(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
        UserPersistenceError::duplicate_phone,
    )
}

/// Convert a database row to a domain user. Stored values were validated on
/// the way in, so a parse failure here means corrupt data.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let phone = PhoneNumber::new(row.phone)
        .map_err(|_| UserPersistenceError::query("corrupt phone number in storage"))?;
    let language = Language::from_str(&row.language).unwrap_or_else(|_| {
        tracing::warn!(
            value = row.language,
            user_id = %row.id,
            "unrecognised language value, defaulting to en"
        );
        Language::default()
    });

    Ok(User::from_parts(
        UserId::from_uuid(row.id),
        row.first_name,
        row.last_name,
        phone,
        PasswordHash::new(row.password_hash),
        language,
        row.superadmin,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::phone.eq(phone.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_user).transpose()
    }

    async fn exists(&self, phone: &PhoneNumber) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserPersistenceError::connection))?;

        let count: i64 = users::table
            .filter(users::phone.eq(phone.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(count > 0)
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, UserPersistenceError::connection))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            phone: user.phone().as_ref(),
            password_hash: user.password_hash().as_str(),
            language: user.language().as_str(),
            superadmin: user.is_superadmin(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::outbound::persistence::pool::PoolError;

    fn sample_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            first_name: "Ada".to_owned(),
            last_name: None,
            phone: "+15551234567".to_owned(),
            password_hash: "argon2id$fixture".to_owned(),
            language: "ru".to_owned(),
            superadmin: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(
            PoolError::checkout("connection refused"),
            UserPersistenceError::connection,
        );
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    fn unique_violations_map_to_duplicate_phone() {
        let err = map_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("users_phone_key".to_owned()),
        ));
        assert!(matches!(err, UserPersistenceError::DuplicatePhone { .. }));
    }

    #[rstest]
    fn row_round_trips_to_a_user() {
        let row = sample_row();
        let user = row_to_user(row.clone()).expect("valid row");
        assert_eq!(user.phone().as_ref(), "+15551234567");
        assert_eq!(user.language(), Language::Ru);
        assert!(user.is_superadmin());
    }

    #[rstest]
    fn corrupt_phone_is_a_query_error() {
        let mut row = sample_row();
        row.phone = "not-a-phone".to_owned();
        let err = row_to_user(row).expect_err("corrupt phone");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn unknown_language_defaults_to_english() {
        let mut row = sample_row();
        row.language = "tlh".to_owned();
        let user = row_to_user(row).expect("valid row");
        assert_eq!(user.language(), Language::En);
    }
}
