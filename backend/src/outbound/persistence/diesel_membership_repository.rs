//! PostgreSQL-backed `MembershipRepository` implementation using Diesel.
//!
//! Membership rows are append-then-transition: a fresh request inserts a new
//! row, rejected rows stay behind as history, and a partial unique index keeps
//! at most one pending row per `(organization, user)` pair.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{Membership, MembershipStatus, OrganizationId, UserId};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_duplicate, map_pool_error};
use super::models::{MembershipRow, MembershipUpdate, NewMembershipRow};
use super::pool::DbPool;
use super::schema::organization_users;

/// Diesel-backed implementation of the `MembershipRepository` port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> MembershipRepositoryError {
    map_diesel_error(
        error,
        MembershipRepositoryError::query,
        MembershipRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error) -> MembershipRepositoryError {
    map_diesel_error_with_duplicate(
        error,
        MembershipRepositoryError::query,
        MembershipRepositoryError::connection,
        MembershipRepositoryError::duplicate_pending,
    )
}

fn row_to_membership(row: MembershipRow) -> Result<Membership, MembershipRepositoryError> {
    let status = MembershipStatus::from_str(&row.status)
        .map_err(|e| MembershipRepositoryError::query(e.to_string()))?;
    Ok(Membership::from_parts(
        OrganizationId::from_uuid(row.organization_id),
        UserId::from_uuid(row.user_id),
        status,
        row.requested_at,
        row.joined_at,
        row.rejected_at,
        row.rejection_reason,
        row.rejected_by.map(UserId::from_uuid),
    ))
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn find(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MembershipRepositoryError::connection))?;

        let row: Option<MembershipRow> = organization_users::table
            .filter(organization_users::organization_id.eq(org_id.as_uuid()))
            .filter(organization_users::user_id.eq(user_id.as_uuid()))
            .order(organization_users::requested_at.desc())
            .select(MembershipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_membership).transpose()
    }

    async fn insert(&self, membership: &Membership) -> Result<(), MembershipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MembershipRepositoryError::connection))?;

        let row = NewMembershipRow {
            id: Uuid::new_v4(),
            organization_id: *membership.organization_id().as_uuid(),
            user_id: *membership.user_id().as_uuid(),
            status: membership.status().as_str(),
            requested_at: membership.requested_at(),
        };

        diesel::insert_into(organization_users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn update(&self, membership: &Membership) -> Result<(), MembershipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MembershipRepositoryError::connection))?;

        let changes = MembershipUpdate {
            status: membership.status().as_str(),
            joined_at: membership.joined_at(),
            rejected_at: membership.rejected_at(),
            rejection_reason: membership.rejection_reason(),
            rejected_by: membership.rejected_by().map(|id| *id.as_uuid()),
        };

        // Transitions only ever apply to the pending row of the pair; settled
        // rows are immutable history.
        let updated = diesel::update(
            organization_users::table
                .filter(
                    organization_users::organization_id.eq(membership.organization_id().as_uuid()),
                )
                .filter(organization_users::user_id.eq(membership.user_id().as_uuid()))
                .filter(organization_users::status.eq(MembershipStatus::Pending.as_str())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_error)?;

        if updated == 0 {
            return Err(MembershipRepositoryError::query(
                "no pending membership row to update",
            ));
        }
        Ok(())
    }

    async fn pending_for_organizations(
        &self,
        org_ids: &[OrganizationId],
    ) -> Result<Vec<Membership>, MembershipRepositoryError> {
        if org_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MembershipRepositoryError::connection))?;

        let uuids: Vec<Uuid> = org_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<MembershipRow> = organization_users::table
            .filter(organization_users::organization_id.eq_any(&uuids))
            .filter(organization_users::status.eq(MembershipStatus::Pending.as_str()))
            .order(organization_users::requested_at.asc())
            .select(MembershipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        rows.into_iter().map(row_to_membership).collect()
    }
}
