//! PostgreSQL-backed `JoinParentRequestRepository` implementation using Diesel.
//!
//! Acceptance is the one cross-table write in the governance schema: the
//! request row and the child organization's `parent_id` must settle together,
//! so it runs inside a transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use std::str::FromStr;

use crate::domain::ports::{JoinParentRepositoryError, JoinParentRequestRepository};
use crate::domain::{JoinParentRequest, JoinParentRequestId, JoinParentStatus, OrganizationId, UserId};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_duplicate, map_pool_error};
use super::models::{JoinParentRequestRow, JoinParentResolutionUpdate, NewJoinParentRequestRow};
use super::pool::DbPool;
use super::schema::{join_parent_requests, organizations};

/// Diesel-backed implementation of the `JoinParentRequestRepository` port.
#[derive(Clone)]
pub struct DieselJoinParentRepository {
    pool: DbPool,
}

impl DieselJoinParentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> JoinParentRepositoryError {
    map_diesel_error(
        error,
        JoinParentRepositoryError::query,
        JoinParentRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error) -> JoinParentRepositoryError {
    map_diesel_error_with_duplicate(
        error,
        JoinParentRepositoryError::query,
        JoinParentRepositoryError::connection,
        JoinParentRepositoryError::duplicate_pending,
    )
}

fn row_to_request(row: JoinParentRequestRow) -> Result<JoinParentRequest, JoinParentRepositoryError> {
    let status = JoinParentStatus::from_str(&row.status)
        .map_err(|e| JoinParentRepositoryError::query(e.to_string()))?;
    Ok(JoinParentRequest::from_parts(
        JoinParentRequestId::from_uuid(row.id),
        OrganizationId::from_uuid(row.child_org_id),
        OrganizationId::from_uuid(row.parent_org_id),
        UserId::from_uuid(row.requested_by),
        row.message,
        status,
        row.created_at,
        row.resolved_at,
        row.resolved_by.map(UserId::from_uuid),
        row.rejection_reason,
    ))
}

fn resolution_update(request: &JoinParentRequest) -> JoinParentResolutionUpdate<'_> {
    JoinParentResolutionUpdate {
        status: request.status().as_str(),
        resolved_at: request.resolved_at(),
        resolved_by: request.resolved_by().map(|id| *id.as_uuid()),
        rejection_reason: request.rejection_reason(),
    }
}

#[async_trait]
impl JoinParentRequestRepository for DieselJoinParentRepository {
    async fn find_by_id(
        &self,
        id: &JoinParentRequestId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        let row: Option<JoinParentRequestRow> = join_parent_requests::table
            .filter(join_parent_requests::id.eq(id.as_uuid()))
            .select(JoinParentRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_request).transpose()
    }

    async fn pending_for_child(
        &self,
        child: &OrganizationId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        let row: Option<JoinParentRequestRow> = join_parent_requests::table
            .filter(join_parent_requests::child_org_id.eq(child.as_uuid()))
            .filter(join_parent_requests::status.eq(JoinParentStatus::Pending.as_str()))
            .select(JoinParentRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_request).transpose()
    }

    async fn incoming_pending(
        &self,
        parent: &OrganizationId,
    ) -> Result<Vec<JoinParentRequest>, JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        let rows: Vec<JoinParentRequestRow> = join_parent_requests::table
            .filter(join_parent_requests::parent_org_id.eq(parent.as_uuid()))
            .filter(join_parent_requests::status.eq(JoinParentStatus::Pending.as_str()))
            .order(join_parent_requests::created_at.asc())
            .select(JoinParentRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        rows.into_iter().map(row_to_request).collect()
    }

    async fn insert(
        &self,
        request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        let row = NewJoinParentRequestRow {
            id: *request.id().as_uuid(),
            child_org_id: *request.child_org_id().as_uuid(),
            parent_org_id: *request.parent_org_id().as_uuid(),
            requested_by: *request.requested_by().as_uuid(),
            message: request.message(),
            status: request.status().as_str(),
            created_at: request.created_at(),
        };

        diesel::insert_into(join_parent_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn accept(
        &self,
        request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        let request_id = *request.id().as_uuid();
        let child_id = *request.child_org_id().as_uuid();
        let parent_id = *request.parent_org_id().as_uuid();
        let changes = resolution_update(request);

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::update(
                    join_parent_requests::table.filter(join_parent_requests::id.eq(request_id)),
                )
                .set(&changes)
                .execute(conn)
                .await?;

                diesel::update(organizations::table.filter(organizations::id.eq(child_id)))
                    .set(organizations::parent_id.eq(Some(parent_id)))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_error)
    }

    async fn reject(
        &self,
        request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        diesel::update(
            join_parent_requests::table.filter(join_parent_requests::id.eq(request.id().as_uuid())),
        )
        .set(&resolution_update(request))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_error)
    }

    async fn delete(&self, id: &JoinParentRequestId) -> Result<(), JoinParentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, JoinParentRepositoryError::connection))?;

        diesel::delete(
            join_parent_requests::table.filter(join_parent_requests::id.eq(id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_error)
    }
}
