//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    boards, join_parent_requests, organization_admins, organization_users, organizations,
    poll_participants, polls, sessions, users, vote_drafts,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub password_hash: String,
    pub language: String,
    pub superadmin: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub language: &'a str,
    pub superadmin: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the sessions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insertable struct for creating new session records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub(crate) struct NewSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Row struct for reading from the organizations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// Insertable/update struct for organization records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = organizations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct OrganizationUpsert<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub parent_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// Insertable struct for admin role grants.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organization_admins)]
pub(crate) struct NewOrganizationAdminRow {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub granted_at: DateTime<Utc>,
}

/// Row struct for reading from the organization_users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organization_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MembershipRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub joined_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejected_by: Option<Uuid>,
}

/// Insertable struct for fresh membership requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organization_users)]
pub(crate) struct NewMembershipRow<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub status: &'a str,
    pub requested_at: DateTime<Utc>,
}

/// Changeset struct for membership state transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = organization_users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MembershipUpdate<'a> {
    pub status: &'a str,
    pub joined_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<&'a str>,
    pub rejected_by: Option<Uuid>,
}

/// Row struct for reading from the join_parent_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = join_parent_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JoinParentRequestRow {
    pub id: Uuid,
    pub child_org_id: Uuid,
    pub parent_org_id: Uuid,
    pub requested_by: Uuid,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

/// Insertable struct for fresh join-parent requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = join_parent_requests)]
pub(crate) struct NewJoinParentRequestRow<'a> {
    pub id: Uuid,
    pub child_org_id: Uuid,
    pub parent_org_id: Uuid,
    pub requested_by: Uuid,
    pub message: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for join-parent resolution.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = join_parent_requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct JoinParentResolutionUpdate<'a> {
    pub status: &'a str,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub rejection_reason: Option<&'a str>,
}

/// Row struct for reading from the boards table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BoardRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub general: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// Insertable/update struct for board records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = boards)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BoardUpsert<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: &'a str,
    pub general: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// Row struct for reading from the polls table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = polls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PollRow {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub pages: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for poll records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = polls)]
pub(crate) struct NewPollRow<'a> {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: &'a str,
    pub pages: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the poll_participants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = poll_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub weight: i32,
}

/// Row struct for reading from the vote_drafts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vote_drafts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteDraftRow {
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub selections: serde_json::Value,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Insertable/update struct for vote draft records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = vote_drafts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VoteDraftUpsert<'a> {
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub selections: &'a serde_json::Value,
    pub finished_at: Option<DateTime<Utc>>,
}
