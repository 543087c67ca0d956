//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Nullable<Varchar>,
        /// E.164 phone number, unique.
        phone -> Varchar,
        password_hash -> Varchar,
        language -> Varchar,
        superadmin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-side login sessions; the cookie carries only the id.
    sessions (id) {
        id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Organization nodes of the governance tree.
    organizations (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        parent_id -> Nullable<Uuid>,
        created_by -> Uuid,
        created_at -> Timestamptz,
        archived_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Admin role grants, one row per (organization, user).
    organization_admins (organization_id, user_id) {
        organization_id -> Uuid,
        user_id -> Uuid,
        granted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership request rows. Rejected rows stay behind as history; a
    /// partial unique index allows at most one pending row per pair.
    organization_users (id) {
        id -> Uuid,
        organization_id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        requested_at -> Timestamptz,
        joined_at -> Nullable<Timestamptz>,
        rejected_at -> Nullable<Timestamptz>,
        rejection_reason -> Nullable<Text>,
        rejected_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Organization-to-organization join requests; a partial unique index
    /// allows at most one pending row per child.
    join_parent_requests (id) {
        id -> Uuid,
        child_org_id -> Uuid,
        parent_org_id -> Uuid,
        requested_by -> Uuid,
        message -> Nullable<Text>,
        status -> Varchar,
        created_at -> Timestamptz,
        resolved_at -> Nullable<Timestamptz>,
        resolved_by -> Nullable<Uuid>,
        rejection_reason -> Nullable<Text>,
    }
}

diesel::table! {
    /// Boards owned by an organization.
    boards (id) {
        id -> Uuid,
        organization_id -> Uuid,
        name -> Varchar,
        general -> Bool,
        created_by -> Uuid,
        created_at -> Timestamptz,
        archived_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Polls with their page/question/answer structure stored as JSONB.
    polls (id) {
        id -> Uuid,
        board_id -> Uuid,
        title -> Varchar,
        pages -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Poll enrolment with the participant's voting weight.
    poll_participants (poll_id, user_id) {
        poll_id -> Uuid,
        user_id -> Uuid,
        weight -> Int4,
    }
}

diesel::table! {
    /// Per-user vote drafts with selections stored as JSONB.
    vote_drafts (poll_id, user_id) {
        poll_id -> Uuid,
        user_id -> Uuid,
        selections -> Jsonb,
        finished_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(sessions -> users (user_id));
diesel::joinable!(boards -> organizations (organization_id));
diesel::joinable!(polls -> boards (board_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    sessions,
    organizations,
    organization_admins,
    organization_users,
    join_parent_requests,
    boards,
    polls,
    poll_participants,
    vote_drafts,
);
