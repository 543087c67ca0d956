//! Typed identifiers for domain aggregates.
//!
//! Every aggregate gets a UUID-backed newtype so a board id can never be
//! passed where an organization id is expected. Serde serialises ids as plain
//! UUID strings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Construct from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id! {
    /// Stable user identifier.
    UserId
}

define_id! {
    /// Identifier of an organization node in the governance tree.
    OrganizationId
}

define_id! {
    /// Identifier of a board within an organization.
    BoardId
}

define_id! {
    /// Identifier of a poll owned by a board.
    PollId
}

define_id! {
    /// Identifier of a question within a poll.
    QuestionId
}

define_id! {
    /// Identifier of an answer option within a question.
    AnswerId
}

define_id! {
    /// Opaque server-side session identifier.
    SessionId
}

define_id! {
    /// Identifier of an organization-to-organization join request.
    JoinParentRequestId
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn ids_render_as_plain_uuids() {
        let id = UserId::from_uuid(Uuid::nil());
        assert_eq!(id.to_string(), Uuid::nil().to_string());
    }

    #[test]
    fn ids_round_trip_through_serde() {
        let id = OrganizationId::random();
        let json = serde_json::to_string(&id).expect("serialize");
        let back: OrganizationId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("not-a-uuid".parse::<BoardId>().is_err());
    }
}
