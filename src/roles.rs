use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Public,
    Politician,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "party")]
pub enum Party {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CastVote,
    PublishPromise,
    ManageElection,
    ApprovePolitician,
}

impl Role {
    pub fn allows(&self, cap: Capability) -> bool {
        match self {
            Role::Public => matches!(cap, Capability::CastVote),
            Role::Politician => matches!(cap, Capability::CastVote | Capability::PublishPromise),
            Role::Admin => matches!(cap, Capability::ManageElection | Capability::ApprovePolitician),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_voting_capability() {
        assert!(Role::Public.allows(Capability::CastVote));
        assert!(Role::Politician.allows(Capability::CastVote));
        assert!(!Role::Admin.allows(Capability::CastVote));
    }

    #[test]
    fn test_promise_capability() {
        assert!(Role::Politician.allows(Capability::PublishPromise));
        assert!(!Role::Public.allows(Capability::PublishPromise));
        assert!(!Role::Admin.allows(Capability::PublishPromise));
    }

    #[test]
    fn test_admin_capabilities() {
        assert!(Role::Admin.allows(Capability::ManageElection));
        assert!(Role::Admin.allows(Capability::ApprovePolitician));
        assert!(!Role::Public.allows(Capability::ManageElection));
        assert!(!Role::Politician.allows(Capability::ApprovePolitician));
    }
}
