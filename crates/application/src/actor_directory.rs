//! Bearer session resolution into request-scoped actors.
//!
//! Session tokens are stored as SHA-256 hashes; the raw token never reaches storage.

use std::sync::Arc;

use async_trait::async_trait;

use assetdesk_core::{AppError, AppResult, UserIdentity};
use assetdesk_domain::{Actor, UserId};

use crate::security_admin_ports::UserAccessRepository;

/// Repository port for active user sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds the identity owning an unexpired session by token hash.
    async fn find_identity_by_token_hash(&self, token_hash: &str)
    -> AppResult<Option<UserIdentity>>;
}

/// Authenticated caller with identity and access placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// Display identity of the caller.
    pub identity: UserIdentity,
    /// Access placement of the caller.
    pub actor: Actor,
}

/// Resolves bearer tokens to actors.
#[derive(Clone)]
pub struct ActorDirectory {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserAccessRepository>,
}

impl ActorDirectory {
    /// Creates a new directory from required dependencies.
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, users: Arc<dyn UserAccessRepository>) -> Self {
        Self { sessions, users }
    }

    /// Resolves a raw bearer token.
    pub async fn authenticate(&self, bearer_token: &str) -> AppResult<AuthenticatedActor> {
        let bearer_token = bearer_token.trim();
        if bearer_token.is_empty() {
            return Err(AppError::Unauthorized("missing session token".to_owned()));
        }

        let identity = self
            .sessions
            .find_identity_by_token_hash(&hash_session_token(bearer_token))
            .await?
            .ok_or_else(|| AppError::Unauthorized("session is invalid or expired".to_owned()))?;

        let profile = self
            .users
            .find_user_access_profile(UserId::from_uuid(identity.user_id()))
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!(
                    "user '{}' no longer exists",
                    identity.user_id()
                ))
            })?;

        Ok(AuthenticatedActor {
            identity,
            actor: Actor::from(profile),
        })
    }
}

/// Computes the SHA-256 hex digest stored for a session token.
#[must_use]
pub fn hash_session_token(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write;

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    let result = hasher.finalize();

    result
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use assetdesk_core::{AppError, AppResult, BranchId, UserIdentity};
    use assetdesk_domain::{
        RoleSlug, SystemRole, UserAccessProfile, UserId, UserPermissionOverride,
    };

    use crate::security_admin_ports::UserAccessRepository;

    use super::{ActorDirectory, SessionRepository, hash_session_token};

    struct FakeSessionRepository {
        sessions: HashMap<String, UserIdentity>,
    }

    #[async_trait]
    impl SessionRepository for FakeSessionRepository {
        async fn find_identity_by_token_hash(
            &self,
            token_hash: &str,
        ) -> AppResult<Option<UserIdentity>> {
            Ok(self.sessions.get(token_hash).cloned())
        }
    }

    struct FakeUserAccessRepository {
        profiles: HashMap<UserId, UserAccessProfile>,
    }

    #[async_trait]
    impl UserAccessRepository for FakeUserAccessRepository {
        async fn find_user_access_profile(
            &self,
            user_id: UserId,
        ) -> AppResult<Option<UserAccessProfile>> {
            Ok(self.profiles.get(&user_id).cloned())
        }

        async fn save_user_permission_override(
            &self,
            _user_id: UserId,
            _permission_override: &UserPermissionOverride,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn directory(
        token: &str,
        identity: UserIdentity,
        profile: Option<UserAccessProfile>,
    ) -> ActorDirectory {
        let sessions = FakeSessionRepository {
            sessions: HashMap::from([(hash_session_token(token), identity)]),
        };
        let users = FakeUserAccessRepository {
            profiles: profile
                .into_iter()
                .map(|profile| (profile.user_id, profile))
                .collect(),
        };

        ActorDirectory::new(Arc::new(sessions), Arc::new(users))
    }

    #[test]
    fn session_token_hash_is_hex_sha256() {
        assert_eq!(
            hash_session_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn resolves_actor_placement_from_profile() {
        let user_uuid = Uuid::new_v4();
        let branch_id = BranchId::new();
        let identity = UserIdentity::new(user_uuid, "Dana", None);
        let profile = UserAccessProfile {
            user_id: UserId::from_uuid(user_uuid),
            role: RoleSlug::system(SystemRole::Technician),
            branch_id: Some(branch_id),
            department_id: None,
            managed_department_ids: BTreeSet::new(),
            permission_override: UserPermissionOverride::disabled(),
        };

        let result = directory("secret", identity.clone(), Some(profile))
            .authenticate("secret")
            .await;

        let Ok(authenticated) = result else {
            panic!("session should resolve");
        };
        assert_eq!(authenticated.identity, identity);
        assert_eq!(authenticated.actor.branch_id(), Some(branch_id));
        assert_eq!(
            authenticated.actor.role(),
            &RoleSlug::system(SystemRole::Technician)
        );
    }

    #[tokio::test]
    async fn unknown_tokens_and_deleted_users_are_unauthorized() {
        let identity = UserIdentity::new(Uuid::new_v4(), "Dana", None);
        let directory = directory("secret", identity, None);

        for token in ["", "other", "secret"] {
            let result = directory.authenticate(token).await;
            assert!(matches!(result, Err(AppError::Unauthorized(_))));
        }
    }
}
