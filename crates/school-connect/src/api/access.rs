use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use super::{ApiError, ApiState};
use crate::accounts::Role;
use crate::config::Credential;
use crate::store::{RecordId, SchoolStore};

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: RecordId,
    pub is_staff: bool,
}

/// Bearer tokens accepted by the API, keyed by token.
#[derive(Debug, Default)]
pub struct CredentialTable {
    by_token: HashMap<String, Credential>,
}

impl CredentialTable {
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        Self {
            by_token: credentials
                .into_iter()
                .map(|credential| (credential.token.clone(), credential))
                .collect(),
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&Credential> {
        self.by_token.get(token)
    }

    /// Resolve a credential against the stored users and roles.
    pub fn resolve(&self, store: &SchoolStore, token: &str) -> Result<Principal, ApiError> {
        let credential = self
            .lookup(token)
            .ok_or(ApiError::Unauthenticated("Invalid token."))?;

        let user = store.accounts.users.get(credential.user_id)?;
        if user.as_ref().is_some_and(|user| !user.is_active) {
            return Err(ApiError::Unauthenticated("User inactive or deleted."));
        }
        let admin = store
            .accounts
            .roles
            .count(|role| role.user == credential.user_id && role.role == Role::Admin)?
            > 0;

        Ok(Principal {
            user_id: credential.user_id,
            is_staff: credential.staff || admin || user.is_some_and(|user| user.is_staff),
        })
    }
}

/// The caller of a request, anonymous unless a valid bearer token was sent.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    principal: Option<Principal>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn user_id(&self) -> Option<RecordId> {
        self.principal.map(|principal| principal.user_id)
    }

    pub fn is_staff(&self) -> bool {
        self.principal.is_some_and(|principal| principal.is_staff)
    }

    /// Staff see every row; everyone else only rows owned by `owner`.
    pub fn owns_or_staff(&self, owner: RecordId) -> bool {
        self.is_staff() || self.user_id() == Some(owner)
    }

    pub fn require_user(&self) -> Result<&Principal, ApiError> {
        self.principal.as_ref().ok_or(ApiError::Unauthenticated(
            "Authentication credentials were not provided.",
        ))
    }

    pub fn require_staff(&self) -> Result<&Principal, ApiError> {
        let principal = self.require_user()?;
        if !principal.is_staff {
            debug!(user = %principal.user_id, "staff permission denied");
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action.",
            ));
        }
        Ok(principal)
    }
}

#[axum::async_trait]
impl FromRequestParts<ApiState> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, ApiError> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self::anonymous());
        };
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthenticated("Invalid token header."))?;

        let principal = state.credentials.resolve(&state.store, token)?;
        Ok(Self::signed_in(principal))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Destroy,
}

impl Action {
    fn is_read(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// Who may do what on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Open to everyone.
    Public,
    /// Anyone reads, signed-in users write.
    ReadOnlyPublic,
    /// Anyone submits, signed-in users read and manage.
    SubmitOnly,
    Authenticated,
    /// Signed-in users read, staff write.
    StaffManaged,
    Staff,
}

impl Access {
    pub fn authorize(self, action: Action, viewer: &Viewer) -> Result<(), ApiError> {
        match (self, action) {
            (Access::Public, _) => Ok(()),
            (Access::ReadOnlyPublic, action) if action.is_read() => Ok(()),
            (Access::SubmitOnly, Action::Create) => Ok(()),
            (Access::ReadOnlyPublic | Access::SubmitOnly | Access::Authenticated, _) => {
                viewer.require_user().map(|_| ())
            }
            (Access::StaffManaged, action) if action.is_read() => {
                viewer.require_user().map(|_| ())
            }
            (Access::StaffManaged | Access::Staff, _) => viewer.require_staff().map(|_| ()),
        }
    }
}
