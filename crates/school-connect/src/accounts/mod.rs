//! Users and their roles.

mod domain;
mod resources;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{resource_routes, ApiError, ApiState, Viewer};
use crate::store::{tally, CountRows, RowCounts, StoreError, Table};

pub use domain::{Role, User, UserRole};
pub use resources::{UserRoles, Users};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountTables {
    pub users: Table<User>,
    pub roles: Table<UserRole>,
}

impl CountRows for AccountTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.users)?;
        tally(counts, &self.roles)
    }
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/me", get(me))
        .merge(resource_routes::<Users>())
        .merge(resource_routes::<UserRoles>())
}

/// The caller as the API sees it.
async fn me(State(state): State<ApiState>, viewer: Viewer) -> Result<Json<Value>, ApiError> {
    let principal = viewer.require_user()?;
    let user = state.store.accounts.users.get(principal.user_id)?;
    let mut roles: Vec<&'static str> = state
        .store
        .accounts
        .roles
        .select(|role| role.user == principal.user_id)?
        .into_iter()
        .map(|role| role.role.as_str())
        .collect();
    roles.sort_unstable();

    Ok(Json(json!({
        "id": principal.user_id,
        "is_staff": principal.is_staff,
        "user": user,
        "roles": roles,
    })))
}
