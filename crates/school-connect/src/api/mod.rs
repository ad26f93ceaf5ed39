//! Generic HTTP layer: caller resolution, access rules and the list/detail
//! handlers every resource group mounts.

pub mod access;
mod error;
pub mod handlers;
pub mod resource;
mod state;

pub use access::{Access, Action, CredentialTable, Principal, Viewer};
pub use error::ApiError;
pub use handlers::resource_routes;
pub use resource::{NoFilter, Resource};
pub use state::ApiState;
