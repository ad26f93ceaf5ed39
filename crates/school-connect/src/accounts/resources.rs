use std::cmp::Ordering;

use super::domain::{User, UserRole};
use crate::api::{Access, NoFilter, Resource};
use crate::store::{ensure_exists, SchoolStore, StoreError, Table};
use crate::{events, gallery, jobs, news};

pub struct Users;

impl Resource for Users {
    type Record = User;
    type Filter = NoFilter;

    const PATH: &'static str = "users";
    const ACCESS: Access = Access::Staff;

    fn table(store: &SchoolStore) -> &Table<User> {
        &store.accounts.users
    }

    fn ordering(a: &User, b: &User) -> Ordering {
        a.email.cmp(&b.email)
    }

    fn on_delete(store: &SchoolStore, user: &User) -> Result<(), StoreError> {
        store.accounts.roles.remove_where(|role| role.user == user.id)?;
        events::forget_user(store, user.id)?;
        gallery::forget_user(store, user.id)?;
        jobs::forget_user(store, user.id)?;
        news::forget_user(store, user.id)
    }
}

pub struct UserRoles;

impl Resource for UserRoles {
    type Record = UserRole;
    type Filter = NoFilter;

    const PATH: &'static str = "user-roles";
    const ACCESS: Access = Access::Staff;

    fn table(store: &SchoolStore) -> &Table<UserRole> {
        &store.accounts.roles
    }

    fn ordering(a: &UserRole, b: &UserRole) -> Ordering {
        a.created_at.cmp(&b.created_at)
    }

    fn check_references(store: &SchoolStore, role: &UserRole) -> Result<(), StoreError> {
        ensure_exists(&store.accounts.users, "user", role.user)
    }
}
