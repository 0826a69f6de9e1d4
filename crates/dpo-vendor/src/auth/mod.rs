//! Identity resolution and role gating for the intake flow.
//!
//! Sign-in itself belongs to the hosted auth provider; this module only models the profile that
//! provider hands back, the permissions a role carries, and where a freshly signed-in user lands.

mod identity;
mod landing;

pub use identity::{
    has_permission, AuthUser, Identity, IdentityError, IdentityProvider, Permission,
    ProfileDirectory, Role, SignedInUser,
};
pub use landing::{
    auth_callback_url, auth_redirect_base, resolve_landing, Landing, ADMIN_DASHBOARD_PATH,
    VENDOR_DASHBOARD_PATH,
};
