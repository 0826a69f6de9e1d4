use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Profile role as stored by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vendor,
    Superadmin,
    LimitedAdmin,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Superadmin => "superadmin",
            Role::LimitedAdmin => "limited_admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Superadmin | Role::LimitedAdmin)
    }

    pub fn has_permission(self, permission: Permission) -> bool {
        match permission {
            Permission::DownloadData | Permission::ApproveForms | Permission::ManageUsers => {
                self == Role::Superadmin
            }
            Permission::ViewAll => self.is_admin(),
        }
    }
}

/// Capabilities gated on role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    DownloadData,
    ApproveForms,
    ViewAll,
    ManageUsers,
}

impl Permission {
    pub fn label(self) -> &'static str {
        match self {
            Permission::DownloadData => "download_data",
            Permission::ApproveForms => "approve_forms",
            Permission::ViewAll => "view_all",
            Permission::ManageUsers => "manage_users",
        }
    }
}

/// Signed-in user with the profile fields the intake flow reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl Identity {
    /// Bare vendor profile created the first time a user signs in.
    pub fn vendor(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: Role::Vendor,
            first_name: None,
            last_name: None,
            company: None,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Company name, else the trimmed full name, else `"Unknown Vendor"`.
    pub fn vendor_name(&self) -> String {
        if let Some(company) = self.company.as_deref().filter(|value| !value.is_empty()) {
            return company.to_string();
        }

        let full_name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            "Unknown Vendor".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Absent identities hold no permissions.
pub fn has_permission(identity: Option<&Identity>, permission: Permission) -> bool {
    identity.is_some_and(|identity| identity.has_permission(permission))
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of whoever is driving the wizard.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError>;
}

/// Profile table owned by the hosted auth backend.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Identity>, IdentityError>;
    async fn insert_profile(&self, profile: Identity) -> Result<(), IdentityError>;
}

/// The account the hosted auth provider reports as signed in, before any profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Identity provider bound to one session's auth user.
///
/// Being signed in is decided by the auth user alone. The profile row only enriches the identity
/// from the profile row; a missing or unreadable profile yields a bare vendor identity. The auth
/// email wins over the profile email unless the auth provider reported none.
pub struct SignedInUser<P> {
    directory: Arc<P>,
    user: Option<AuthUser>,
}

impl<P> SignedInUser<P> {
    pub fn new(directory: Arc<P>, user: Option<AuthUser>) -> Self {
        Self { directory, user }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }
}

#[async_trait]
impl<P> IdentityProvider for SignedInUser<P>
where
    P: ProfileDirectory + 'static,
{
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        let Some(user) = &self.user else {
            return Ok(None);
        };

        let profile = match self.directory.fetch_profile(&user.id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "profile lookup failed, using bare identity");
                None
            }
        };

        let identity = match profile {
            Some(profile) if user.email.is_empty() => Identity {
                id: user.id.clone(),
                ..profile
            },
            Some(profile) => Identity {
                id: user.id.clone(),
                email: user.email.clone(),
                ..profile
            },
            None => Identity::vendor(user.id.clone(), user.email.clone()),
        };
        Ok(Some(identity))
    }
}
