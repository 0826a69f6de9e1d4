use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use super::identity::{Identity, ProfileDirectory, Role};

pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const VENDOR_DASHBOARD_PATH: &str = "/vendor/dashboard";
const CALLBACK_PATH: &str = "/auth/callback";

/// Where a user is sent once the auth provider hands back a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Landing {
    pub role: Role,
    pub redirect_to: &'static str,
}

impl Landing {
    fn for_role(role: Role) -> Self {
        let redirect_to = match role {
            Role::Superadmin => ADMIN_DASHBOARD_PATH,
            Role::Vendor | Role::LimitedAdmin => VENDOR_DASHBOARD_PATH,
        };
        Self { role, redirect_to }
    }
}

/// Resolve the post sign-in destination, provisioning a vendor profile on first sign-in.
///
/// Directory failures never block the redirect: the user lands on the vendor dashboard.
pub async fn resolve_landing<P>(directory: &P, user_id: &str, email: Option<&str>) -> Landing
where
    P: ProfileDirectory + ?Sized,
{
    let profile = match directory.fetch_profile(user_id).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(user_id, error = %err, "profile lookup failed during sign-in");
            None
        }
    };

    let role = match profile {
        Some(profile) => profile.role,
        None => {
            let provisioned = Identity::vendor(user_id, email.unwrap_or_default());
            match directory.insert_profile(provisioned).await {
                Ok(()) => info!(user_id, "provisioned vendor profile on first sign-in"),
                Err(err) => warn!(user_id, error = %err, "unable to provision vendor profile"),
            }
            Role::Vendor
        }
    };

    Landing::for_role(role)
}

/// Local origins redirect back to themselves; everything else goes to the public deployment.
pub fn auth_redirect_base(origin: Option<&Url>, public_url: &Url) -> String {
    if let Some(origin) = origin {
        if let Some(host) = origin.host_str().filter(|host| is_local_host(host)) {
            let port = origin
                .port()
                .map(|port| format!(":{port}"))
                .unwrap_or_default();
            return format!("{}://{}{}", origin.scheme(), host, port);
        }
    }

    public_url.as_str().trim_end_matches('/').to_string()
}

pub fn auth_callback_url(origin: Option<&Url>, public_url: &Url) -> String {
    format!("{}{}", auth_redirect_base(origin, public_url), CALLBACK_PATH)
}

fn is_local_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1"
}
