//! Authentication types: JWT claims, roles, and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Staff roles within a cooperative.
///
/// Roles are a closed set; anything outside this enum is rejected at the
/// token boundary rather than carried around as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every operation.
    Admin,
    /// Bookkeeping: ledger, savings, members, accounts, reports.
    Treasurer,
    /// Store operations: POS, product reads, daily sales.
    Cashier,
}

impl Role {
    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Treasurer => "treasurer",
            Self::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "treasurer" => Ok(Self::Treasurer),
            "cashier" => Ok(Self::Cashier),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// What a token is allowed to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    /// Staff token: subject is a user id, role applies.
    Staff,
    /// Member-portal token: subject is a member id, read-own-savings only.
    MemberPortal,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id for staff tokens, member id for portal tokens).
    pub sub: Uuid,
    /// Cooperative (tenant) ID.
    pub coop: Uuid,
    /// Staff role; absent on member-portal tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Token scope.
    pub scope: TokenScope,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a staff user.
    #[must_use]
    pub fn staff(user_id: Uuid, cooperative_id: Uuid, role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            coop: cooperative_id,
            role: Some(role),
            scope: TokenScope::Staff,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Creates claims for a member-portal session.
    #[must_use]
    pub fn member_portal(member_id: Uuid, cooperative_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: member_id,
            coop: cooperative_id,
            role: None,
            scope: TokenScope::MemberPortal,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the subject id (user or member depending on scope).
    #[must_use]
    pub const fn subject_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the cooperative (tenant) id.
    #[must_use]
    pub const fn cooperative_id(&self) -> Uuid {
        self.coop
    }
}

/// Staff login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Member-portal login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberLoginRequest {
    /// Cooperative the member belongs to. Member numbers repeat across
    /// cooperatives, so the portal login must name its tenant.
    pub cooperative_id: Uuid,
    /// Member number (e.g. `AGT-0001`).
    pub member_number: String,
    /// Portal PIN.
    pub pin: String,
}

/// Cooperative bootstrap registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCooperativeRequest {
    /// Cooperative name.
    pub name: String,
    /// Cooperative address.
    pub address: Option<String>,
    /// Cooperative phone.
    pub phone: Option<String>,
    /// Cooperative contact email.
    pub email: Option<String>,
    /// Initial admin username.
    pub admin_username: String,
    /// Initial admin password.
    pub admin_password: String,
    /// Initial admin full name.
    pub admin_name: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Full name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Cooperative ID.
    pub cooperative_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Treasurer, Role::Cashier] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_staff_claims() {
        let user = Uuid::new_v4();
        let coop = Uuid::new_v4();
        let claims = Claims::staff(user, coop, Role::Treasurer, Utc::now());

        assert_eq!(claims.subject_id(), user);
        assert_eq!(claims.cooperative_id(), coop);
        assert_eq!(claims.role, Some(Role::Treasurer));
        assert_eq!(claims.scope, TokenScope::Staff);
    }

    #[test]
    fn test_member_portal_claims_have_no_role() {
        let claims = Claims::member_portal(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        assert_eq!(claims.role, None);
        assert_eq!(claims.scope, TokenScope::MemberPortal);
    }
}
