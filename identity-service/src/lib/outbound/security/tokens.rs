use auth::JwtError;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;

use crate::config::JwtConfig;
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::models::AccessClaims;
use crate::domain::auth::models::RefreshClaims;
use crate::domain::auth::ports::TokenSigner;
use crate::domain::user::models::User;

/// JWT implementation of the `TokenSigner` port.
///
/// Holds two independent handlers: access tokens never validate against the
/// refresh secret and vice versa. Lifetimes come from configuration
/// (minutes for access, days for refresh).
pub struct JwtTokenSigner {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: JwtHandler::new(config.access_secret.as_bytes()),
            refresh: JwtHandler::new(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_expiration_minutes),
            refresh_ttl: Duration::days(config.refresh_expiration_days),
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign_access(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        self.access
            .encode(&claims)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    fn sign_refresh(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        // Subject only: role and email changes surface at the next refresh
        let claims = RefreshClaims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        self.refresh
            .encode(&claims)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.access.decode(token).map_err(map_jwt_error)
    }

    fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.refresh.decode(token).map_err(map_jwt_error)
    }
}

fn map_jwt_error(e: JwtError) -> TokenError {
    match e {
        JwtError::TokenExpired => TokenError::Expired,
        other => TokenError::Invalid(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserRole;
    use crate::domain::user::models::UserStatus;

    fn signer() -> JwtTokenSigner {
        JwtTokenSigner::new(&JwtConfig {
            access_secret: "test-access-secret-at-least-32-bytes!".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-bytes!".to_string(),
            access_expiration_minutes: 15,
            refresh_expiration_days: 7,
        })
    }

    fn test_user() -> User {
        User {
            id: UserId::new(),
            full_name: FullName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            refresh_token_hash: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_access_claims_round_trip() {
        let signer = signer();
        let user = test_user();

        let token = signer.sign_access(&user).unwrap();
        let claims = signer.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_refresh_claims_round_trip() {
        let signer = signer();
        let user = test_user();

        let token = signer.sign_refresh(&user).unwrap();
        let claims = signer.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_secrets_are_not_interchangeable() {
        let signer = signer();
        let user = test_user();

        let access = signer.sign_access(&user).unwrap();
        let refresh = signer.sign_refresh(&user).unwrap();

        assert!(signer.verify_refresh(&access).is_err());
        assert!(signer.verify_access(&refresh).is_err());
    }
}
