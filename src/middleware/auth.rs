use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, models::Role, state::AppState};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

pub fn ensure_seller(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Seller)
}

pub fn ensure_customer(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Customer)
}

/// Admins pass; everyone else must own the resource.
pub fn ensure_owner_or_admin(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.is_admin() || user.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
    let role = Role::parse(&decoded.claims.role)
        .map_err(|_| AppError::Unauthorized("Invalid role in token".into()))?;

    Ok(AuthUser { user_id, role })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        decode_token(token, &state.config.jwt_secret)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token_for(sub: &str, role: &str, secret: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_valid_token() {
        let id = Uuid::new_v4();
        let token = token_for(&id.to_string(), "seller", "s3cret", 3600);
        let user = decode_token(&token, "s3cret").unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, Role::Seller);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let id = Uuid::new_v4().to_string();
        let token = token_for(&id, "customer", "one", 3600);
        assert!(matches!(
            decode_token(&token, "two"),
            Err(AppError::Unauthorized(_))
        ));

        let expired = token_for(&id, "customer", "one", -3600);
        assert!(matches!(
            decode_token(&expired, "one"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn owner_or_admin_guard() {
        let owner = Uuid::new_v4();
        let seller = AuthUser {
            user_id: owner,
            role: Role::Seller,
        };
        let other = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Seller,
        };
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(ensure_owner_or_admin(&seller, owner).is_ok());
        assert!(ensure_owner_or_admin(&admin, owner).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&other, owner),
            Err(AppError::Forbidden)
        ));
        assert!(ensure_customer(&seller).is_err());
    }
}
