use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(user_id: Uuid, role: Role, secret: &str, ttl_hours: i64) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    if payload.role == Role::Admin {
        return Err(AppError::BadRequest(
            "Only customer or seller accounts can be registered".into(),
        ));
    }
    if payload.role == Role::Seller
        && (payload.shop_name.is_none() || payload.shop_address.is_none())
    {
        return Err(AppError::BadRequest(
            "Sellers must provide shop_name and shop_address".into(),
        ));
    }

    let email = payload.email.trim().to_lowercase();
    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let (shop_name, shop_address) = match payload.role {
        Role::Seller => (payload.shop_name, payload.shop_address),
        _ => (None, None),
    };

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(payload.role.as_str().to_string()),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        phone: Set(payload.phone),
        address: Set(payload.address),
        shop_name: Set(shop_name),
        shop_address: Set(shop_address),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;
    tracing::info!(user_id = %user.id, role = %user.role, "user registered");

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let user = User::from(user);
    let token = issue_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
    )?;

    audit::record(
        &state.pool,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user,
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Profile", User::from(found)))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    let existing = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_seller = existing.role == Role::Seller.as_str();
    if !is_seller && (payload.shop_name.is_some() || payload.shop_address.is_some()) {
        return Err(AppError::BadRequest(
            "Only sellers have shop details".into(),
        ));
    }

    let mut active: UserActive = existing.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(shop_name) = payload.shop_name {
        active.shop_name = Set(Some(shop_name));
    }
    if let Some(shop_address) = payload.shop_address {
        active.shop_address = Set(Some(shop_address));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "profile_update",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::ok("Profile updated", User::from(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    #[test]
    fn password_hash_verifies_only_the_same_password() {
        let hash = hash_password("letmein").unwrap();
        assert!(verify_password("letmein", &hash).unwrap());
        assert!(!verify_password("letmeout", &hash).unwrap());
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let id = Uuid::new_v4();
        let token = issue_token(id, Role::Customer, "secret", 1).unwrap();
        let user = decode_token(&token, "secret").unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, Role::Customer);
    }
}
