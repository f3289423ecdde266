use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PHONE_RE;
use crate::models::{Role, User};

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(regex(path = *PHONE_RE, message = "must be 10 digits"))]
    pub phone: String,
    /// `customer` or `seller`.
    pub role: Role,
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub shop_name: Option<String>,
    #[validate(length(min = 1))]
    pub shop_address: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "must be 10 digits"))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub shop_name: Option<String>,
    #[validate(length(min = 1))]
    pub shop_address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(phone: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "secret1".into(),
            first_name: "Asha".into(),
            last_name: "Patil".into(),
            phone: phone.into(),
            role: Role::Customer,
            address: None,
            shop_name: None,
            shop_address: None,
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(register("9876543210", "asha@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_short_phone_and_bad_email() {
        let errors = register("12345", "not-an-email").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn empty_profile_patch_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
