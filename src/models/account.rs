// src/models/account.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

// Mapeia o CREATE TYPE account_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_role")]
pub enum Role {
    Admin,
    User,
    Staff,
}

// Representa uma conta vinda do banco de dados
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: Option<DateTime<Utc>>,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
    pub password_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Derivado, nunca armazenado: a conta está verificada se `verified` tem data.
    pub fn is_verified(&self) -> bool {
        self.verified.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// Dados para inserir uma conta nova (o hash já vem calculado)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: Option<DateTime<Utc>>,
    pub verification_token: Option<String>,
}

// O que a API devolve sobre uma conta. Hash e tokens nunca saem daqui.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub id: Uuid,
    #[schema(example = "Mr")]
    pub title: String,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_verified: bool,
}

impl From<&Account> for AccountDetails {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            title: account.title.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
            is_verified: account.is_verified(),
        }
    }
}

// Resposta de autenticação: detalhes da conta + JWT.
// O refresh token vai no cookie http-only, não no corpo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub account: AccountDetails,
    pub jwt_token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID da conta)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatePayload {
    #[validate(email(message = "Email is invalid"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Ms")]
    pub title: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
    pub role: Role,
}

// Todos os campos opcionais: só o que vier é alterado
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountPayload {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<Role>,
}

impl UpdateAccountPayload {
    /// `validate()` mais a confirmação de senha. Se um dos dois campos vier,
    /// o outro tem que vir igual.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if self.password != self.confirm_password {
            let mut error = ValidationError::new("must_match");
            error.message = Some("Passwords must match".into());
            errors.add("confirm_password", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenPayload {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

// Revogação: o token pode vir no corpo ou no cookie
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevokeTokenPayload {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_account(role: Role) -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            title: "Ms".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            password_hash: "$2b$12$hash".into(),
            role,
            verified: None,
            verification_token: Some("verify-me".into()),
            reset_token: None,
            reset_token_expires: None,
            password_reset: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn is_verified_follows_the_verified_timestamp() {
        let mut account = sample_account(Role::User);
        assert!(!account.is_verified());

        account.verified = Some(Utc::now());
        assert!(account.is_verified());
    }

    #[test]
    fn details_never_expose_secrets() {
        let account = sample_account(Role::Admin);
        let json = serde_json::to_value(AccountDetails::from(&account)).unwrap();

        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["role"], "Admin");
        assert_eq!(json["isVerified"], false);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("verificationToken").is_none());
    }

    #[test]
    fn auth_response_flattens_account_details() {
        let account = sample_account(Role::User);
        let response = AuthResponse {
            account: AccountDetails::from(&account),
            jwt_token: "jwt".into(),
        };
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["jwtToken"], "jwt");
    }

    #[test]
    fn register_requires_matching_passwords() {
        let payload = RegisterPayload {
            title: "Mr".into(),
            first_name: "John".into(),
            last_name: "Roe".into(),
            email: "john@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn register_rejects_invalid_email() {
        let payload = RegisterPayload {
            title: "Mr".into(),
            first_name: "John".into(),
            last_name: "Roe".into(),
            email: "not-an-email".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateAccountPayload::default().validate_all().is_ok());
    }

    #[test]
    fn update_with_matching_passwords_is_valid() {
        let payload = UpdateAccountPayload {
            password: Some("secret99".into()),
            confirm_password: Some("secret99".into()),
            ..Default::default()
        };
        assert!(payload.validate_all().is_ok());
    }

    #[test]
    fn update_rejects_mismatched_passwords() {
        let payload = UpdateAccountPayload {
            password: Some("secret99".into()),
            confirm_password: Some("secret98".into()),
            ..Default::default()
        };
        let errors = payload.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn update_rejects_password_without_confirmation() {
        let payload = UpdateAccountPayload {
            password: Some("secret99".into()),
            ..Default::default()
        };
        let errors = payload.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn update_keeps_field_errors_next_to_the_confirmation_error() {
        let payload = UpdateAccountPayload {
            email: Some("nope".into()),
            password: Some("abc".into()),
            ..Default::default()
        };
        let errors = payload.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("confirm_password"));
    }
}
