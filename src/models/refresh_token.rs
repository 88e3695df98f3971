// src/models/refresh_token.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

// Um refresh token persistido. Só os campos de revogação mudam depois de criado.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token: String,
    pub expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by_ip: String,
    pub revoked: Option<DateTime<Utc>>,
    pub revoked_by_ip: Option<String>,
    // Aponta para o token que substituiu este na rotação
    pub replaced_by_token: Option<String>,
}

impl RefreshToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked.is_none() && !self.is_expired_at(now)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

// Token emitido mas ainda não salvo: quem chama decide quando persistir.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub account_id: Uuid,
    pub token: String,
    pub expires: DateTime<Utc>,
    pub created_by_ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(expires: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            token: "abc".into(),
            expires,
            created_at: Utc::now(),
            created_by_ip: "127.0.0.1".into(),
            revoked: None,
            revoked_by_ip: None,
            replaced_by_token: None,
        }
    }

    #[test]
    fn fresh_token_is_active() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::days(7));
        assert!(!token.is_expired_at(now));
        assert!(token.is_active_at(now));
    }

    #[test]
    fn revoked_token_is_inactive_even_before_expiry() {
        let now = Utc::now();
        let mut token = token_expiring_at(now + Duration::days(7));
        token.revoked = Some(now);
        assert!(!token.is_expired_at(now));
        assert!(!token.is_active_at(now));
    }

    #[test]
    fn expiry_instant_itself_is_still_active() {
        let now = Utc::now();
        let token = token_expiring_at(now);
        assert!(token.is_active_at(now));
        assert!(!token.is_active_at(now + Duration::seconds(1)));
    }
}
