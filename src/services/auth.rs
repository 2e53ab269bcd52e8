// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, TimeZone, Timelike, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{Claims, NewUser, SessionUser, User},
};

pub const BCRYPT_COST: u32 = 12;

/// Token emitido no login, com a data de expiração da sessão.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: Arc<String>,
    session_days: i64,
}

// Normaliza credenciais: ausentes ou vazias contam como "não informadas"
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, session_days: i64) -> Self {
        Self {
            users,
            jwt_secret: Arc::new(jwt_secret),
            session_days,
        }
    }

    pub async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        name: Option<String>,
    ) -> Result<User, AppError> {
        let (Some(email), Some(password)) = (present(email), present(password)) else {
            return Err(AppError::MissingCredentials);
        };

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // Hashing fora do runtime async
        let password_clone = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash(&password_clone, BCRYPT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .users
            .create_user(NewUser {
                email: email.to_string(),
                name: name.filter(|n| !n.trim().is_empty()),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "👤 Usuário registrado");
        Ok(user)
    }

    /// Provider de credenciais: `None` para qualquer falha de autenticação.
    pub async fn authorize(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<SessionUser>, AppError> {
        let (Some(email), Some(password)) = (present(email), present(password)) else {
            return Ok(None);
        };

        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };

        // Usuários sem senha (login social / magic link) não entram por aqui
        let Some(password_hash) = user.password_hash.clone() else {
            return Ok(None);
        };

        let password_clone = password.to_owned();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
                // Hash corrompido no banco conta como senha errada
                .unwrap_or(false);

        Ok(is_password_valid.then(|| SessionUser::from(&user)))
    }

    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<(IssuedToken, SessionUser), AppError> {
        if present(email).is_none() || present(password).is_none() {
            return Err(AppError::MissingCredentials);
        }

        let user = self
            .authorize(email, password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Valida o JWT e carrega o usuário. Devolve também a expiração da sessão.
    pub async fn validate_token(&self, token: &str) -> Result<(User, DateTime<Utc>), AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let expires = Utc
            .timestamp_opt(token_data.claims.exp as i64, 0)
            .single()
            .ok_or(AppError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok((user, expires))
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        // O `exp` do JWT tem resolução de segundos; a resposta usa o mesmo instante
        let expires = (now + chrono::Duration::days(self.session_days))
            .with_nanosecond(0)
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("invalid session expiry")))?;

        let claims = Claims {
            sub: user_id,
            exp: expires.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(IssuedToken { token, expires })
    }
}
