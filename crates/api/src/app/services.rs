use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use lootledger_auth::{Hs256TokenCodec, SessionClaims, TokenError};
use lootledger_core::UserId;
use lootledger_infra::{
    AdminService, DisabledNotifier, DiscordWebhookNotifier, InMemoryLootStore, LootStore,
    Notifier, ReferenceCache, SubmissionService,
};

use super::AppConfig;

/// How long a login session stays valid.
const SESSION_TTL_HOURS: i64 = 12;

/// Everything the route handlers need, wired once at startup.
pub struct AppServices {
    pub store: Arc<dyn LootStore>,
    pub cache: Arc<ReferenceCache>,
    pub submission: SubmissionService,
    pub admin: AdminService,
    pub sessions: Arc<SessionBroker>,
}

/// Wire stores, cache, notifier and services from config.
///
/// The store is the in-memory implementation; a hosted document database
/// would slot in behind the same `LootStore` seam.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = Arc::new(InMemoryLootStore::new());

    let mut sessions = SessionBroker::new(config.token_secret.as_bytes());
    let admin_id = sessions.seed(&config.admin_email, &config.admin_password);
    store.grant_admin(admin_id).await?;

    let store: Arc<dyn LootStore> = store;
    let cache = ReferenceCache::load(store.clone()).await?;
    cache.start_watching();

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(DiscordWebhookNotifier::new(url)),
        None => {
            tracing::warn!(
                "DISCORD_WEBHOOK_URL not set; registries will be recorded but never announced"
            );
            Arc::new(DisabledNotifier)
        }
    };

    Ok(AppServices {
        submission: SubmissionService::new(store.clone(), notifier),
        admin: AdminService::new(store.clone(), cache.clone()),
        store,
        cache,
        sessions: Arc::new(sessions),
    })
}

/// What a successful login hands back.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub claims: SessionClaims,
}

#[derive(Debug)]
pub enum SignInError {
    InvalidCredentials,
    Token(TokenError),
}

struct SeededCredential {
    user_id: UserId,
    password: String,
}

/// Email/password sign-in + session-token verification.
///
/// Credentials are seeded from config — this is the stand-in for the
/// hosted identity provider, which is an external collaborator. Tokens are
/// stateless, so sign-out is client-side discard.
pub struct SessionBroker {
    codec: Hs256TokenCodec,
    credentials: HashMap<String, SeededCredential>,
}

impl SessionBroker {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            codec: Hs256TokenCodec::new(secret),
            credentials: HashMap::new(),
        }
    }

    /// Register a credential pair; returns the identity it maps to.
    pub fn seed(&mut self, email: &str, password: &str) -> UserId {
        let user_id = UserId::new();
        self.credentials.insert(
            email.to_lowercase(),
            SeededCredential {
                user_id,
                password: password.to_string(),
            },
        );
        user_id
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<LoginGrant, SignInError> {
        let credential = self
            .credentials
            .get(&email.to_lowercase())
            .filter(|c| c.password == password)
            .ok_or(SignInError::InvalidCredentials)?;

        let now = Utc::now();
        let claims = SessionClaims {
            sub: credential.user_id,
            email: email.to_lowercase(),
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };
        let token = self.codec.mint(&claims).map_err(SignInError::Token)?;
        Ok(LoginGrant { token, claims })
    }

    pub fn verify(
        &self,
        token: &str,
        now: chrono::DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        self.codec.verify(token, now)
    }
}
