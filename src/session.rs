// src/session.rs

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::user::Identity,
    state::AppState,
    store::{Store, keys},
};

/// Demo account seeded into an empty credential store so the service is
/// usable without registering.
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Validates credentials against the credential store and tracks the single
/// active session for this service instance.
///
/// The credential list lives under the 'users' key; the active identity is
/// persisted under 'user' so a session survives a restart.
#[derive(Clone)]
pub struct SessionManager {
    store: Store,
}

impl SessionManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Seeds the demo account if the credential store is empty.
    /// Called once at startup.
    pub async fn seed_demo_user(&self) -> Result<(), AppError> {
        let _cycle = self.store.lock_updates().await;
        let users: Vec<Identity> = self.store.get(keys::USERS).await?.unwrap_or_default();
        if users.is_empty() {
            tracing::info!("Seeding demo user: {}", DEMO_EMAIL);
            let demo = Identity {
                id: "1".to_string(),
                name: "Demo User".to_string(),
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
            };
            self.store.set(keys::USERS, &vec![demo]).await?;
        }
        Ok(())
    }

    /// Creates a new identity and makes it the active session.
    ///
    /// Fails with 409 if the email is already registered; the credential
    /// store is left untouched in that case.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AppError> {
        // Held across the duplicate check and the append, so two racing
        // registrations cannot both see the email as free.
        let _cycle = self.store.lock_updates().await;
        let mut users: Vec<Identity> = self.store.get(keys::USERS).await?.unwrap_or_default();

        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        users.push(identity.clone());
        self.store.set(keys::USERS, &users).await?;
        self.store.set(keys::ACTIVE_USER, &identity).await?;

        Ok(identity)
    }

    /// Scans the credential store for an exact (email, password) match and
    /// makes the matching identity the active session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let users: Vec<Identity> = self.store.get(keys::USERS).await?.unwrap_or_default();

        let identity = users
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        self.store.set(keys::ACTIVE_USER, &identity).await?;
        Ok(identity)
    }

    /// Clears the active session. Never fails on an already-empty session.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.remove(keys::ACTIVE_USER).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<Identity>, AppError> {
        Ok(self.store.get(keys::ACTIVE_USER).await?)
    }
}

/// Axum Middleware: Session gate.
///
/// Loads the active identity from the session manager and injects it into
/// the request extensions for handlers to use. Returns 401 if nobody is
/// logged in.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state
        .sessions
        .current_user()
        .await?
        .ok_or_else(|| AppError::AuthError("Not authenticated".to_string()))?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Store::in_memory())
    }

    #[tokio::test]
    async fn demo_login_succeeds_on_fresh_store() {
        let sessions = manager();
        sessions.seed_demo_user().await.unwrap();

        let user = sessions.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert_eq!(user.name, "Demo User");
        assert!(sessions.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let sessions = manager();
        sessions.seed_demo_user().await.unwrap();
        sessions.seed_demo_user().await.unwrap();

        let users: Vec<Identity> = sessions.store.get(keys::USERS).await.unwrap().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_store_unchanged() {
        let sessions = manager();
        sessions
            .register("Alice", "alice@example.com", "secret1")
            .await
            .unwrap();

        let err = sessions
            .register("Alice Again", "alice@example.com", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let users: Vec<Identity> = sessions.store.get(keys::USERS).await.unwrap().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn login_is_case_sensitive_and_exact() {
        let sessions = manager();
        sessions.seed_demo_user().await.unwrap();

        assert!(sessions.login("Demo@example.com", DEMO_PASSWORD).await.is_err());
        assert!(sessions.login(DEMO_EMAIL, "DEMO123").await.is_err());
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let sessions = manager();
        sessions.seed_demo_user().await.unwrap();
        sessions.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        sessions.logout().await.unwrap();
        assert!(sessions.current_user().await.unwrap().is_none());

        // A second logout is still fine.
        sessions.logout().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn racing_registrations_admit_exactly_one_identity() {
        use std::sync::Arc;

        let sessions = manager();

        for round in 0..50 {
            let email = format!("race{}@example.com", round);
            let barrier = Arc::new(tokio::sync::Barrier::new(8));

            let mut handles = Vec::new();
            for i in 0..8 {
                let sessions = sessions.clone();
                let email = email.clone();
                let barrier = barrier.clone();
                handles.push(tokio::spawn(async move {
                    barrier.wait().await;
                    sessions
                        .register(&format!("Racer {}", i), &email, "password1")
                        .await
                        .is_ok()
                }));
            }

            let mut successes = 0;
            for handle in handles {
                if handle.await.unwrap() {
                    successes += 1;
                }
            }
            assert_eq!(successes, 1, "round {}: one registration must win", round);
        }

        // Every losing task saw the winner's append; nothing was lost or
        // duplicated.
        let users: Vec<Identity> = sessions.store.get(keys::USERS).await.unwrap().unwrap();
        assert_eq!(users.len(), 50);
    }

    #[tokio::test]
    async fn registration_activates_the_new_identity() {
        let sessions = manager();
        let identity = sessions
            .register("Bob", "bob@example.com", "hunter22")
            .await
            .unwrap();

        let active = sessions.current_user().await.unwrap().unwrap();
        assert_eq!(active.id, identity.id);
    }
}
