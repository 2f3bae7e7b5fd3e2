// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, assessment, auth, billing, chat, results},
    session::session_middleware,
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, assessment, results, chat, billing, admin).
/// * Gates everything except login/registration behind the session middleware.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    // Open surface: anything a logged-out visitor may touch. Logout is open
    // because it clears the session unconditionally.
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/captcha", get(auth::captcha));

    let assessment_routes = Router::new()
        .route("/questions", get(assessment::questions))
        .route("/start", post(assessment::start))
        .route("/", get(assessment::snapshot))
        .route("/answer", post(assessment::answer))
        .route("/next", post(assessment::next))
        .route("/previous", post(assessment::previous));

    let results_routes = Router::new()
        .route("/", get(results::list))
        .route("/latest", get(results::latest))
        .route("/stats", get(results::stats));

    let chat_routes = Router::new()
        .route("/messages", get(chat::list).post(chat::send));

    let billing_routes = Router::new()
        .route("/plans", get(billing::plans))
        .route("/subscribe", post(billing::subscribe))
        .route("/subscription", get(billing::subscription));

    // Admin surface is gated on login only: the system has no role model,
    // any authenticated operator gets panel access.
    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/posts", get(admin::list_posts).post(admin::create_post))
        .route(
            "/posts/{id}",
            axum::routing::put(admin::update_post).delete(admin::delete_post),
        )
        .route("/assessments", get(admin::list_assessments))
        .route(
            "/assessments/{index}",
            axum::routing::delete(admin::delete_assessment),
        );

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .nest("/api/assessment", assessment_routes)
        .nest("/api/results", results_routes)
        .nest("/api/chat", chat_routes)
        .nest("/api/billing", billing_routes)
        .nest("/api/admin", admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .merge(protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
