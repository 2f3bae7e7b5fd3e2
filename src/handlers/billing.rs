// src/handlers/billing.rs

use std::time::Duration;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        billing::{PLANS, Subscription, SubscribeRequest, find_plan},
        user::Identity,
    },
    store::{Store, keys},
};

/// Simulated payment-processor latency before a subscription is activated.
const PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// Returns the fixed plan catalog.
pub async fn plans(Extension(_user): Extension<Identity>) -> impl IntoResponse {
    Json(PLANS)
}

/// Accepts a mock checkout.
///
/// Responds 202 immediately; the subscription record is written about two
/// seconds later by a deferred timer. Card fields are validated for shape
/// only and then discarded. The timer is tied to the shutdown token, so
/// teardown cancels a pending activation instead of firing it.
pub async fn subscribe(
    State(store): State<Store>,
    State(shutdown): State<CancellationToken>,
    Extension(user): Extension<Identity>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let plan = find_plan(&payload.plan)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown plan '{}'", payload.plan)))?;

    tracing::info!("User '{}' subscribing to {}", user.email, plan.name);

    let plan = *plan;
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = tokio::time::sleep(PROCESSING_DELAY) => {
                let now = Utc::now();
                let subscription = Subscription {
                    plan: plan.id.to_string(),
                    plan_name: plan.name.to_string(),
                    amount: plan.price,
                    start_date: now,
                    end_date: now + ChronoDuration::days(30),
                    transaction_id: format!("TXN{}", now.timestamp_millis()),
                };
                if let Err(e) = store.set(keys::USER_SUBSCRIPTION, &subscription).await {
                    tracing::warn!("Failed to store subscription: {}", e);
                }
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "message": format!("Processing payment for {}", plan.name),
        })),
    ))
}

/// The current subscription, or 404 if none has been activated.
pub async fn subscription(
    State(store): State<Store>,
    Extension(_user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let subscription: Option<Subscription> = store.get(keys::USER_SUBSCRIPTION).await?;
    let subscription = subscription
        .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;
    Ok(Json(subscription))
}
