use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{
        app_state::AppState,
        extractors::{AppJson, AppQuery},
    },
    app_error::AppResult,
    application::use_cases::subscription::{CreateSubscriptionInput, UpdateSubscriptionInput},
    domain::entities::subscription::Subscription,
};

#[derive(Deserialize)]
struct CreatePayload {
    user_id: String,
    service_name: String,
    price: i32,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Deserialize)]
struct UpdatePayload {
    #[serde(default)]
    price: Option<i32>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Deserialize)]
struct TotalCostQuery {
    start_date: String,
    end_date: String,
    #[serde(default)]
    service_name: Option<String>,
}

#[derive(Serialize)]
struct SubscriptionsResponse {
    subscriptions: Vec<Subscription>,
}

#[derive(Serialize)]
struct TotalCostResponse {
    total_cost: i64,
}

#[derive(Serialize)]
struct ExportResponse {
    exported: usize,
}

// `total_cost` and `export` are static segments and shadow service names
// with the same spelling.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subscription))
        .route("/{user_id}", get(list_subscriptions))
        .route("/{user_id}/total_cost", get(total_cost))
        .route("/{user_id}/export", post(export_all))
        .route(
            "/{user_id}/{service_name}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route("/{user_id}/{service_name}/export", post(export_subscription))
}

async fn create_subscription(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreatePayload>,
) -> AppResult<impl IntoResponse> {
    let subscription = app_state
        .subscription_use_cases
        .create_subscription(CreateSubscriptionInput {
            user_id: payload.user_id,
            service_name: payload.service_name,
            price: payload.price,
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn list_subscriptions(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let subscriptions = app_state
        .subscription_use_cases
        .list_subscriptions(&user_id)
        .await?;
    Ok(Json(SubscriptionsResponse { subscriptions }))
}

async fn get_subscription(
    State(app_state): State<AppState>,
    Path((user_id, service_name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let subscription = app_state
        .subscription_use_cases
        .get_subscription(&user_id, &service_name)
        .await?;
    Ok(Json(subscription))
}

async fn update_subscription(
    State(app_state): State<AppState>,
    Path((user_id, service_name)): Path<(String, String)>,
    AppJson(payload): AppJson<UpdatePayload>,
) -> AppResult<impl IntoResponse> {
    let subscription = app_state
        .subscription_use_cases
        .update_subscription(
            &user_id,
            &service_name,
            UpdateSubscriptionInput {
                price: payload.price,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;
    Ok(Json(subscription))
}

async fn delete_subscription(
    State(app_state): State<AppState>,
    Path((user_id, service_name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    app_state
        .subscription_use_cases
        .delete_subscription(&user_id, &service_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn total_cost(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    AppQuery(query): AppQuery<TotalCostQuery>,
) -> AppResult<impl IntoResponse> {
    let total_cost = app_state
        .subscription_use_cases
        .total_cost(
            &user_id,
            query.service_name.as_deref(),
            &query.start_date,
            &query.end_date,
        )
        .await?;
    Ok(Json(TotalCostResponse { total_cost }))
}

async fn export_all(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let exported = app_state.export_use_cases.export_all(&user_id).await?;
    Ok(Json(ExportResponse { exported }))
}

async fn export_subscription(
    State(app_state): State<AppState>,
    Path((user_id, service_name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let exported = app_state
        .export_use_cases
        .export_subscription(&user_id, &service_name)
        .await?;
    Ok(Json(ExportResponse { exported }))
}
