use crate::{customers::CustomerResponse, error::ApiError};
use axum::{extract::State, Json};

#[derive(Debug, serde::Serialize)]
pub struct StatusCountResponse {
    status: String,
    count: i64,
}

/// Customer counts per status for deliveries in the current month.
pub async fn stats(
    State(app_state): State<crate::AppState>,
) -> Result<Json<Vec<StatusCountResponse>>, ApiError> {
    let counts = app_state
        .store
        .count_statuses_for_current_month()
        .await
        .map_err(ApiError::database("Error fetching stats"))?;
    Ok(Json(
        counts
            .into_iter()
            .map(|crm_db::models::StatusCount { status, count }| StatusCountResponse { status, count })
            .collect(),
    ))
}

pub async fn pending(
    State(app_state): State<crate::AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = app_state
        .store
        .list_pending_customers()
        .await
        .map_err(ApiError::database("Error fetching pending customers"))?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}
