use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

#[derive(Debug, serde::Serialize)]
pub struct RoomResponse {
    id: i32,
    room_name: String,
    customer_id: i32,
}

impl From<crm_db::models::Room> for RoomResponse {
    fn from(
        crm_db::models::Room {
            id,
            room_name,
            customer_id,
        }: crm_db::models::Room,
    ) -> Self {
        Self {
            id,
            room_name,
            customer_id,
        }
    }
}

/// The owning customer is not looked up; a dangling id is left to the
/// database's foreign key.
#[derive(Debug, serde::Deserialize)]
pub struct RoomBody {
    #[serde(default)]
    room_name: Option<String>,
    customer_id: i32,
}

pub async fn list_for_customer(
    State(app_state): State<crate::AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let rooms = app_state
        .store
        .list_rooms_for_customer(customer_id)
        .await
        .map_err(ApiError::database("Error fetching rooms"))?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(app_state): State<crate::AppState>,
    Json(RoomBody {
        room_name,
        customer_id,
    }): Json<RoomBody>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let room = app_state
        .store
        .add_room(crm_db::models::NewRoom {
            room_name,
            customer_id,
        })
        .await
        .map_err(ApiError::database("Error adding room"))?;
    tracing::info!(room_id = room.id, customer_id, "room added");
    Ok((StatusCode::CREATED, "Room added"))
}
