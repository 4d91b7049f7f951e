use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crm_db::models::{CustomerChanges, NewCustomer, PENDING_STATUS};
use serde::{Deserialize, Deserializer};

#[derive(Debug, serde::Serialize)]
pub struct CustomerResponse {
    id: i32,
    name: String,
    job: String,
    address: String,
    id_number: String,
    phone: String,
    doy: String,
    email: String,
    delivery_date: Option<jiff::civil::Date>,
    status: String,
}

impl From<crm_db::models::Customer> for CustomerResponse {
    fn from(
        crm_db::models::Customer {
            id,
            name,
            job,
            address,
            id_number,
            phone,
            doy,
            email,
            delivery_date,
            status,
        }: crm_db::models::Customer,
    ) -> Self {
        Self {
            id,
            name,
            job,
            address,
            id_number,
            phone,
            doy,
            email,
            delivery_date: delivery_date.map(|date| date.to_jiff()),
            status,
        }
    }
}

/// Request body of create and update. Absent strings become `""` and an
/// absent or blank delivery date becomes NULL. Create turns an absent or empty
/// status into "Pending"; update does so only when it is absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerBody {
    name: Option<String>,
    job: Option<String>,
    address: Option<String>,
    id_number: Option<String>,
    phone: Option<String>,
    doy: Option<String>,
    email: Option<String>,
    #[serde(deserialize_with = "blank_date_as_none")]
    delivery_date: Option<jiff::civil::Date>,
    status: Option<String>,
}

impl CustomerBody {
    /// The name is passed through as-is; the database rejects a missing one.
    fn into_new_customer(self) -> NewCustomer {
        NewCustomer {
            name: self.name,
            job: self.job.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            id_number: self.id_number.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            doy: self.doy.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            delivery_date: self.delivery_date.map(Into::into),
            status: self
                .status
                .filter(|status| !status.is_empty())
                .unwrap_or_else(|| PENDING_STATUS.to_owned()),
        }
    }

    fn into_changes(self) -> Result<CustomerChanges, ApiError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ApiError::Validation("Name is required")),
        };
        Ok(CustomerChanges {
            name,
            job: self.job.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            id_number: self.id_number.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            doy: self.doy.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            delivery_date: self.delivery_date.map(Into::into),
            status: self.status.unwrap_or_else(|| PENDING_STATUS.to_owned()),
        })
    }
}

/// Accepts `YYYY-MM-DD`, a full RFC 3339 timestamp (taken as a UTC date), an
/// empty string or null.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<jiff::civil::Date>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = raw.parse::<jiff::civil::Date>() {
        return Ok(Some(date));
    }
    raw.parse::<jiff::Timestamp>()
        .map(|timestamp| Some(timestamp.to_zoned(jiff::tz::TimeZone::UTC).date()))
        .map_err(|err| D::Error::custom(format!("invalid delivery_date {raw:?}: {err}")))
}

pub async fn list(
    State(app_state): State<crate::AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = app_state
        .store
        .list_customers()
        .await
        .map_err(ApiError::database("Error fetching customers"))?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// A missing customer yields `null` rather than 404.
pub async fn get(
    State(app_state): State<crate::AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Option<CustomerResponse>>, ApiError> {
    let customer = app_state
        .store
        .load_customer_by_id(customer_id)
        .await
        .map_err(ApiError::database("Error fetching customer"))?;
    Ok(Json(customer.map(Into::into)))
}

pub async fn create(
    State(app_state): State<crate::AppState>,
    Json(body): Json<CustomerBody>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let customer = app_state
        .store
        .create_customer(body.into_new_customer())
        .await
        .map_err(ApiError::database("Error inserting customer"))?;
    tracing::info!(customer_id = customer.id, "customer created");
    Ok((StatusCode::CREATED, "Customer created"))
}

pub async fn update(
    State(app_state): State<crate::AppState>,
    Path(customer_id): Path<i32>,
    Json(body): Json<CustomerBody>,
) -> Result<&'static str, ApiError> {
    tracing::info!(customer_id, ?body, "updating customer");
    let changes = body.into_changes()?;
    match app_state.store.update_customer(customer_id, changes).await {
        Ok(()) => Ok("Customer updated"),
        Err(crm_db::Error::NotFound) => Err(ApiError::NotFound("Customer not found")),
        Err(err) => Err(ApiError::database("Error updating customer")(err)),
    }
}

pub async fn delete(
    State(app_state): State<crate::AppState>,
    Path(customer_id): Path<i32>,
) -> Result<&'static str, ApiError> {
    match app_state.store.delete_customer_with_rooms(customer_id).await {
        Ok(deleted) => {
            tracing::info!(
                customer_id,
                rooms = deleted.rooms,
                customers = deleted.customers,
                "customer deleted"
            );
            Ok("Customer and their rooms deleted")
        }
        Err(err) => Err(ApiError::database(delete_error_context(&err))(err)),
    }
}

/// Only a failed customer delete is reported as such. Anything else, the
/// pool checkout and BEGIN/COMMIT included, leaves the rooms in place after
/// rollback and is reported against the rooms step.
fn delete_error_context(err: &crm_db::Error) -> &'static str {
    match err {
        crm_db::Error::DeleteCustomer(_) => "Error deleting customer",
        _ => "Error deleting customer rooms",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> CustomerBody {
        serde_json::from_str(json).expect("should parse body")
    }

    #[test]
    fn create_defaults_status_and_blank_fields() {
        let fields = body(r#"{"name":"Maria","phone":"2101234567"}"#).into_new_customer();
        assert_eq!(fields.name.as_deref(), Some("Maria"));
        assert_eq!(fields.phone, "2101234567");
        assert_eq!(fields.job, "");
        assert!(fields.delivery_date.is_none());
        assert_eq!(fields.status, PENDING_STATUS);
    }

    #[test]
    fn create_treats_an_empty_status_as_pending() {
        let fields = body(r#"{"name":"Maria","status":""}"#).into_new_customer();
        assert_eq!(fields.status, PENDING_STATUS);
    }

    #[test]
    fn create_passes_a_missing_name_through() {
        let fields = body(r#"{"job":"Plumber"}"#).into_new_customer();
        assert_eq!(fields.name, None);
    }

    #[test]
    fn update_requires_a_name() {
        for json in [r#"{}"#, r#"{"name":""}"#, r#"{"name":null,"job":"Plumber"}"#] {
            assert!(matches!(
                body(json).into_changes(),
                Err(ApiError::Validation("Name is required"))
            ));
        }
    }

    #[test]
    fn update_keeps_the_given_status() {
        let fields = body(r#"{"name":"Nikos","status":"Completed"}"#)
            .into_changes()
            .expect("name is present");
        assert_eq!(fields.status, "Completed");
    }

    #[test]
    fn update_stores_an_explicit_empty_status_as_given() {
        let changes = body(r#"{"name":"Nikos","status":""}"#)
            .into_changes()
            .expect("name is present");
        assert_eq!(changes.status, "");
    }

    #[test]
    fn update_defaults_an_absent_status_and_blanks_the_rest() {
        let changes = body(r#"{"name":"Nikos","delivery_date":"2025-03-14"}"#)
            .into_changes()
            .expect("name is present");
        assert_eq!(changes.name, "Nikos");
        assert_eq!(changes.status, PENDING_STATUS);
        assert_eq!(changes.email, "");
        assert!(changes.delivery_date.is_some());
    }

    #[test]
    fn delete_failures_name_the_step_that_failed() {
        assert_eq!(
            delete_error_context(&crm_db::Error::DeleteRooms(
                diesel::result::Error::RollbackTransaction
            )),
            "Error deleting customer rooms"
        );
        assert_eq!(
            delete_error_context(&crm_db::Error::DeleteCustomer(
                diesel::result::Error::RollbackTransaction
            )),
            "Error deleting customer"
        );
    }

    #[test]
    fn delete_failures_outside_the_customer_step_blame_the_rooms_step() {
        assert_eq!(
            delete_error_context(&crm_db::Error::GetConnectionPool(mobc::Error::Timeout)),
            "Error deleting customer rooms"
        );
        assert_eq!(
            delete_error_context(&crm_db::Error::Result(
                diesel::result::Error::AlreadyInTransaction
            )),
            "Error deleting customer rooms"
        );
    }

    #[test]
    fn delivery_date_accepts_dates_timestamps_and_blanks() {
        assert_eq!(
            body(r#"{"delivery_date":"2025-03-14"}"#).delivery_date,
            Some(jiff::civil::date(2025, 3, 14))
        );
        assert_eq!(
            body(r#"{"delivery_date":"2025-03-14T22:00:00.000Z"}"#).delivery_date,
            Some(jiff::civil::date(2025, 3, 14))
        );
        assert_eq!(body(r#"{"delivery_date":""}"#).delivery_date, None);
        assert_eq!(body(r#"{"delivery_date":null}"#).delivery_date, None);
    }

    #[test]
    fn delivery_date_rejects_garbage() {
        assert!(serde_json::from_str::<CustomerBody>(r#"{"delivery_date":"soon"}"#).is_err());
    }
}
