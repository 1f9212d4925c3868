use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clientele::domain::{
    customer::{Customer, CustomerFields, CustomerId, CustomerRepository},
    Entity,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{access_error, not_found, rejection, ApiError};

#[derive(Clone)]
pub struct AppState {
    customers: Arc<dyn CustomerRepository>,
}

impl AppState {
    pub fn new(customers: impl CustomerRepository + 'static) -> Self {
        Self {
            customers: Arc::new(customers),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    message: &'static str,
    customer: Customer,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/customer", get(list_customers).post(create_customer))
        .route(
            "/customer/:id",
            get(find_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .with_state(state)
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state
        .customers
        .find_all()
        .await
        .map_err(|e| access_error("Failed to fetch customers", e))?;
    debug!("顧客一覧を取得: {}件", customers.len());
    Ok(Json(customers))
}

async fn find_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let Ok(id) = id.parse::<CustomerId>() else {
        return Err(not_found());
    };
    match state.customers.find_by_id(id).await {
        Ok(Some(customer)) => Ok(Json(customer)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(access_error("Failed to fetch customer", e)),
    }
}

async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerFields>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let Json(fields) = payload.map_err(|r| rejection("Failed to add customer.", r))?;
    info!("顧客データを受信: {:?}", fields);
    let customer = state
        .customers
        .create(fields)
        .await
        .map_err(|e| access_error("Failed to add customer.", e))?;
    info!("{} {} を登録", Customer::ENTITY_NAME, customer.id());
    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            message: "Customer added successfully.",
            customer,
        }),
    ))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerFields>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Ok(id) = id.parse::<CustomerId>() else {
        return Err(not_found());
    };
    let Json(fields) = payload.map_err(|r| rejection("Failed to update customer", r))?;
    match state.customers.update_by_id(id, fields).await {
        Ok(Some(customer)) => {
            info!("{} {} を更新", Customer::ENTITY_NAME, id);
            Ok(Json(CustomerResponse {
                message: "Customer updated successfully",
                customer,
            }))
        }
        Ok(None) => Err(not_found()),
        Err(e) => Err(access_error("Failed to update customer", e)),
    }
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Ok(id) = id.parse::<CustomerId>() else {
        return Err(not_found());
    };
    match state.customers.delete_by_id(id).await {
        Ok(Some(customer)) => {
            info!("{} {} を削除", Customer::ENTITY_NAME, id);
            Ok(Json(CustomerResponse {
                message: "Customer deleted successfully",
                customer,
            }))
        }
        Ok(None) => Err(not_found()),
        Err(e) => Err(access_error("Failed to delete customer", e)),
    }
}
