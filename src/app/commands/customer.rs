use serde::Deserialize;

use crate::app::state::AppState;

use super::common::run_blocking;

// ==========================================
// 客户相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerIdRequest {
    pub customer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn create_customer(state: &AppState, req: CreateCustomerRequest) -> Result<String, String> {
    let api = state.customer_api.clone();
    run_blocking("cmd.create_customer", move || {
        api.create_customer(&req.name, &req.email, &req.phone, req.address.as_deref())
    })
    .await
}

pub async fn get_customer(state: &AppState, req: CustomerIdRequest) -> Result<String, String> {
    let api = state.customer_api.clone();
    run_blocking("cmd.get_customer", move || api.get_customer(&req.customer_id)).await
}

pub async fn list_customers(state: &AppState) -> Result<String, String> {
    let api = state.customer_api.clone();
    run_blocking("cmd.list_customers", move || api.list_customers()).await
}

pub async fn update_customer(state: &AppState, req: UpdateCustomerRequest) -> Result<String, String> {
    let api = state.customer_api.clone();
    run_blocking("cmd.update_customer", move || {
        api.update_customer(
            &req.customer_id,
            &req.name,
            &req.email,
            &req.phone,
            req.address.as_deref(),
        )
    })
    .await
}

pub async fn delete_customer(state: &AppState, req: CustomerIdRequest) -> Result<String, String> {
    let api = state.customer_api.clone();
    run_blocking("cmd.delete_customer", move || api.delete_customer(&req.customer_id)).await
}
