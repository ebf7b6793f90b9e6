use serde::Deserialize;

use crate::app::state::AppState;

use super::common::{parse_date, run_blocking};

// ==========================================
// 发票相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub customer_id: String,
    pub quote_ids: Vec<String>,
    /// YYYY-MM-DD
    pub issue_date: String,
    /// YYYY-MM-DD
    pub due_date: String,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceIdRequest {
    pub invoice_id: String,
}

pub async fn create_invoice(state: &AppState, req: CreateInvoiceRequest) -> Result<String, String> {
    let issue_date = parse_date(&req.issue_date)?;
    let due_date = parse_date(&req.due_date)?;

    let api = state.invoice_api.clone();
    run_blocking("cmd.create_invoice", move || {
        api.create_invoice(&req.customer_id, &req.quote_ids, issue_date, due_date)
    })
    .await
}

pub async fn get_invoice(state: &AppState, req: InvoiceIdRequest) -> Result<String, String> {
    let api = state.invoice_api.clone();
    run_blocking("cmd.get_invoice", move || api.get_invoice(&req.invoice_id)).await
}
