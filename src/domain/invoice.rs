// ==========================================
// 锯木厂经营管理系统 - 发票
// ==========================================
// total_amount 在开票时一次性计算，之后不再重算
// ==========================================

use crate::domain::customer::CustomerContact;
use crate::domain::types::now_naive;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub customer_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    pub fn new(
        customer_id: &str,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        total_amount: f64,
    ) -> Self {
        let now = now_naive();
        Self {
            invoice_id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            issue_date,
            due_date,
            total_amount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 发票详情（含客户与已开票报价）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub customer_contact: Option<CustomerContact>,
    pub quote_ids: Vec<String>,
}
