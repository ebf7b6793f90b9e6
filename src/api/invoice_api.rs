// ==========================================
// 锯木厂经营管理系统 - 发票 API
// ==========================================
// 职责: 汇总报价单开票；发票查询
// 金额: Σ(单价 × 数量)，开票时一次性计算
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::require_non_empty;
use crate::domain::invoice::{Invoice, InvoiceDetail};
use crate::repository::{CustomerRepository, InvoiceRepository, QuoteRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceResponse {
    pub invoice_id: String,
    pub customer_contact_id: String,
    pub total_amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

// ==========================================
// InvoiceApi - 发票 API
// ==========================================
pub struct InvoiceApi {
    invoice_repo: Arc<InvoiceRepository>,
    quote_repo: Arc<QuoteRepository>,
    customer_repo: Arc<CustomerRepository>,
}

impl InvoiceApi {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        quote_repo: Arc<QuoteRepository>,
        customer_repo: Arc<CustomerRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            quote_repo,
            customer_repo,
        }
    }

    /// 开票
    ///
    /// 逐个读取报价单并累加金额；任一报价单不存在即返回 NotFound
    #[instrument(skip(self))]
    pub fn create_invoice(
        &self,
        customer_id: &str,
        quote_ids: &[String],
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> ApiResult<CreateInvoiceResponse> {
        require_non_empty("客户ID", customer_id)?;
        if due_date < issue_date {
            return Err(ApiError::InvalidInput(format!(
                "到期日({})早于开票日({})",
                due_date, issue_date
            )));
        }
        if self.customer_repo.find_by_id(customer_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "CustomerContact(id={})不存在",
                customer_id
            )));
        }

        let mut total_amount = 0.0;
        for quote_id in quote_ids {
            let quote = self
                .quote_repo
                .find_with_estimates(quote_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Quote(id={})不存在", quote_id)))?;
            total_amount += quote.total();
        }

        let invoice = Invoice::new(customer_id, issue_date, due_date, total_amount);
        self.invoice_repo.insert(&invoice, quote_ids)?;

        tracing::info!(
            invoice_id = %invoice.invoice_id,
            customer_id,
            quotes = quote_ids.len(),
            total_amount,
            "发票已创建"
        );
        Ok(CreateInvoiceResponse {
            invoice_id: invoice.invoice_id,
            customer_contact_id: invoice.customer_id,
            total_amount: invoice.total_amount,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
        })
    }

    /// 发票详情（含客户与已开票报价ID）
    pub fn get_invoice(&self, invoice_id: &str) -> ApiResult<InvoiceDetail> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Invoice(id={})不存在", invoice_id)))?;

        let customer_contact = self.customer_repo.find_by_id(&invoice.customer_id)?;
        let quote_ids = self.invoice_repo.list_quote_ids(invoice_id)?;

        Ok(InvoiceDetail {
            invoice,
            customer_contact,
            quote_ids,
        })
    }
}
