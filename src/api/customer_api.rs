// ==========================================
// 锯木厂经营管理系统 - 客户管理 API
// ==========================================
// 职责: 客户联系人 CRUD
// 约束: email / phone 唯一；删除与更新走软失败
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, OperationStatus};
use crate::domain::customer::CustomerContact;
use crate::domain::invoice::Invoice;
use crate::domain::pricing::QuoteWithEstimates;
use crate::repository::{CustomerRepository, InvoiceRepository, QuoteRepository};

pub const MSG_EMAIL_IN_USE: &str = "Email already in use.";
pub const MSG_PHONE_IN_USE: &str = "Phone number already in use.";
pub const MSG_CUSTOMER_NOT_FOUND: &str = "Customer not found.";
pub const MSG_CUSTOMER_DELETED: &str = "Customer successfully deleted.";

/// 客户详情（含报价单与发票）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: CustomerContact,
    pub quotes: Vec<QuoteWithEstimates>,
    pub invoices: Vec<Invoice>,
}

/// 更新结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCustomerResponse {
    pub success: bool,
    pub customer_id: String,
    pub updated_fields: Vec<String>,
    pub message: String,
}

// ==========================================
// CustomerApi - 客户管理 API
// ==========================================
pub struct CustomerApi {
    customer_repo: Arc<CustomerRepository>,
    quote_repo: Arc<QuoteRepository>,
    invoice_repo: Arc<InvoiceRepository>,
}

impl CustomerApi {
    pub fn new(
        customer_repo: Arc<CustomerRepository>,
        quote_repo: Arc<QuoteRepository>,
        invoice_repo: Arc<InvoiceRepository>,
    ) -> Self {
        Self {
            customer_repo,
            quote_repo,
            invoice_repo,
        }
    }

    /// 创建客户
    ///
    /// # 返回
    /// - Ok(CustomerContact): 新建的客户
    /// - Err(ApiError::UniquenessViolation): email 或 phone 已被占用（不写入）
    #[instrument(skip(self))]
    pub fn create_customer(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        address: Option<&str>,
    ) -> ApiResult<CustomerContact> {
        require_non_empty("客户名称", name)?;
        require_non_empty("邮箱", email)?;
        require_non_empty("电话", phone)?;

        if self.customer_repo.find_by_email(email)?.is_some() {
            return Err(ApiError::UniquenessViolation(MSG_EMAIL_IN_USE.to_string()));
        }
        if self.customer_repo.find_by_phone(phone)?.is_some() {
            return Err(ApiError::UniquenessViolation(MSG_PHONE_IN_USE.to_string()));
        }

        let customer = CustomerContact::new(name, email, phone, address);
        self.customer_repo.insert(&customer)?;

        tracing::info!(customer_id = %customer.customer_id, "客户已创建");
        Ok(customer)
    }

    /// 查询客户（含报价单、发票）
    pub fn get_customer(&self, customer_id: &str) -> ApiResult<CustomerDetail> {
        require_non_empty("客户ID", customer_id)?;

        let customer = self
            .customer_repo
            .find_by_id(customer_id)?
            .ok_or_else(|| ApiError::NotFound(format!("CustomerContact(id={})不存在", customer_id)))?;

        let quotes = self.quote_repo.list_by_customer(customer_id)?;
        let invoices = self.invoice_repo.list_by_customer(customer_id)?;

        Ok(CustomerDetail {
            customer,
            quotes,
            invoices,
        })
    }

    pub fn list_customers(&self) -> ApiResult<Vec<CustomerContact>> {
        Ok(self.customer_repo.list_all()?)
    }

    /// 更新客户，只写入实际变化的字段
    ///
    /// 客户不存在时返回 success=false；新 email/phone 与其他客户冲突时报错
    #[instrument(skip(self))]
    pub fn update_customer(
        &self,
        customer_id: &str,
        name: &str,
        email: &str,
        phone: &str,
        address: Option<&str>,
    ) -> ApiResult<UpdateCustomerResponse> {
        require_non_empty("客户名称", name)?;
        require_non_empty("邮箱", email)?;
        require_non_empty("电话", phone)?;

        let Some(mut customer) = self.customer_repo.find_by_id(customer_id)? else {
            tracing::warn!(customer_id, "更新客户失败: 客户不存在");
            return Ok(UpdateCustomerResponse {
                success: false,
                customer_id: customer_id.to_string(),
                updated_fields: Vec::new(),
                message: MSG_CUSTOMER_NOT_FOUND.to_string(),
            });
        };

        let updated_fields = customer.apply_changes(name, email, phone, address);

        if updated_fields.iter().any(|f| f == "email") {
            if let Some(other) = self.customer_repo.find_by_email(email)? {
                if other.customer_id != customer_id {
                    return Err(ApiError::UniquenessViolation(MSG_EMAIL_IN_USE.to_string()));
                }
            }
        }
        if updated_fields.iter().any(|f| f == "phone") {
            if let Some(other) = self.customer_repo.find_by_phone(phone)? {
                if other.customer_id != customer_id {
                    return Err(ApiError::UniquenessViolation(MSG_PHONE_IN_USE.to_string()));
                }
            }
        }

        if !updated_fields.is_empty() {
            self.customer_repo.update(&customer)?;
            tracing::info!(customer_id, fields = ?updated_fields, "客户已更新");
        }

        Ok(UpdateCustomerResponse {
            success: true,
            customer_id: customer_id.to_string(),
            message: if updated_fields.is_empty() {
                "No changes detected.".to_string()
            } else {
                "Customer updated successfully.".to_string()
            },
            updated_fields,
        })
    }

    /// 删除客户（软失败）
    #[instrument(skip(self))]
    pub fn delete_customer(&self, customer_id: &str) -> ApiResult<OperationStatus> {
        match self.customer_repo.delete(customer_id) {
            Ok(0) => Ok(OperationStatus::failed(MSG_CUSTOMER_NOT_FOUND)),
            Ok(_) => {
                tracing::info!(customer_id, "客户已删除");
                Ok(OperationStatus::ok(MSG_CUSTOMER_DELETED))
            }
            Err(e) => {
                tracing::warn!(customer_id, error = %e, "删除客户失败");
                Ok(OperationStatus::failed(format!(
                    "An error occurred while deleting the customer: {}",
                    e
                )))
            }
        }
    }
}
