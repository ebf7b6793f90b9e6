// ==========================================
// 锯木厂经营管理系统 - 库存管理 API
// ==========================================
// 职责: 原材料 / 成品库存的增删改查
// 种类分派: InventoryKind 查找表
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, require_non_negative};
use crate::config::ConfigManager;
use crate::domain::inventory::{FinishedProduct, InventoryItem, RawMaterial};
use crate::domain::types::{Dimensions, InventoryKind, StockStatus};
use crate::repository::InventoryRepository;

/// 新增库存入参
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInventoryItem {
    /// "rawmaterial" / "finishedproduct"（大小写不敏感）
    pub item_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    pub unit: String,
    /// 类型标签，缺省时沿用 item_type
    #[serde(default)]
    pub type_label: Option<String>,
    /// 成品等级
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddInventoryItemResponse {
    pub item_id: String,
    pub item_type: InventoryKind,
    pub message: String,
}

/// 库存列表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryListEntry {
    pub item_id: String,
    pub item_type: InventoryKind,
    pub type_label: String,
    pub quantity: i64,
    pub unit: String,
    pub grade: Option<String>,
    pub dimensions: Option<String>,
    pub status: StockStatus,
}

impl From<&InventoryItem> for InventoryListEntry {
    fn from(item: &InventoryItem) -> Self {
        Self {
            item_id: item.id().to_string(),
            item_type: item.kind(),
            type_label: item.type_label().to_string(),
            quantity: item.quantity(),
            unit: item.unit().to_string(),
            grade: item.grade().map(|g| g.to_string()),
            dimensions: item.dimensions().map(|d| d.to_string()),
            status: StockStatus::of_quantity(item.quantity()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedItem {
    pub item_id: String,
    pub quantity: i64,
    pub dimensions: Option<String>,
    pub item_type: InventoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInventoryResponse {
    pub success: bool,
    pub updated_item: Option<UpdatedItem>,
}

/// 删除结果；status 为 HTTP 语义码 (200/400/404/500)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteInventoryResponse {
    pub message: String,
    pub deleted_item_id: Option<String>,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStockRow {
    #[serde(rename = "type")]
    pub material_type: String,
    pub quantity: i64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedStockRow {
    #[serde(rename = "type")]
    pub product_type: String,
    pub quantity: i64,
    pub unit: String,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryListing {
    pub raw_materials: Vec<RawStockRow>,
    pub finished_products: Vec<FinishedStockRow>,
}

// ==========================================
// InventoryApi - 库存管理 API
// ==========================================
pub struct InventoryApi {
    inventory_repo: Arc<InventoryRepository>,
    config: Arc<ConfigManager>,
}

impl InventoryApi {
    pub fn new(inventory_repo: Arc<InventoryRepository>, config: Arc<ConfigManager>) -> Self {
        Self {
            inventory_repo,
            config,
        }
    }

    /// 新增库存
    ///
    /// # 返回
    /// - Err(ApiError::UnsupportedType): 类型既不是原材料也不是成品
    #[instrument(skip(self))]
    pub fn add_inventory_item(&self, item: &NewInventoryItem) -> ApiResult<AddInventoryItemResponse> {
        let kind = InventoryKind::from_type_name(&item.item_type).ok_or_else(|| {
            ApiError::UnsupportedType(
                "Unsupported inventory type. Valid types are 'RawMaterial' and 'FinishedProduct'."
                    .to_string(),
            )
        })?;
        require_non_negative("数量", item.quantity)?;
        require_non_empty("单位", &item.unit)?;

        let label = item.type_label.as_deref().unwrap_or(&item.item_type);
        let dimensions = item.dimensions.map(|d| d.label());

        let item_id = match kind {
            InventoryKind::RawMaterial => {
                let raw = RawMaterial::new(label, item.quantity, &item.unit, dimensions.as_deref());
                self.inventory_repo.insert_raw(&raw)?;
                raw.raw_material_id
            }
            InventoryKind::FinishedProduct => {
                let fin = FinishedProduct::new(
                    label,
                    item.quantity,
                    &item.unit,
                    item.grade.as_deref(),
                    dimensions.as_deref(),
                );
                self.inventory_repo.insert_finished(&fin)?;
                fin.finished_product_id
            }
        };

        tracing::info!(%item_id, kind = %kind, "库存已新增");
        Ok(AddInventoryItemResponse {
            item_id,
            item_type: kind,
            message: format!("{} successfully added to inventory.", item.item_type),
        })
    }

    /// 按 ID 在两张表中查找
    pub fn get_inventory_item(&self, item_id: &str) -> ApiResult<InventoryItem> {
        require_non_empty("库存ID", item_id)?;
        self.inventory_repo
            .find_any(item_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Inventory item(id={})不存在", item_id)))
    }

    /// 库存列表（按种类 / 状态过滤）
    ///
    /// low-stock 阈值按种类区分：原材料 / 成品各自取配置值
    pub fn get_inventory_list(
        &self,
        item_type: Option<&str>,
        status: Option<&str>,
    ) -> ApiResult<Vec<InventoryListEntry>> {
        let kinds: Vec<InventoryKind> = match item_type {
            Some(t) => vec![InventoryKind::from_type_name(t)
                .ok_or_else(|| ApiError::InvalidInput(format!("未知库存类型: {}", t)))?],
            None => InventoryKind::ALL.to_vec(),
        };
        let status = status
            .map(|s| {
                StockStatus::parse(s)
                    .ok_or_else(|| ApiError::InvalidInput(format!("未知库存状态: {}", s)))
            })
            .transpose()?;

        let mut items: Vec<InventoryItem> = Vec::new();
        for kind in kinds {
            match kind {
                InventoryKind::RawMaterial => items.extend(
                    self.inventory_repo
                        .list_raw(None)?
                        .into_iter()
                        .map(InventoryItem::RawMaterial),
                ),
                InventoryKind::FinishedProduct => items.extend(
                    self.inventory_repo
                        .list_finished(None)?
                        .into_iter()
                        .map(InventoryItem::FinishedProduct),
                ),
            }
        }

        if let Some(status) = status {
            let raw_threshold = self.config.raw_low_stock_threshold()?;
            let finished_threshold = self.config.finished_low_stock_threshold()?;
            items.retain(|item| {
                let threshold = match item.kind() {
                    InventoryKind::RawMaterial => raw_threshold,
                    InventoryKind::FinishedProduct => finished_threshold,
                };
                status.matches(item.quantity(), threshold)
            });
        }

        Ok(items.iter().map(InventoryListEntry::from).collect())
    }

    /// 更新库存数量
    ///
    /// 按 item_type 前缀选表，未命中时再查另一张表；
    /// dimensions 只对成品生效
    #[instrument(skip(self))]
    pub fn update_inventory_item(
        &self,
        item_id: &str,
        quantity: i64,
        dimensions: Option<Dimensions>,
        item_type: &str,
    ) -> ApiResult<UpdateInventoryResponse> {
        require_non_negative("数量", quantity)?;

        let preferred = InventoryKind::from_prefix(item_type);
        let kind = if self.inventory_repo.find(preferred, item_id)?.is_some() {
            preferred
        } else if self.inventory_repo.find(preferred.other(), item_id)?.is_some() {
            tracing::debug!(item_id, from = %preferred, "库存ID位于另一张表");
            preferred.other()
        } else {
            tracing::warn!(item_id, "更新库存失败: 未找到");
            return Ok(UpdateInventoryResponse {
                success: false,
                updated_item: None,
            });
        };

        let dimensions = match kind {
            InventoryKind::FinishedProduct => dimensions.map(|d| d.label()),
            InventoryKind::RawMaterial => None,
        };
        self.inventory_repo
            .update_quantity(kind, item_id, quantity, dimensions.as_deref())?;

        let updated = self.inventory_repo.find(kind, item_id)?;
        Ok(UpdateInventoryResponse {
            success: true,
            updated_item: updated.map(|item| UpdatedItem {
                item_id: item.id().to_string(),
                quantity: item.quantity(),
                dimensions: item.dimensions().map(|d| d.to_string()),
                item_type: kind,
            }),
        })
    }

    /// 删除库存
    ///
    /// item_type 必须精确为 "RawMaterial" / "FinishedProduct"
    #[instrument(skip(self))]
    pub fn delete_inventory_item(&self, item_id: &str, item_type: &str) -> ApiResult<DeleteInventoryResponse> {
        let Some(kind) = InventoryKind::from_label(item_type) else {
            return Ok(DeleteInventoryResponse {
                message: "Invalid item type specified.".to_string(),
                deleted_item_id: None,
                status: 400,
            });
        };

        match self.inventory_repo.delete(kind, item_id) {
            Ok(0) => Ok(DeleteInventoryResponse {
                message: format!("No item found with ID {} in {}.", item_id, kind.display_name()),
                deleted_item_id: None,
                status: 404,
            }),
            Ok(_) => {
                tracing::info!(item_id, kind = %kind, "库存已删除");
                Ok(DeleteInventoryResponse {
                    message: format!("{} deleted successfully.", kind.display_name()),
                    deleted_item_id: Some(item_id.to_string()),
                    status: 200,
                })
            }
            Err(e) => {
                tracing::warn!(item_id, error = %e, "删除库存失败");
                Ok(DeleteInventoryResponse {
                    message: "Error during deletion process.".to_string(),
                    deleted_item_id: None,
                    status: 500,
                })
            }
        }
    }

    /// 两类库存的并列清单（各自按类型标签过滤）
    pub fn list_inventory(
        &self,
        material_type: Option<&str>,
        product_type: Option<&str>,
    ) -> ApiResult<InventoryListing> {
        let raw_materials = self
            .inventory_repo
            .list_raw(material_type)?
            .into_iter()
            .map(|r| RawStockRow {
                material_type: r.material_type,
                quantity: r.quantity,
                unit: r.unit,
            })
            .collect();
        let finished_products = self
            .inventory_repo
            .list_finished(product_type)?
            .into_iter()
            .map(|f| FinishedStockRow {
                product_type: f.product_type,
                quantity: f.quantity,
                unit: f.unit,
                grade: f.grade,
            })
            .collect();

        Ok(InventoryListing {
            raw_materials,
            finished_products,
        })
    }
}
