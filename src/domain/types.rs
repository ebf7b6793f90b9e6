// ==========================================
// 锯木厂经营管理系统 - 领域类型定义
// ==========================================
// 角色 / 库存种类 / 库存状态 / 维护排序键 / 规格尺寸
// 以及统一的时间格式
// ==========================================

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 时间格式
// ==========================================

/// 时间戳存储格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// 日期存储格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 当前本地时间（秒级精度）
pub fn now_naive() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// 解析时间戳，兼容纯日期（补 00:00:00）和 ISO `T` 分隔
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

// ==========================================
// 用户角色 (Role)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SystemAdministrator,
    MaintenanceManager,
    SalesManager,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdministrator => "SYSTEM_ADMINISTRATOR",
            Role::MaintenanceManager => "MAINTENANCE_MANAGER",
            Role::SalesManager => "SALES_MANAGER",
            Role::Operator => "OPERATOR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SYSTEM_ADMINISTRATOR" => Some(Role::SystemAdministrator),
            "MAINTENANCE_MANAGER" => Some(Role::MaintenanceManager),
            "SALES_MANAGER" => Some(Role::SalesManager),
            "OPERATOR" => Some(Role::Operator),
            _ => None,
        }
    }

    /// 是否允许查看维护日志列表
    pub fn can_view_maintenance(&self) -> bool {
        matches!(self, Role::SystemAdministrator | Role::MaintenanceManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 库存种类 (Inventory Kind)
// ==========================================
// 原材料 / 成品 两张表，通过查找表分派，不做字符串分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryKind {
    RawMaterial,
    FinishedProduct,
}

/// 归一化类型名 -> 种类
const INVENTORY_KIND_TABLE: &[(&str, InventoryKind)] = &[
    ("rawmaterial", InventoryKind::RawMaterial),
    ("finishedproduct", InventoryKind::FinishedProduct),
];

impl InventoryKind {
    pub const ALL: [InventoryKind; 2] = [InventoryKind::RawMaterial, InventoryKind::FinishedProduct];

    /// 大小写不敏感匹配 "rawmaterial" / "finishedproduct"
    pub fn from_type_name(name: &str) -> Option<Self> {
        let key = name.trim().to_lowercase();
        INVENTORY_KIND_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
    }

    /// 精确匹配 "RawMaterial" / "FinishedProduct"
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// 按前缀选表: "raw..." -> 原材料，其余 -> 成品
    pub fn from_prefix(type_hint: &str) -> Self {
        if type_hint.trim().to_lowercase().starts_with("raw") {
            InventoryKind::RawMaterial
        } else {
            InventoryKind::FinishedProduct
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InventoryKind::RawMaterial => "RawMaterial",
            InventoryKind::FinishedProduct => "FinishedProduct",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InventoryKind::RawMaterial => "Raw Material",
            InventoryKind::FinishedProduct => "Finished Product",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            InventoryKind::RawMaterial => InventoryKind::FinishedProduct,
            InventoryKind::FinishedProduct => InventoryKind::RawMaterial,
        }
    }
}

impl fmt::Display for InventoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in-stock" => Some(StockStatus::InStock),
            "low-stock" => Some(StockStatus::LowStock),
            "out-of-stock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }

    /// 判断数量是否满足该状态（low-stock 阈值按种类传入）
    pub fn matches(&self, quantity: i64, low_stock_threshold: i64) -> bool {
        match self {
            StockStatus::InStock => quantity > 0,
            StockStatus::LowStock => quantity <= low_stock_threshold,
            StockStatus::OutOfStock => quantity == 0,
        }
    }

    /// 单条库存的状态标签（只区分有货 / 无货）
    pub fn of_quantity(quantity: i64) -> Self {
        if quantity > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 维护日志排序键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceSortKey {
    Date,      // maintenance_date
    Equipment, // description
    Urgency,   // next_due_date
}

impl MaintenanceSortKey {
    /// 未知排序键返回 None（调用方忽略排序）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(MaintenanceSortKey::Date),
            "equipment" => Some(MaintenanceSortKey::Equipment),
            "urgency" => Some(MaintenanceSortKey::Urgency),
            _ => None,
        }
    }

    /// 对应的排序列
    pub fn column(&self) -> &'static str {
        match self {
            MaintenanceSortKey::Date => "maintenance_date",
            MaintenanceSortKey::Equipment => "description",
            MaintenanceSortKey::Urgency => "next_due_date",
        }
    }
}

// ==========================================
// 规格尺寸 (长 x 宽 x 高)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length: Some(length),
            width: Some(width),
            height: Some(height),
        }
    }

    /// 体积，缺失分量按 1 计
    pub fn volume(&self) -> f64 {
        self.length.unwrap_or(1.0) * self.width.unwrap_or(1.0) * self.height.unwrap_or(1.0)
    }

    /// 规范标签 `LxWxH`（如 "2x4x8"），缺失分量记为 1
    pub fn label(&self) -> String {
        format!(
            "{}x{}x{}",
            self.length.unwrap_or(1.0),
            self.width.unwrap_or(1.0),
            self.height.unwrap_or(1.0)
        )
    }

    /// 解析 `LxWxH` 标签
    pub fn parse(label: &str) -> Option<Self> {
        let parts: Vec<&str> = label.trim().split(|c| c == 'x' || c == 'X').collect();
        if parts.len() != 3 {
            return None;
        }
        let mut values = [0.0_f64; 3];
        for (slot, part) in values.iter_mut().zip(parts) {
            *slot = part.trim().parse().ok()?;
        }
        Some(Self::new(values[0], values[1], values[2]))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_kind_查找表() {
        assert_eq!(
            InventoryKind::from_type_name("RawMaterial"),
            Some(InventoryKind::RawMaterial)
        );
        assert_eq!(
            InventoryKind::from_type_name(" FINISHEDPRODUCT "),
            Some(InventoryKind::FinishedProduct)
        );
        assert_eq!(InventoryKind::from_type_name("Raw Material"), None);
        assert_eq!(InventoryKind::from_label("rawmaterial"), None);
        assert_eq!(InventoryKind::from_prefix("raw_oak"), InventoryKind::RawMaterial);
        assert_eq!(InventoryKind::from_prefix("plank"), InventoryKind::FinishedProduct);
    }

    #[test]
    fn test_stock_status_阈值边界() {
        assert!(StockStatus::LowStock.matches(10, 10));
        assert!(!StockStatus::LowStock.matches(11, 10));
        assert!(StockStatus::OutOfStock.matches(0, 10));
        assert!(!StockStatus::InStock.matches(0, 10));
        assert_eq!(StockStatus::parse("bogus"), None);
    }

    #[test]
    fn test_dimensions_标签() {
        let d = Dimensions::new(2.0, 4.0, 8.0);
        assert_eq!(d.label(), "2x4x8");
        assert_eq!(Dimensions::parse("2x4x8"), Some(d));
        assert_eq!(Dimensions::parse("2.5x4x8").map(|d| d.volume()), Some(80.0));
        assert_eq!(Dimensions::parse("2x4"), None);

        let partial = Dimensions {
            length: Some(3.0),
            width: None,
            height: None,
        };
        assert_eq!(partial.volume(), 3.0);
        assert_eq!(partial.label(), "3x1x1");
    }

    #[test]
    fn test_role_解析() {
        assert_eq!(Role::parse("maintenance_manager"), Some(Role::MaintenanceManager));
        assert_eq!(Role::parse("JANITOR"), None);
        assert!(Role::SystemAdministrator.can_view_maintenance());
        assert!(!Role::Operator.can_view_maintenance());
    }

    #[test]
    fn test_parse_datetime_兼容日期() {
        let dt = parse_datetime("2024-03-01").unwrap();
        assert_eq!(format_datetime(&dt), "2024-03-01 00:00:00");
        assert!(parse_datetime("2024-03-01T08:30:00").is_some());
        assert!(parse_datetime("not a date").is_none());
    }
}
