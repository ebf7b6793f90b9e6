// ==========================================
// 锯木厂经营管理系统 - 配置管理器
// ==========================================
// 职责: 业务常量的加载、查询、覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use anyhow::{anyhow, Context};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::domain::types::{format_datetime, now_naive};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("锁获取失败: {}", e))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value, format_datetime(&now_naive())],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 读取配置原值，未覆写时取 `config_keys::DEFAULTS`
    fn get_or_default_raw(&self, key: &str) -> anyhow::Result<String> {
        match self.get_global_config_value(key)? {
            Some(raw) => Ok(raw),
            None => config_keys::default_value(key)
                .map(str::to_string)
                .ok_or_else(|| anyhow!("配置项 {} 没有默认值", key)),
        }
    }

    /// 读取并解析配置
    fn get_parsed<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get_or_default_raw(key)?;
        raw.trim()
            .parse::<T>()
            .map_err(|e| anyhow!("配置项 {} 解析失败: {} (value={})", key, e, raw))
    }

    /// 所有 global 配置（默认值 + 已覆写值）
    pub fn get_config_snapshot(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let mut snapshot: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("读取配置快照失败")?;

        snapshot.extend(rows);
        Ok(snapshot)
    }

    // ==========================================
    // 报价
    // ==========================================

    /// 固定单价（FlatRateStrategy）
    pub fn flat_rate(&self) -> anyhow::Result<f64> {
        self.get_parsed(config_keys::FLAT_RATE)
    }

    /// 预期利润率（FlatRateStrategy）
    pub fn profit_margin(&self) -> anyhow::Result<f64> {
        self.get_parsed(config_keys::PROFIT_MARGIN)
    }

    /// 体积定价基准价（VolumeGradeStrategy）
    pub fn volume_base_price(&self) -> anyhow::Result<f64> {
        self.get_parsed(config_keys::VOLUME_BASE_PRICE)
    }

    // ==========================================
    // 库存
    // ==========================================

    pub fn raw_low_stock_threshold(&self) -> anyhow::Result<i64> {
        self.get_parsed(config_keys::RAW_LOW_STOCK_THRESHOLD)
    }

    pub fn finished_low_stock_threshold(&self) -> anyhow::Result<i64> {
        self.get_parsed(config_keys::FINISHED_LOW_STOCK_THRESHOLD)
    }

    // ==========================================
    // 备份 / 下料
    // ==========================================

    pub fn backup_admin_email(&self) -> anyhow::Result<String> {
        self.get_or_default_raw(config_keys::BACKUP_ADMIN_EMAIL)
    }

    pub fn cutting_waste_ratio(&self) -> anyhow::Result<f64> {
        self.get_parsed(config_keys::CUTTING_WASTE_RATIO)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 报价
    pub const FLAT_RATE: &str = "pricing.flat_rate";
    pub const PROFIT_MARGIN: &str = "pricing.profit_margin";
    pub const VOLUME_BASE_PRICE: &str = "pricing.volume_base_price";

    // 库存阈值
    pub const RAW_LOW_STOCK_THRESHOLD: &str = "inventory.raw_low_stock_threshold";
    pub const FINISHED_LOW_STOCK_THRESHOLD: &str = "inventory.finished_low_stock_threshold";

    // 备份
    pub const BACKUP_ADMIN_EMAIL: &str = "backup.admin_email";

    // 下料
    pub const CUTTING_WASTE_RATIO: &str = "cutting.waste_ratio";

    /// 默认值表
    pub const DEFAULTS: &[(&str, &str)] = &[
        (FLAT_RATE, "2.5"),
        (PROFIT_MARGIN, "0.2"),
        (VOLUME_BASE_PRICE, "50.0"),
        (RAW_LOW_STOCK_THRESHOLD, "10"),
        (FINISHED_LOW_STOCK_THRESHOLD, "5"),
        (BACKUP_ADMIN_EMAIL, "system_admin@example.com"),
        (CUTTING_WASTE_RATIO, "0.05"),
    ];

    /// 查默认值表
    pub fn default_value(key: &str) -> Option<&'static str> {
        DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn manager() -> ConfigManager {
        ConfigManager::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_默认值() {
        let cm = manager();
        assert_eq!(cm.flat_rate().unwrap(), 2.5);
        assert_eq!(cm.profit_margin().unwrap(), 0.2);
        assert_eq!(cm.volume_base_price().unwrap(), 50.0);
        assert_eq!(cm.raw_low_stock_threshold().unwrap(), 10);
        assert_eq!(cm.finished_low_stock_threshold().unwrap(), 5);
        assert_eq!(cm.backup_admin_email().unwrap(), "system_admin@example.com");
        assert_eq!(cm.cutting_waste_ratio().unwrap(), 0.05);
    }

    #[test]
    fn test_默认值表查找() {
        assert_eq!(config_keys::default_value(config_keys::FLAT_RATE), Some("2.5"));
        assert_eq!(config_keys::default_value("pricing.unknown"), None);
        // 每个默认值都能被对应 getter 解析
        let cm = manager();
        assert!(cm.get_parsed::<f64>(config_keys::PROFIT_MARGIN).is_ok());
        assert!(cm.get_parsed::<f64>("pricing.unknown").is_err());
    }

    #[test]
    fn test_覆写与快照() {
        let cm = manager();
        cm.set_global_config_value(config_keys::FLAT_RATE, "3.0").unwrap();
        cm.set_global_config_value(config_keys::FLAT_RATE, "3.5").unwrap();
        assert_eq!(cm.flat_rate().unwrap(), 3.5);

        let snapshot = cm.get_config_snapshot().unwrap();
        assert_eq!(snapshot.get(config_keys::FLAT_RATE).map(String::as_str), Some("3.5"));
        assert_eq!(snapshot.len(), config_keys::DEFAULTS.len());
    }

    #[test]
    fn test_非法值报错() {
        let cm = manager();
        cm.set_global_config_value(config_keys::RAW_LOW_STOCK_THRESHOLD, "ten")
            .unwrap();
        let err = cm.raw_low_stock_threshold().unwrap_err();
        assert!(err.to_string().contains(config_keys::RAW_LOW_STOCK_THRESHOLD));
    }
}
