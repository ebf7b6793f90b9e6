// ==========================================
// 锯木厂经营管理系统 - 设备维护日志
// ==========================================

use crate::domain::types::now_naive;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub log_id: String,
    pub user_id: String,
    pub equipment_id: Option<String>,
    pub description: String,
    pub maintenance_date: NaiveDateTime,
    pub next_due_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MaintenanceLog {
    pub fn new(
        user_id: &str,
        equipment_id: Option<&str>,
        description: &str,
        maintenance_date: NaiveDateTime,
        next_due_date: NaiveDateTime,
    ) -> Self {
        let now = now_naive();
        Self {
            log_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            equipment_id: equipment_id.map(|e| e.to_string()),
            description: description.to_string(),
            maintenance_date,
            next_due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// 完工描述: 状态文本，附带备注时追加 "\nNotes: <notes>"
    pub fn completion_description(status: &str, notes: Option<&str>) -> String {
        match notes {
            Some(n) if !n.is_empty() => format!("{}\nNotes: {}", status, n),
            _ => status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_description() {
        assert_eq!(
            MaintenanceLog::completion_description("Completed", Some("blade swapped")),
            "Completed\nNotes: blade swapped"
        );
        assert_eq!(MaintenanceLog::completion_description("Completed", None), "Completed");
    }
}
