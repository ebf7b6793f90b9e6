// ==========================================
// 锯木厂经营管理系统 - 性能观测
// ==========================================
// - SQLite trace/profile 回调: SQL 计数 + 慢 SQL 日志
// - CommandPerfGuard: 命令级耗时统计
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 开关环境变量
pub const ENV_PERF_SQL: &str = "SAWMILL_OPS_PERF_SQL";
/// 慢 SQL 阈值环境变量（毫秒）
pub const ENV_SLOW_SQL_MS: &str = "SAWMILL_OPS_SLOW_SQL_MS";

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static GUARD_DEPTH: Cell<u32> = Cell::new(0);
    static SQL_COUNT: Cell<u64> = Cell::new(0);
    static SLOW_SQL_COUNT: Cell<u64> = Cell::new(0);
}

/// SQL 观测设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlPerfSettings {
    pub enabled: bool,
    pub slow_sql_ms: u64,
}

impl SqlPerfSettings {
    /// 从环境变量读取（Debug 构建默认开启）
    pub fn from_env() -> Self {
        let enabled = match std::env::var(ENV_PERF_SQL) {
            Ok(v) => is_truthy(&v),
            Err(_) => cfg!(debug_assertions),
        };
        let slow_sql_ms = std::env::var(ENV_SLOW_SQL_MS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        Self {
            enabled,
            slow_sql_ms,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn shorten_sql(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars).collect();
    format!("{}…", head)
}

/// 在连接上安装 trace/profile 回调
pub fn install_sqlite_tracing(conn: &mut Connection, settings: SqlPerfSettings) {
    PERF_SQL_ENABLED.store(settings.enabled, Ordering::Relaxed);

    if !settings.enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);
    conn.trace(Some(on_sql_trace));
    conn.profile(Some(on_sql_profile));
}

fn guard_active() -> bool {
    GUARD_DEPTH.with(|d| d.get() > 0)
}

fn on_sql_trace(_sql: &str) {
    if PERF_SQL_ENABLED.load(Ordering::Relaxed) && guard_active() {
        SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn on_sql_profile(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    tracing::warn!(
        target: "slow_sql",
        duration_ms = ms,
        sql = %shorten_sql(sql, 400),
        "slow sql"
    );
    if guard_active() {
        SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 命令级性能统计 Guard（drop 时输出 elapsed_ms / sql_count / slow_sql_count）
///
/// ```ignore
/// let _perf = sawmill_ops::perf::CommandPerfGuard::new("create_invoice");
/// ```
pub struct CommandPerfGuard {
    command: String,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
}

impl CommandPerfGuard {
    pub fn new(command: impl Into<String>) -> Self {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            command: command.into(),
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
            slow_sql_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }

    /// 当前 guard 作用域内已执行的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        SQL_COUNT.with(|c| c.get()).saturating_sub(self.sql_start)
    }
}

impl Drop for CommandPerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = self.sql_count();
        let slow_sql_count = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_sql_start);

        tracing::info!(
            target: "perf",
            command = %self.command,
            elapsed_ms,
            sql_count,
            slow_sql_count,
            "done"
        );

        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(" 1 "));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_shorten_sql_多字节安全() {
        let sql = "SELECT   *\n FROM   customer_contact WHERE name = '张三李四王五'";
        let short = shorten_sql(sql, 50);
        assert!(short.starts_with("SELECT * FROM customer_contact"));
        assert!(short.ends_with('…'));
    }

    #[test]
    fn test_guard_统计sql条数() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing(
            &mut conn,
            SqlPerfSettings {
                enabled: true,
                slow_sql_ms: 10_000,
            },
        );

        let guard = CommandPerfGuard::new("test");
        conn.execute_batch("CREATE TABLE t (id INTEGER);").unwrap();
        conn.execute("INSERT INTO t (id) VALUES (1)", []).unwrap();
        assert!(guard.sql_count() >= 2);
    }
}
