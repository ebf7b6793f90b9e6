// ==========================================
// 锯木厂经营管理系统 - 命令行入口
// ==========================================
// 用法: sawmill-ops <command> [json-params]
// 成功结果输出到 stdout，错误 JSON 输出到 stderr
// ==========================================

use std::process::ExitCode;

use sawmill_ops::app::{dispatch, get_default_db_path, AppState, COMMANDS};

fn print_usage() {
    println!("{} v{}", sawmill_ops::APP_NAME, sawmill_ops::VERSION);
    println!();
    println!("用法: sawmill-ops <command> [json-params]");
    println!();
    println!("可用命令:");
    for command in COMMANDS {
        println!("  {}", command);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    sawmill_ops::logging::init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return ExitCode::SUCCESS;
    };
    if command == "help" || command == "--help" || command == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let params = match args.next() {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("参数不是合法 JSON: {}", e);
                return ExitCode::from(2);
            }
        },
        None => serde_json::Value::Null,
    };

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match dispatch(&state, &command, params).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
