// ==========================================
// 社員名簿管理 - 命令行入口
// ==========================================
// 用法:
//   employee-directory [--db PATH] [--set KEY=VALUE]... FILE...
// 每个文件的 ImportResult 以 JSON 行输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{anyhow, Context};
use clap::Parser;
use employee_directory::config::ConfigManager;
use employee_directory::db::{default_db_path, init_schema, open_sqlite_connection};
use employee_directory::importer::result_aggregator::summary;
use employee_directory::{logging, ImportApi, APP_NAME, VERSION};
use futures::future::join_all;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// 社員名簿ファイルの一括インポート
#[derive(Parser, Debug)]
#[command(name = "employee-directory", version)]
struct Args {
    /// SQLite 数据库路径（默认: 用户数据目录）
    #[arg(long)]
    db: Option<String>,

    /// 导入前写入全局配置（可多次指定），例如 import_message_locale=en
    #[arg(long = "set", value_parser = parse_key_val)]
    settings: Vec<(String, String)>,

    /// 导入文件（.csv / .xlsx / .xls）
    #[arg(required = true)]
    files: Vec<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("期望 KEY=VALUE 格式: {}", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let db_path = args.db.unwrap_or_else(default_db_path);
    tracing::info!(app = APP_NAME, version = VERSION, db = %db_path, "启动");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("建表失败")?;
    let conn = Arc::new(Mutex::new(conn));

    if !args.settings.is_empty() {
        let config =
            ConfigManager::from_connection(conn.clone()).map_err(|e| anyhow!(e.to_string()))?;
        for (key, value) in &args.settings {
            config
                .set_global_config_value(key, value)
                .map_err(|e| anyhow!("写入配置 {} 失败: {}", key, e))?;
        }
    }

    let api = ImportApi::from_connection(conn).await?;
    let locale = api.settings().message_locale.clone();

    // Ctrl-C 取消尚未提交的导入
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("收到中断信号，取消导入");
                cancel.cancel();
            }
        });
    }

    let imports = args
        .files
        .iter()
        .map(|file| api.import_employees_with_cancel(file, cancel.clone()));
    let results = join_all(imports).await;

    let mut all_succeeded = true;
    for (file, result) in args.files.iter().zip(results) {
        match result {
            Ok(result) => {
                all_succeeded &= result.success;
                eprintln!("{}: {}", file, summary(&result, &locale));
                println!("{}", json!({ "file": file, "result": result }));
            }
            Err(e) => {
                all_succeeded = false;
                eprintln!("{}: {}", file, e);
                println!("{}", json!({ "file": file, "error": e.to_string() }));
            }
        }
    }

    if !all_succeeded {
        std::process::exit(1);
    }
    Ok(())
}
