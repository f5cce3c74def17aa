// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、CSV 测试文件、原始行构造
// ==========================================

#![allow(dead_code)]

use employee_directory::db::{init_schema, open_sqlite_connection};
use employee_directory::domain::{columns, RawRow};
use rusqlite::Connection;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};

/// 模板表头
pub const HEADER: &str = "会社名,姓,名,メールアドレス,部署,役職";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（已初始化 schema）
pub fn shared_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).unwrap();
    init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

/// 写入带模板表头的 CSV 文件
pub fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    write_raw(dir, name, &content)
}

/// 原样写入文件（用于表头异常等场景）
pub fn write_raw(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// 按模板列顺序构造原始行:
/// [会社名, 姓, 名, メールアドレス, 部署, 役職]
pub fn raw_row(row_number: usize, values: [&str; 6]) -> RawRow {
    let fields: HashMap<String, String> = columns::EXPECTED
        .iter()
        .zip(values.iter())
        .map(|(c, v)| (c.to_string(), v.to_string()))
        .collect();
    RawRow::new(row_number, fields)
}

/// 生成一行合法数据
pub fn valid_row(row_number: usize, company: &str, department: &str, email: &str) -> RawRow {
    raw_row(row_number, [company, "山田", "太郎", email, department, "主任"])
}
