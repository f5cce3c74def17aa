// ==========================================
// 社員名簿管理 - 社员导入 Trait
// ==========================================
// 职责: 定义社员一括导入接口（不包含实现）
// ==========================================

use crate::domain::{ImportResult, RawRow};
use crate::importer::error::ParseResult;
use crate::importer::file_parser::ParsedTable;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 用途: 社员导入主接口
// 实现者: EmployeeImporterImpl
// 约定: 所有预期内的失败都体现在 ImportResult 中，不返回 Err
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 导入已解析的行
    ///
    /// # 导入流程（5个阶段）
    /// 1. 逐行校验（任一行失败则整批终止，报告全部行错误）
    /// 2. 会社/部署解析（批次内缓存，同名只创建一次）
    /// 3. 组装社员记录
    /// 4. 单次批量入库
    /// 5. 汇总结果
    async fn import_rows(&self, rows: Vec<RawRow>) -> ImportResult;

    /// 导入已解析的行（可取消）
    ///
    /// # 说明
    /// - 取消后不会发起社员入库，结果为批次级「キャンセル」错误
    async fn import_rows_with_cancel(
        &self,
        rows: Vec<RawRow>,
        cancel: CancellationToken,
    ) -> ImportResult;

    /// 从文件导入（.csv / .xlsx / .xls）
    ///
    /// # 说明
    /// - 文件无法解析或表头不符时，返回批次级结构错误，不进入校验
    async fn import_file(&self, file_path: &Path) -> ImportResult;

    /// 从文件导入（可取消）
    async fn import_file_with_cancel(
        &self,
        file_path: &Path,
        cancel: CancellationToken,
    ) -> ImportResult;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入相互独立，各自持有解析缓存
    /// - 返回顺序与输入顺序一致
    async fn batch_import(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（导入前置阶段）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行
    ///
    /// # 返回
    /// - Ok(ParsedTable): 表头与数据行（行号为文件行号）
    /// - Err: 文件读取错误、格式错误
    fn parse(&self, file_path: &Path) -> ParseResult<ParsedTable>;
}
