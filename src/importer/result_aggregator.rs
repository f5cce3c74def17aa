// ==========================================
// 社員名簿管理 - 导入结果汇总
// ==========================================
// 优先级: 校验错误 > 解析错误 > 提交结果
// 所有错误均转换为 RowError，不向调用方抛出
// ==========================================

use crate::domain::{ImportResult, RowError};
use crate::i18n::{t_in, t_in_with_args};
use crate::importer::call_guard::Interruption;
use crate::importer::commit_coordinator::{CommitFailure, CommitOutcome};
use crate::importer::error::{ImportError, ResolutionError};

/// 汇总各阶段结果
///
/// # 参数
/// - validation_errors: 行级校验错误（非空时忽略后续阶段）
/// - resolution_error: 会社/部署解析失败
/// - commit_outcome: 提交结果；未到达提交阶段时为 None
/// - total_rows: 解析出的数据行数（与成败无关）
pub fn aggregate(
    mut validation_errors: Vec<RowError>,
    resolution_error: Option<&ResolutionError>,
    commit_outcome: Option<&CommitOutcome>,
    total_rows: usize,
    locale: &str,
) -> ImportResult {
    if !validation_errors.is_empty() {
        validation_errors.sort_by_key(|e| e.row_number);
        return ImportResult::failed(total_rows, validation_errors);
    }

    if let Some(err) = resolution_error {
        return ImportResult::batch_failure(total_rows, err.user_message(locale));
    }

    match commit_outcome {
        Some(CommitOutcome::Committed { .. }) => ImportResult::succeeded(total_rows),
        Some(CommitOutcome::Failed(failure)) => {
            ImportResult::batch_failure(total_rows, failure.user_message(locale))
        }
        // 未提交即结束只可能是取消
        None => ImportResult::batch_failure(
            total_rows,
            CommitFailure::Interrupted(Interruption::Cancelled).user_message(locale),
        ),
    }
}

/// 结构性错误（文件不可读 / 表头不符）
///
/// total_rows: 已解析出的数据行数；文件不可读时为 0
pub fn structural_failure(total_rows: usize, err: &ImportError, locale: &str) -> ImportResult {
    ImportResult::batch_failure(total_rows, err.user_message(locale))
}

/// 成功时的摘要消息（CLI 输出用）
pub fn summary(result: &ImportResult, locale: &str) -> String {
    if result.success {
        t_in_with_args(
            locale,
            "import.imported_rows",
            &[("count", &result.total_rows.to_string())],
        )
    } else {
        t_in(locale, "common.failure")
    }
}
