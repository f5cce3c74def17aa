// ==========================================
// 社員名簿管理 - 社员导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 表头检查 → 校验 → 会社/部署解析 → 组装 → 提交 → 汇总
// 约定: 预期内的失败一律转换为 ImportResult，不向调用方抛出
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{ImportResult, RawRow};
use crate::importer::batch_assembler::assemble_all;
use crate::importer::call_guard::CallGuard;
use crate::importer::commit_coordinator::{compensate, CommitCoordinator, CommitOutcome};
use crate::importer::employee_importer_trait::{EmployeeImporter, FileParser};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::reference_resolver::{ReferenceResolver, ResolutionCache};
use crate::importer::result_aggregator::{aggregate, structural_failure};
use crate::importer::row_validator::RowValidator;
use crate::repository::{CompanyStore, DepartmentStore, EmployeeStore};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// EmployeeImporterImpl - 社员导入器实现
// ==========================================
pub struct EmployeeImporterImpl<C, D, E>
where
    C: CompanyStore,
    D: DepartmentStore,
    E: EmployeeStore,
{
    // 数据访问层
    companies: C,
    departments: D,
    employees: E,

    // 配置快照（构造时确定）
    settings: ImportSettings,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    validator: RowValidator,
}

impl<C, D, E> EmployeeImporterImpl<C, D, E>
where
    C: CompanyStore,
    D: DepartmentStore,
    E: EmployeeStore,
{
    /// 创建导入器（使用通用文件解析器）
    pub fn new(companies: C, departments: D, employees: E, settings: ImportSettings) -> Self {
        Self::with_parser(
            companies,
            departments,
            employees,
            settings,
            Box::new(UniversalFileParser),
        )
    }

    /// 创建导入器（指定文件解析器）
    pub fn with_parser(
        companies: C,
        departments: D,
        employees: E,
        settings: ImportSettings,
        file_parser: Box<dyn FileParser>,
    ) -> Self {
        let validator = RowValidator::new(
            settings.message_locale.clone(),
            settings.error_delimiter.clone(),
        );
        Self {
            companies,
            departments,
            employees,
            settings,
            file_parser,
            validator,
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn companies(&self) -> &C {
        &self.companies
    }

    pub fn departments(&self) -> &D {
        &self.departments
    }

    pub fn employees(&self) -> &E {
        &self.employees
    }

    // ===== 流程主体 =====

    async fn run_pipeline(
        &self,
        import_id: &str,
        rows: Vec<RawRow>,
        cancel: CancellationToken,
    ) -> ImportResult {
        let locale = self.settings.message_locale.as_str();
        let total_rows = rows.len();

        if rows.is_empty() {
            info!(import_id = %import_id, "无数据行，跳过导入");
            return ImportResult::succeeded(0);
        }

        // === 步骤 1: 逐行校验 ===
        let (validated, validation_errors) = self.validator.validate_all(&rows);
        if !validation_errors.is_empty() {
            warn!(
                import_id = %import_id,
                invalid_rows = validation_errors.len(),
                total_rows,
                "行校验失败，终止导入"
            );
            return aggregate(validation_errors, None, None, total_rows, locale);
        }
        debug!(import_id = %import_id, rows = validated.len(), "行校验通过");

        // === 步骤 2: 会社/部署解析 ===
        let guard = CallGuard::new(self.settings.store_timeout, cancel);
        let mut resolver = ReferenceResolver::new(&self.companies, &self.departments, &guard);
        let resolved = resolver.resolve_all(&validated).await;
        let cache = resolver.into_cache();

        let refs = match resolved {
            Ok(refs) => refs,
            Err(e) => {
                error!(import_id = %import_id, error = %e, "会社/部署解析失败");
                self.compensate_if_enabled(import_id, &cache).await;
                return aggregate(Vec::new(), Some(&e), None, total_rows, locale);
            }
        };

        // === 步骤 3: 组装社员记录 ===
        let records = assemble_all(validated, refs);

        // === 步骤 4: 批量提交（已取消时不发起写入） ===
        let outcome = CommitCoordinator::new(&self.employees, &guard)
            .commit(&records)
            .await;

        if let CommitOutcome::Failed(failure) = &outcome {
            warn!(import_id = %import_id, failure = ?failure, "社员提交失败");
            self.compensate_if_enabled(import_id, &cache).await;
        }

        // === 步骤 5: 汇总 ===
        aggregate(Vec::new(), None, Some(&outcome), total_rows, locale)
    }

    async fn compensate_if_enabled(&self, import_id: &str, cache: &ResolutionCache) {
        if !self.settings.compensate_on_commit_failure {
            if !cache.created_companies().is_empty() || !cache.created_departments().is_empty() {
                info!(
                    import_id = %import_id,
                    companies = cache.created_companies().len(),
                    departments = cache.created_departments().len(),
                    "补偿未启用，保留本次新建的会社/部署"
                );
            }
            return;
        }

        compensate(
            &self.companies,
            &self.departments,
            cache.created_companies(),
            cache.created_departments(),
        )
        .await;
    }

    async fn import_rows_inner(&self, rows: Vec<RawRow>, cancel: CancellationToken) -> ImportResult {
        let import_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        info!(import_id = %import_id, rows = rows.len(), "开始导入社员数据");

        let result = self.run_pipeline(&import_id, rows, cancel).await;

        info!(
            import_id = %import_id,
            success = result.success,
            total_rows = result.total_rows,
            errors = result.errors.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "社员导入结束"
        );
        result
    }
}

#[async_trait]
impl<C, D, E> EmployeeImporter for EmployeeImporterImpl<C, D, E>
where
    C: CompanyStore,
    D: DepartmentStore,
    E: EmployeeStore,
{
    async fn import_rows(&self, rows: Vec<RawRow>) -> ImportResult {
        self.import_rows_inner(rows, CancellationToken::new()).await
    }

    async fn import_rows_with_cancel(
        &self,
        rows: Vec<RawRow>,
        cancel: CancellationToken,
    ) -> ImportResult {
        self.import_rows_inner(rows, cancel).await
    }

    async fn import_file(&self, file_path: &Path) -> ImportResult {
        self.import_file_with_cancel(file_path, CancellationToken::new())
            .await
    }

    #[instrument(skip(self, file_path, cancel), fields(file = %file_path.display()))]
    async fn import_file_with_cancel(
        &self,
        file_path: &Path,
        cancel: CancellationToken,
    ) -> ImportResult {
        let locale = self.settings.message_locale.as_str();

        // === 步骤 0: 解析文件 ===
        let table = match self.file_parser.parse(file_path) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "文件解析失败");
                return structural_failure(0, &e, locale);
            }
        };

        if let Err(e) = table.check_headers() {
            error!(error = %e, "表头检查失败");
            return structural_failure(table.rows.len(), &e, locale);
        }

        debug!(rows = table.rows.len(), "文件解析完成");
        self.import_rows_inner(table.rows, cancel).await
    }

    async fn batch_import(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult> {
        info!(files = file_paths.len(), "开始批量导入");
        let imports = file_paths.iter().map(|path| self.import_file(path));
        join_all(imports).await
    }
}
