// ==========================================
// 社員名簿管理 - 会社/部署解析器
// ==========================================
// 职责: 会社名 → CompanyId，(CompanyId, 部署名) → DepartmentId
// 流程: 批次缓存 → 存储查询 → 创建（唯一冲突时回查一次）
// 约束:
// - 严格顺序执行，同一批次内同名实体最多创建一次
// - 缓存生命周期 = 单次导入
// ==========================================

use crate::domain::{CompanyId, DepartmentId, ResolvedRefs, ValidatedRow};
use crate::importer::call_guard::CallGuard;
use crate::importer::error::ResolutionError;
use crate::repository::{CompanyStore, ConstraintCode, DepartmentStore, RepositoryError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// ResolutionStats - 解析统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub cache_hits: usize,
    pub store_lookups: usize,
    pub companies_created: usize,
    pub departments_created: usize,
    pub conflicts_recovered: usize,
}

// ==========================================
// ResolutionCache - 单次导入的解析缓存
// ==========================================
#[derive(Debug, Default)]
pub struct ResolutionCache {
    companies: HashMap<String, CompanyId>,
    departments: HashMap<(CompanyId, String), DepartmentId>,
    created_companies: Vec<CompanyId>,
    created_departments: Vec<DepartmentId>,
    stats: ResolutionStats,
}

impl ResolutionCache {
    /// 本次导入新建的会社（按创建顺序）
    pub fn created_companies(&self) -> &[CompanyId] {
        &self.created_companies
    }

    /// 本次导入新建的部署（按创建顺序）
    pub fn created_departments(&self) -> &[DepartmentId] {
        &self.created_departments
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }
}

// ==========================================
// ReferenceResolver
// ==========================================
pub struct ReferenceResolver<'a, C: ?Sized, D: ?Sized> {
    companies: &'a C,
    departments: &'a D,
    guard: &'a CallGuard,
    cache: ResolutionCache,
}

impl<'a, C, D> ReferenceResolver<'a, C, D>
where
    C: CompanyStore + ?Sized,
    D: DepartmentStore + ?Sized,
{
    pub fn new(companies: &'a C, departments: &'a D, guard: &'a CallGuard) -> Self {
        Self {
            companies,
            departments,
            guard,
            cache: ResolutionCache::default(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    /// 会社名 → CompanyId
    pub async fn resolve_company(&mut self, name: &str) -> Result<CompanyId, ResolutionError> {
        if let Some(id) = self.cache.companies.get(name) {
            self.cache.stats.cache_hits += 1;
            return Ok(id.clone());
        }

        self.cache.stats.store_lookups += 1;
        let found = self
            .guard
            .run(self.companies.find_by_name(name))
            .await?
            .map_err(ResolutionError::LookupFailed)?;

        let id = match found {
            Some(id) => {
                debug!(company_name = %name, company_id = %id, "复用已存在的会社");
                id
            }
            None => self.create_company(name).await?,
        };

        self.cache.companies.insert(name.to_string(), id.clone());
        Ok(id)
    }

    async fn create_company(&mut self, name: &str) -> Result<CompanyId, ResolutionError> {
        match self.guard.run(self.companies.create(name)).await? {
            Ok(id) => {
                info!(company_name = %name, company_id = %id, "创建会社");
                self.cache.stats.companies_created += 1;
                self.cache.created_companies.push(id.clone());
                Ok(id)
            }
            Err(e) if e.constraint_code() == ConstraintCode::UniqueViolation => {
                // 并发导入抢先创建了同名会社
                warn!(company_name = %name, "会社创建冲突，回查已存在记录");
                let found = self
                    .guard
                    .run(self.companies.find_by_name(name))
                    .await?
                    .map_err(ResolutionError::LookupFailed)?;
                match found {
                    Some(id) => {
                        self.cache.stats.conflicts_recovered += 1;
                        Ok(id)
                    }
                    None => Err(ResolutionError::CompanyCreateFailed {
                        name: name.to_string(),
                        source: e,
                    }),
                }
            }
            Err(e) => Err(ResolutionError::CompanyCreateFailed {
                name: name.to_string(),
                source: e,
            }),
        }
    }

    /// (CompanyId, 部署名) → DepartmentId
    pub async fn resolve_department(
        &mut self,
        company_id: &CompanyId,
        name: &str,
    ) -> Result<DepartmentId, ResolutionError> {
        let key = (company_id.clone(), name.to_string());
        if let Some(id) = self.cache.departments.get(&key) {
            self.cache.stats.cache_hits += 1;
            return Ok(id.clone());
        }

        self.cache.stats.store_lookups += 1;
        let found = self
            .guard
            .run(self.departments.find_by_company_and_name(company_id, name))
            .await?
            .map_err(ResolutionError::LookupFailed)?;

        let id = match found {
            Some(id) => id,
            None => self.create_department(company_id, name).await?,
        };

        self.cache.departments.insert(key, id.clone());
        Ok(id)
    }

    async fn create_department(
        &mut self,
        company_id: &CompanyId,
        name: &str,
    ) -> Result<DepartmentId, ResolutionError> {
        let failed = |source: RepositoryError| ResolutionError::DepartmentCreateFailed {
            company_id: company_id.to_string(),
            name: name.to_string(),
            source,
        };

        match self.guard.run(self.departments.create(company_id, name)).await? {
            Ok(id) => {
                info!(company_id = %company_id, department_name = %name, department_id = %id, "创建部署");
                self.cache.stats.departments_created += 1;
                self.cache.created_departments.push(id.clone());
                Ok(id)
            }
            Err(e) if e.constraint_code() == ConstraintCode::UniqueViolation => {
                warn!(company_id = %company_id, department_name = %name, "部署创建冲突，回查已存在记录");
                let found = self
                    .guard
                    .run(self.departments.find_by_company_and_name(company_id, name))
                    .await?
                    .map_err(ResolutionError::LookupFailed)?;
                match found {
                    Some(id) => {
                        self.cache.stats.conflicts_recovered += 1;
                        Ok(id)
                    }
                    None => Err(failed(e)),
                }
            }
            Err(e) => Err(failed(e)),
        }
    }

    /// 解析单行的外键
    pub async fn resolve(&mut self, row: &ValidatedRow) -> Result<ResolvedRefs, ResolutionError> {
        let company_id = self.resolve_company(&row.company_name).await?;
        let department_id = match row.department_name.as_deref() {
            Some(name) => Some(self.resolve_department(&company_id, name).await?),
            None => None,
        };

        Ok(ResolvedRefs {
            company_id,
            department_id,
        })
    }

    /// 按行顺序解析整批；首个失败即终止
    pub async fn resolve_all(
        &mut self,
        rows: &[ValidatedRow],
    ) -> Result<Vec<ResolvedRefs>, ResolutionError> {
        let mut refs = Vec::with_capacity(rows.len());
        for row in rows {
            self.guard.check()?;
            match self.resolve(row).await {
                Ok(r) => refs.push(r),
                Err(e) => {
                    warn!(row_number = row.row_number, error = %e, "会社/部署解析失败，终止批次");
                    return Err(e);
                }
            }
        }

        let stats = self.cache.stats;
        info!(
            rows = rows.len(),
            cache_hits = stats.cache_hits,
            store_lookups = stats.store_lookups,
            companies_created = stats.companies_created,
            departments_created = stats.departments_created,
            "会社/部署解析完成"
        );

        Ok(refs)
    }
}
