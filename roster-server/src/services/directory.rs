//! 目录服务 - 公司与项目
//!
//! 公司、项目是变动申请引用的参考数据。启动时可从 JSON 种子文件导入：
//!
//! ```json
//! { "companies": [ { "name": "Acme", "projects": [ { "name": "Falcon" } ] } ] }
//! ```
//!
//! 导入按名称幂等，已存在的公司/项目会跳过。

use serde::Deserialize;
use std::path::Path;

use crate::db::Storage;
use crate::db::repository::{CompanyRepository, ProjectRepository, RepoError};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Company, CompanyId, Project};

/// 种子文件
#[derive(Debug, Deserialize)]
pub struct DirectorySeed {
    pub companies: Vec<SeedCompany>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCompany {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<SeedProject>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProject {
    pub name: String,
}

/// 导入结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub companies: usize,
    pub projects: usize,
}

#[derive(Clone)]
pub struct DirectoryService {
    companies: CompanyRepository,
    projects: ProjectRepository,
}

impl std::fmt::Debug for DirectoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryService").finish_non_exhaustive()
    }
}

impl DirectoryService {
    pub fn new(storage: Storage) -> Self {
        Self {
            companies: CompanyRepository::new(storage.clone()),
            projects: ProjectRepository::new(storage),
        }
    }

    pub fn list_companies(&self) -> AppResult<Vec<Company>> {
        Ok(self.companies.find_all()?)
    }

    pub fn get_company(&self, id: CompanyId) -> AppResult<Company> {
        self.companies.find_by_id(id)?.ok_or_else(|| company_not_found(id))
    }

    /// 某公司下的项目 (公司不存在返回 404)
    pub fn list_projects(&self, company_id: CompanyId) -> AppResult<Vec<Project>> {
        self.get_company(company_id)?;
        Ok(self.projects.find_by_company(company_id)?)
    }

    pub fn create_company(&self, name: &str) -> AppResult<Company> {
        let name = name.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        let company = self.companies.create(name).map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CompanyNameExists, msg),
            other => other.into(),
        })?;
        tracing::info!(company_id = company.id, name = %company.name, "Company created");
        Ok(company)
    }

    pub fn create_project(&self, company_id: CompanyId, name: &str) -> AppResult<Project> {
        let name = name.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        let project = self.projects.create(company_id, name).map_err(|e| match e {
            RepoError::NotFound(_) => company_not_found(company_id),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ProjectNameExists, msg),
            other => other.into(),
        })?;
        tracing::info!(
            project_id = project.id,
            company_id,
            name = %project.name,
            "Project created"
        );
        Ok(project)
    }

    /// 导入种子数据，已存在的名称跳过
    pub fn seed(&self, seed: &DirectorySeed) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        for entry in &seed.companies {
            let company = match self.companies.find_by_name(entry.name.trim())? {
                Some(existing) => existing,
                None => {
                    report.companies += 1;
                    self.create_company(&entry.name)?
                }
            };

            let existing = self.projects.find_all()?;
            for project in &entry.projects {
                if existing.iter().any(|p| p.name == project.name.trim()) {
                    continue;
                }
                self.create_project(company.id, &project.name)?;
                report.projects += 1;
            }
        }
        Ok(report)
    }

    /// 从 JSON 文件导入
    pub fn seed_from_file(&self, path: &Path) -> AppResult<SeedReport> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("Failed to read seed file {}: {}", path.display(), e),
            )
        })?;
        let seed: DirectorySeed = serde_json::from_str(&raw).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("Invalid seed file {}: {}", path.display(), e),
            )
        })?;
        self.seed(&seed)
    }
}

fn company_not_found(id: CompanyId) -> AppError {
    AppError::with_message(ErrorCode::CompanyNotFound, format!("Company {} not found", id))
        .with_detail("company_id", id)
}
