//! 员工生命周期引擎
//!
//! 员工状态与变动申请的权威状态机。
//!
//! # 变动申请状态
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```
//!
//! `approved` / `rejected` 为终态，再次处理返回 409 (`ChangeAlreadyResolved`)。
//!
//! # 员工状态
//!
//! | 操作 | 入职 (onboard) | 调岗 (transfer) | 离职 (resign) |
//! |------|---------------|----------------|--------------|
//! | 提交 | 新建员工 `pending_change` | `active` → `pending_change` | `active` → `pending_change` |
//! | 批准 | → `active`，写入目标公司/项目 | → `active`，写入目标公司/项目 | → `resigned` |
//! | 驳回 | → `discarded` | → `active`，归属不变 | → `active`，归属不变 |
//!
//! 批准时员工的 `effective_date` 更新为申请的生效日期；批准和驳回都会清除
//! `pending_change_id`。
//!
//! # 并发
//!
//! 每次状态转换的读取、校验、写入都在同一个 redb 写事务内完成。写事务串行
//! 执行，所以同一申请被并发批准时只有一次成功，另一次看到终态并返回 409。

use chrono::NaiveDate;
use redb::WriteTransaction;
use std::collections::HashMap;

use crate::auth::CurrentUser;
use crate::db::repository::{ChangeRepository, EmployeeRepository, now_millis};
use crate::db::storage::{self, CHANGES_TABLE, COMPANIES_TABLE, EMPLOYEES_TABLE, PROJECTS_TABLE};
use crate::db::{Storage, StorageError};
use crate::security_log;
use crate::utils::validation::{MAX_EMPLOYEE_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::client::OnboardResponse;
use shared::models::{
    Assignment, ChangeId, ChangeKind, ChangeStatus, Company, CompanyId, Employee, EmployeeCreate,
    EmployeeId, EmployeeStatus, PendingChange, Project, ProjectId, ResignRequest,
    TransferRequest,
};

/// 员工生命周期服务
#[derive(Clone, Debug)]
pub struct LifecycleService {
    storage: Storage,
}

impl LifecycleService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    // ========== 查询 ==========

    /// 在岗 (`active`) 与待定 (`pending_change`) 员工，按 id 升序，按角色过滤
    pub fn list_active_employees(&self, caller: &CurrentUser) -> AppResult<Vec<Employee>> {
        let employees = EmployeeRepository::new(self.storage.clone()).find_on_roster()?;
        let pending: HashMap<ChangeId, PendingChange> =
            ChangeRepository::new(self.storage.clone())
                .find_unresolved()?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

        Ok(employees
            .into_iter()
            .filter(|e| {
                let change = e.pending_change_id.and_then(|id| pending.get(&id));
                caller.role.can_see_employee(e, change)
            })
            .collect())
    }

    /// 未处理的变动申请，按 id (创建顺序) 升序，按角色过滤
    pub fn list_pending_changes(&self, caller: &CurrentUser) -> AppResult<Vec<PendingChange>> {
        Ok(ChangeRepository::new(self.storage.clone())
            .find_unresolved()?
            .into_iter()
            .filter(|c| caller.role.can_see_change(c))
            .collect())
    }

    // ========== 提交 ==========

    /// 新员工入职：同时创建员工 (`pending_change`) 和入职申请
    pub fn onboard(&self, caller: &CurrentUser, req: EmployeeCreate) -> AppResult<OnboardResponse> {
        let name = req.name.trim().to_string();
        let position = req.position.trim().to_string();
        validate_required_text(&name, "name", MAX_EMPLOYEE_TEXT_LEN)?;
        validate_required_text(&position, "position", MAX_EMPLOYEE_TEXT_LEN)?;

        let txn = self.storage.begin_write()?;
        let destination = resolve_assignment(&txn, req.company_id, req.project_id)?;
        if !caller.role.covers(&destination) {
            return Err(out_of_scope(caller, "onboard", req.company_id));
        }

        let now = now_millis();
        let employee_id = storage::next_id(&txn, "employee")?;
        let change_id = storage::next_id(&txn, "change")?;

        let employee = Employee {
            id: employee_id,
            name: name.clone(),
            position,
            effective_date: req.hire_date,
            status: EmployeeStatus::PendingChange,
            company_id: None,
            project_id: None,
            creator_id: caller.id,
            pending_change_id: Some(change_id),
            created_at: now,
        };
        let change = PendingChange {
            id: change_id,
            kind: ChangeKind::Onboard,
            employee_id,
            employee_name: name,
            source: None,
            destination: Some(destination),
            effective_date: req.hire_date,
            status: ChangeStatus::Pending,
            creator_id: caller.id,
            created_at: now,
            resolved_at: None,
            resolved_by: None,
        };

        storage::put(&txn, EMPLOYEES_TABLE, employee.id, &employee)?;
        storage::put(&txn, CHANGES_TABLE, change.id, &change)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            change_id = change.id,
            employee_id = employee.id,
            kind = %change.kind,
            actor = caller.id,
            "Change submitted"
        );
        Ok(OnboardResponse { employee, change })
    }

    /// 提交调岗申请
    pub fn submit_transfer(
        &self,
        caller: &CurrentUser,
        employee_id: EmployeeId,
        req: TransferRequest,
    ) -> AppResult<PendingChange> {
        self.open_change(
            caller,
            employee_id,
            ChangeKind::Transfer,
            Some((req.new_company, req.new_project)),
            req.effective_date,
        )
    }

    /// 提交离职申请
    pub fn submit_resign(
        &self,
        caller: &CurrentUser,
        employee_id: EmployeeId,
        req: ResignRequest,
    ) -> AppResult<PendingChange> {
        self.open_change(caller, employee_id, ChangeKind::Resign, None, req.resign_date)
    }

    fn open_change(
        &self,
        caller: &CurrentUser,
        employee_id: EmployeeId,
        kind: ChangeKind,
        target: Option<(CompanyId, ProjectId)>,
        effective_date: NaiveDate,
    ) -> AppResult<PendingChange> {
        let txn = self.storage.begin_write()?;
        let mut employee = load_employee(&txn, employee_id)?;

        let outstanding: Option<PendingChange> = match employee.pending_change_id {
            Some(id) => storage::get(&txn, CHANGES_TABLE, id)?,
            None => None,
        };
        if !caller.role.can_see_employee(&employee, outstanding.as_ref()) {
            return Err(out_of_scope(caller, kind.as_str(), employee_id));
        }

        if !employee.status.is_on_roster() {
            return Err(AppError::with_message(
                ErrorCode::EmployeeInactive,
                format!("Employee {} is no longer on the roster", employee_id),
            )
            .with_detail("status", serde_json::to_value(employee.status).unwrap_or_default()));
        }
        if let Some(pending_id) = employee.pending_change_id {
            return Err(AppError::with_message(
                ErrorCode::EmployeeHasPendingChange,
                format!("Employee {} already has a pending change", employee_id),
            )
            .with_detail("change_id", pending_id));
        }

        let source = employee.assignment().ok_or_else(|| {
            AppError::internal(format!("Employee {} has no assignment", employee_id))
        })?;

        let destination = match target {
            Some((company_id, project_id)) => {
                let destination = resolve_assignment(&txn, company_id, Some(project_id))?;
                if destination == source {
                    return Err(AppError::new(ErrorCode::DestinationUnchanged)
                        .with_detail("company_id", company_id)
                        .with_detail("project_id", project_id));
                }
                Some(destination)
            }
            None => None,
        };

        let change = PendingChange {
            id: storage::next_id(&txn, "change")?,
            kind,
            employee_id,
            employee_name: employee.name.clone(),
            source: Some(source),
            destination,
            effective_date,
            status: ChangeStatus::Pending,
            creator_id: caller.id,
            created_at: now_millis(),
            resolved_at: None,
            resolved_by: None,
        };
        debug_assert!(change.is_well_formed());

        employee.status = EmployeeStatus::PendingChange;
        employee.pending_change_id = Some(change.id);

        storage::put(&txn, CHANGES_TABLE, change.id, &change)?;
        storage::put(&txn, EMPLOYEES_TABLE, employee.id, &employee)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            change_id = change.id,
            employee_id,
            kind = %change.kind,
            actor = caller.id,
            "Change submitted"
        );
        Ok(change)
    }

    // ========== 审批 ==========

    /// 批准：按申请类型更新员工
    pub fn approve(&self, caller: &CurrentUser, change_id: ChangeId) -> AppResult<PendingChange> {
        self.resolve(caller, change_id, ChangeStatus::Approved)
    }

    /// 驳回：员工归属不变 (入职申请的员工标记为 `discarded`)
    pub fn reject(&self, caller: &CurrentUser, change_id: ChangeId) -> AppResult<PendingChange> {
        self.resolve(caller, change_id, ChangeStatus::Rejected)
    }

    fn resolve(
        &self,
        caller: &CurrentUser,
        change_id: ChangeId,
        decision: ChangeStatus,
    ) -> AppResult<PendingChange> {
        let txn = self.storage.begin_write()?;
        let mut change: PendingChange = storage::get(&txn, CHANGES_TABLE, change_id)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ChangeNotFound,
                    format!("Change {} not found", change_id),
                )
            })?;

        if !caller.role.can_see_change(&change) {
            return Err(out_of_scope(caller, "resolve", change_id));
        }
        if change.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::ChangeAlreadyResolved,
                format!("Change {} has already been resolved", change_id),
            )
            .with_detail("status", serde_json::to_value(change.status).unwrap_or_default()));
        }

        let mut employee = load_employee(&txn, change.employee_id)?;
        if employee.pending_change_id != Some(change.id) {
            return Err(AppError::internal(format!(
                "Employee {} is not waiting on change {}",
                employee.id, change.id
            )));
        }

        apply_decision(&mut employee, &change, decision)?;

        change.status = decision;
        change.resolved_at = Some(now_millis());
        change.resolved_by = Some(caller.id);

        storage::put(&txn, EMPLOYEES_TABLE, employee.id, &employee)?;
        storage::put(&txn, CHANGES_TABLE, change.id, &change)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            change_id,
            employee_id = employee.id,
            kind = %change.kind,
            decision = ?decision,
            actor = caller.id,
            "Change resolved"
        );
        Ok(change)
    }
}

/// 把审批结果写到员工记录上
fn apply_decision(
    employee: &mut Employee,
    change: &PendingChange,
    decision: ChangeStatus,
) -> AppResult<()> {
    employee.status = match (decision, change.kind) {
        (ChangeStatus::Approved, ChangeKind::Onboard | ChangeKind::Transfer) => {
            let destination = change.destination.ok_or_else(|| {
                AppError::internal(format!("Change {} has no destination", change.id))
            })?;
            employee.company_id = Some(destination.company_id);
            employee.project_id = destination.project_id;
            employee.effective_date = change.effective_date;
            EmployeeStatus::Active
        }
        (ChangeStatus::Approved, ChangeKind::Resign) => {
            employee.effective_date = change.effective_date;
            EmployeeStatus::Resigned
        }
        (ChangeStatus::Rejected, ChangeKind::Onboard) => EmployeeStatus::Discarded,
        (ChangeStatus::Rejected, _) => EmployeeStatus::Active,
        (ChangeStatus::Pending, _) => {
            return Err(AppError::internal("Cannot resolve a change to pending"));
        }
    };
    employee.pending_change_id = None;
    Ok(())
}

fn load_employee(txn: &WriteTransaction, employee_id: EmployeeId) -> AppResult<Employee> {
    storage::get(txn, EMPLOYEES_TABLE, employee_id)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::EmployeeNotFound,
            format!("Employee {} not found", employee_id),
        )
    })
}

/// 校验公司/项目存在且项目属于该公司
fn resolve_assignment(
    txn: &WriteTransaction,
    company_id: CompanyId,
    project_id: Option<ProjectId>,
) -> AppResult<Assignment> {
    let company: Option<Company> = storage::get(txn, COMPANIES_TABLE, company_id)?;
    if company.is_none() {
        return Err(AppError::with_message(
            ErrorCode::CompanyNotFound,
            format!("Company {} not found", company_id),
        )
        .with_detail("company_id", company_id));
    }

    if let Some(project_id) = project_id {
        let project: Project = storage::get(txn, PROJECTS_TABLE, project_id)?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProjectNotFound,
                format!("Project {} not found", project_id),
            )
            .with_detail("project_id", project_id)
        })?;
        if project.company_id != company_id {
            return Err(AppError::with_message(
                ErrorCode::ProjectCompanyMismatch,
                format!(
                    "Project {} does not belong to company {}",
                    project_id, company_id
                ),
            )
            .with_detail("company_id", company_id)
            .with_detail("project_id", project_id));
        }
    }

    Ok(Assignment::new(company_id, project_id))
}

fn out_of_scope(caller: &CurrentUser, action: &str, target: i64) -> AppError {
    security_log!(
        "WARN",
        "out_of_scope",
        user_id = caller.id,
        user_role = caller.role.to_string(),
        action = action.to_string(),
        resource_id = target
    );
    AppError::out_of_scope(format!("{} is outside your scope", target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{CompanyRepository, ProjectRepository};
    use shared::models::Role;
    use std::sync::{Arc, Barrier};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn user(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            username: format!("user{id}"),
            role,
            jti: String::new(),
            exp: 0,
        }
    }

    /// Companies 1..=3, each with projects; company 3 = "Acme" with "Falcon" = project 9
    fn setup() -> (LifecycleService, Storage) {
        let storage = Storage::open_in_memory().unwrap();
        let companies = CompanyRepository::new(storage.clone());
        let projects = ProjectRepository::new(storage.clone());

        companies.create("Northwind").unwrap(); // 1
        companies.create("Globex").unwrap(); // 2
        companies.create("Acme").unwrap(); // 3
        for (company, name) in [
            (1, "Atlas"),   // 1
            (1, "Beacon"),  // 2
            (2, "Cobalt"),  // 3
            (2, "Delta"),   // 4
            (3, "Eagle"),   // 5
            (1, "Fjord"),   // 6
            (2, "Granite"), // 7
            (2, "Harbor"),  // 8
            (3, "Falcon"),  // 9
        ] {
            projects.create(company, name).unwrap();
        }
        (LifecycleService::new(storage.clone()), storage)
    }

    fn root() -> CurrentUser {
        user(1, Role::SuperAdmin)
    }

    /// Onboard and approve: an active employee at the given assignment
    fn hire(svc: &LifecycleService, name: &str, company: i64, project: i64) -> Employee {
        let created = svc
            .onboard(
                &root(),
                EmployeeCreate {
                    name: name.into(),
                    position: "Engineer".into(),
                    hire_date: date("2023-01-01"),
                    company_id: company,
                    project_id: Some(project),
                },
            )
            .unwrap();
        svc.approve(&root(), created.change.id).unwrap();
        EmployeeRepository::new(svc.storage.clone())
            .find_by_id(created.employee.id)
            .unwrap()
            .unwrap()
    }

    fn transfer_to(company: i64, project: i64, when: &str) -> TransferRequest {
        TransferRequest {
            new_company: company,
            new_project: project,
            effective_date: date(when),
        }
    }

    fn reload(storage: &Storage, id: EmployeeId) -> Employee {
        EmployeeRepository::new(storage.clone())
            .find_by_id(id)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_transfer_scenario() {
        let (svc, storage) = setup();
        let e101 = hire(&svc, "E101", 1, 1);

        let change = svc
            .submit_transfer(&root(), e101.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();
        assert_eq!(change.kind, ChangeKind::Transfer);
        assert_eq!(change.status, ChangeStatus::Pending);
        assert_eq!(change.source, Some(Assignment::new(1, Some(1))));
        assert_eq!(change.destination, Some(Assignment::new(3, Some(9))));
        assert!(change.is_well_formed());

        let waiting = reload(&storage, e101.id);
        assert_eq!(waiting.status, EmployeeStatus::PendingChange);
        assert_eq!(waiting.pending_change_id, Some(change.id));

        let approved = svc.approve(&root(), change.id).unwrap();
        assert_eq!(approved.status, ChangeStatus::Approved);
        assert_eq!(approved.resolved_by, Some(1));

        let moved = reload(&storage, e101.id);
        assert_eq!(moved.company_id, Some(3));
        assert_eq!(moved.project_id, Some(9));
        assert_eq!(moved.status, EmployeeStatus::Active);
        assert_eq!(moved.effective_date, date("2024-03-01"));
        assert!(!moved.has_pending_change());
    }

    #[test]
    fn test_terminal_changes_cannot_be_resolved_again() {
        let (svc, storage) = setup();
        let e = hire(&svc, "Ada", 1, 1);
        let change = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();
        svc.approve(&root(), change.id).unwrap();
        let after_first = reload(&storage, e.id);

        for second in [svc.approve(&root(), change.id), svc.reject(&root(), change.id)] {
            assert_eq!(second.unwrap_err().code, ErrorCode::ChangeAlreadyResolved);
        }
        assert_eq!(reload(&storage, e.id), after_first);

        let resign = svc
            .submit_resign(&root(), e.id, ResignRequest { resign_date: date("2024-06-30") })
            .unwrap();
        svc.reject(&root(), resign.id).unwrap();
        let err = svc.approve(&root(), resign.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::ChangeAlreadyResolved);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_project_must_belong_to_company() {
        let (svc, storage) = setup();
        let e = hire(&svc, "Ada", 1, 1);

        let err = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 4, "2024-03-01"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectCompanyMismatch);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        // Nothing was recorded
        assert!(!reload(&storage, e.id).has_pending_change());
        assert!(svc.list_pending_changes(&root()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_destination() {
        let (svc, _) = setup();
        let e = hire(&svc, "Ada", 1, 1);

        let err = svc
            .submit_transfer(&root(), e.id, transfer_to(42, 9, "2024-03-01"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CompanyNotFound);

        let err = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 99, "2024-03-01"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[test]
    fn test_transfer_to_current_assignment_rejected() {
        let (svc, _) = setup();
        let e = hire(&svc, "Ada", 3, 9);
        let err = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DestinationUnchanged);
    }

    #[test]
    fn test_second_pending_change_conflicts() {
        let (svc, _) = setup();
        let e = hire(&svc, "Ada", 1, 1);
        svc.submit_transfer(&root(), e.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();

        let err = svc
            .submit_resign(&root(), e.id, ResignRequest { resign_date: date("2024-04-01") })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeHasPendingChange);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err = svc
            .submit_transfer(&root(), e.id, transfer_to(2, 3, "2024-03-01"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeHasPendingChange);
        assert_eq!(svc.list_pending_changes(&root()).unwrap().len(), 1);
    }

    #[test]
    fn test_onboarding_round_trip() {
        let (svc, storage) = setup();
        let created = svc
            .onboard(
                &root(),
                EmployeeCreate {
                    name: "  Grace ".into(),
                    position: "Analyst".into(),
                    hire_date: date("2024-02-01"),
                    company_id: 3,
                    project_id: Some(9),
                },
            )
            .unwrap();
        assert_eq!(created.employee.name, "Grace");
        assert_eq!(created.employee.status, EmployeeStatus::PendingChange);
        assert_eq!(created.employee.company_id, None);
        assert_eq!(created.change.kind, ChangeKind::Onboard);
        assert!(created.change.is_well_formed());

        // Visible on the roster while waiting
        assert_eq!(svc.list_active_employees(&root()).unwrap().len(), 1);

        svc.approve(&root(), created.change.id).unwrap();
        let hired = reload(&storage, created.employee.id);
        assert_eq!(hired.status, EmployeeStatus::Active);
        assert_eq!(hired.assignment(), Some(Assignment::new(3, Some(9))));
        assert_eq!(hired.effective_date, date("2024-02-01"));
    }

    #[test]
    fn test_rejected_onboarding_is_discarded() {
        let (svc, storage) = setup();
        let created = svc
            .onboard(
                &root(),
                EmployeeCreate {
                    name: "Grace".into(),
                    position: "Analyst".into(),
                    hire_date: date("2024-02-01"),
                    company_id: 3,
                    project_id: None,
                },
            )
            .unwrap();
        svc.reject(&root(), created.change.id).unwrap();

        let discarded = reload(&storage, created.employee.id);
        assert_eq!(discarded.status, EmployeeStatus::Discarded);
        assert!(!discarded.has_pending_change());
        assert!(svc.list_active_employees(&root()).unwrap().is_empty());

        let err = svc
            .submit_resign(
                &root(),
                created.employee.id,
                ResignRequest { resign_date: date("2024-03-01") },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeInactive);
    }

    #[test]
    fn test_rejected_transfer_keeps_assignment() {
        let (svc, storage) = setup();
        let e = hire(&svc, "Ada", 1, 1);
        let change = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();
        svc.reject(&root(), change.id).unwrap();

        let after = reload(&storage, e.id);
        assert_eq!(after.status, EmployeeStatus::Active);
        assert_eq!(after.assignment(), Some(Assignment::new(1, Some(1))));
        assert_eq!(after.effective_date, e.effective_date);
        assert!(!after.has_pending_change());
    }

    #[test]
    fn test_resignation_approved() {
        let (svc, storage) = setup();
        let e = hire(&svc, "Ada", 1, 1);
        let change = svc
            .submit_resign(&root(), e.id, ResignRequest { resign_date: date("2024-06-30") })
            .unwrap();
        assert_eq!(change.destination, None);
        assert_eq!(change.source, Some(Assignment::new(1, Some(1))));

        svc.approve(&root(), change.id).unwrap();
        let gone = reload(&storage, e.id);
        assert_eq!(gone.status, EmployeeStatus::Resigned);
        assert_eq!(gone.effective_date, date("2024-06-30"));
        assert!(svc.list_active_employees(&root()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_ids() {
        let (svc, _) = setup();
        assert_eq!(
            svc.approve(&root(), 77).unwrap_err().code,
            ErrorCode::ChangeNotFound
        );
        assert_eq!(
            svc.submit_resign(&root(), 77, ResignRequest { resign_date: date("2024-01-01") })
                .unwrap_err()
                .code,
            ErrorCode::EmployeeNotFound
        );
    }

    #[test]
    fn test_company_scoping() {
        let (svc, _) = setup();
        let inside = hire(&svc, "Inside", 3, 5);
        let arriving = hire(&svc, "Arriving", 1, 1);
        let outside = hire(&svc, "Outside", 1, 2);
        let other = hire(&svc, "Other", 2, 3);

        let into_acme = svc
            .submit_transfer(&root(), arriving.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();
        let unrelated = svc
            .submit_transfer(&root(), outside.id, transfer_to(2, 4, "2024-03-01"))
            .unwrap();
        let leaving = svc
            .submit_resign(&root(), inside.id, ResignRequest { resign_date: date("2024-05-01") })
            .unwrap();

        let acme_admin = user(2, Role::CompanyAdmin { company_id: 3 });
        let ids: Vec<ChangeId> = svc
            .list_pending_changes(&acme_admin)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![into_acme.id, leaving.id]);
        assert!(!ids.contains(&unrelated.id));

        let roster: Vec<EmployeeId> = svc
            .list_active_employees(&acme_admin)
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        // Arriving through a pending transfer counts as in scope
        assert_eq!(roster, vec![inside.id, arriving.id]);
        assert!(!roster.contains(&outside.id));
        assert!(!roster.contains(&other.id));

        // All ids ascending for the super admin
        let all: Vec<ChangeId> = svc
            .list_pending_changes(&root())
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
        assert_eq!(all.len(), 3);

        let err = svc.approve(&acme_admin, unrelated.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfScope);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_project_lead_scope() {
        let (svc, _) = setup();
        let lead = user(3, Role::ProjectLead { project_id: 9 });
        let mine = hire(&svc, "Mine", 3, 9);
        let neighbour = hire(&svc, "Neighbour", 3, 5);

        let roster: Vec<EmployeeId> = svc
            .list_active_employees(&lead)
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(roster, vec![mine.id]);

        let err = svc
            .submit_resign(&lead, neighbour.id, ResignRequest { resign_date: date("2024-05-01") })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfScope);

        let err = svc
            .onboard(
                &lead,
                EmployeeCreate {
                    name: "New".into(),
                    position: "Engineer".into(),
                    hire_date: date("2024-05-01"),
                    company_id: 3,
                    project_id: Some(5),
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfScope);
    }

    #[test]
    fn test_onboard_validation() {
        let (svc, _) = setup();
        let blank = EmployeeCreate {
            name: " ".into(),
            position: "Engineer".into(),
            hire_date: date("2024-05-01"),
            company_id: 3,
            project_id: None,
        };
        assert_eq!(svc.onboard(&root(), blank).unwrap_err().code, ErrorCode::RequiredField);

        let mismatched = EmployeeCreate {
            name: "Ada".into(),
            position: "Engineer".into(),
            hire_date: date("2024-05-01"),
            company_id: 3,
            project_id: Some(1),
        };
        assert_eq!(
            svc.onboard(&root(), mismatched).unwrap_err().code,
            ErrorCode::ProjectCompanyMismatch
        );
        assert!(svc.list_active_employees(&root()).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_approvals_apply_once() {
        let (svc, storage) = setup();
        let e = hire(&svc, "Ada", 1, 1);
        let change = svc
            .submit_transfer(&root(), e.id, transfer_to(3, 9, "2024-03-01"))
            .unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let svc = svc.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    svc.approve(&user(10 + i, Role::SuperAdmin), change.id)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert_eq!(loser.code, ErrorCode::ChangeAlreadyResolved);

        let moved = reload(&storage, e.id);
        assert_eq!(moved.assignment(), Some(Assignment::new(3, Some(9))));
        assert_eq!(moved.status, EmployeeStatus::Active);
    }
}
