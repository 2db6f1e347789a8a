//! Change request submission
//!
//! Forms collect input, refuse to build a request until it is complete, and
//! re-fetch the roster after a successful submission.

use chrono::NaiveDate;
use shared::client::OnboardResponse;
use shared::models::{
    CompanyId, EmployeeCreate, EmployeeId, PendingChange, Project, ProjectId, ResignRequest,
    TransferRequest,
};

use super::RosterView;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult, RosterClient};

/// Company then project selection
///
/// Projects are scoped by company, so changing the company always drops the
/// selected project and the loaded project list.
#[derive(Debug, Clone, Default)]
pub struct AssignmentPicker {
    company_id: Option<CompanyId>,
    project_id: Option<ProjectId>,
    projects: Vec<Project>,
}

impl AssignmentPicker {
    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Projects selectable for the current company
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Select a company with an already loaded project list
    ///
    /// Projects of other companies are ignored.
    pub fn select_company(&mut self, company_id: CompanyId, projects: Vec<Project>) {
        self.company_id = Some(company_id);
        self.project_id = None;
        self.projects = projects
            .into_iter()
            .filter(|p| p.company_id == company_id)
            .collect();
    }

    /// Select a company and load its projects
    pub async fn choose_company<C: HttpClient>(
        &mut self,
        client: &RosterClient<C>,
        company_id: CompanyId,
    ) -> ClientResult<()> {
        self.select_company(company_id, Vec::new());
        let projects = client.list_projects(company_id).await?;
        self.select_company(company_id, projects);
        Ok(())
    }

    pub fn select_project(&mut self, project_id: ProjectId) -> ClientResult<()> {
        if self.company_id.is_none() {
            return Err(ClientError::validation("Select a company first"));
        }
        if !self.projects.iter().any(|p| p.id == project_id) {
            return Err(ClientError::validation(
                "Project does not belong to the selected company",
            ));
        }
        self.project_id = Some(project_id);
        Ok(())
    }
}

/// Transfer an employee to another company and project
#[derive(Debug, Clone)]
pub struct TransferForm {
    employee_id: EmployeeId,
    pub destination: AssignmentPicker,
    effective_date: Option<NaiveDate>,
}

impl TransferForm {
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            destination: AssignmentPicker::default(),
            effective_date: None,
        }
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub fn set_effective_date(&mut self, date: NaiveDate) {
        self.effective_date = Some(date);
    }

    /// Build the request; both company and project must be resolved
    pub fn validate(&self) -> ClientResult<TransferRequest> {
        let new_company = self
            .destination
            .company_id()
            .ok_or_else(|| ClientError::validation("Select a destination company"))?;
        let new_project = self
            .destination
            .project_id()
            .ok_or_else(|| ClientError::validation("Select a destination project"))?;
        let effective_date = self
            .effective_date
            .ok_or_else(|| ClientError::validation("Select an effective date"))?;

        Ok(TransferRequest {
            new_company,
            new_project,
            effective_date,
        })
    }

    pub async fn submit<C: HttpClient>(
        &self,
        client: &RosterClient<C>,
        roster: &mut RosterView,
    ) -> ClientResult<PendingChange> {
        let request = self.validate()?;
        let change = client.submit_transfer(self.employee_id, &request).await?;
        refetch(client, roster).await;
        Ok(change)
    }
}

/// Resign an employee
#[derive(Debug, Clone)]
pub struct ResignForm {
    employee_id: EmployeeId,
    resign_date: Option<NaiveDate>,
}

impl ResignForm {
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            resign_date: None,
        }
    }

    pub fn set_resign_date(&mut self, date: NaiveDate) {
        self.resign_date = Some(date);
    }

    pub fn validate(&self) -> ClientResult<ResignRequest> {
        let resign_date = self
            .resign_date
            .ok_or_else(|| ClientError::validation("Select a resignation date"))?;
        Ok(ResignRequest { resign_date })
    }

    pub async fn submit<C: HttpClient>(
        &self,
        client: &RosterClient<C>,
        roster: &mut RosterView,
    ) -> ClientResult<PendingChange> {
        let request = self.validate()?;
        let change = client.submit_resign(self.employee_id, &request).await?;
        refetch(client, roster).await;
        Ok(change)
    }
}

/// Add a new employee (starts an onboarding change)
#[derive(Debug, Clone, Default)]
pub struct OnboardForm {
    pub name: String,
    pub position: String,
    pub assignment: AssignmentPicker,
    hire_date: Option<NaiveDate>,
}

impl OnboardForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hire_date(&mut self, date: NaiveDate) {
        self.hire_date = Some(date);
    }

    /// Project is optional, but when chosen it belongs to the company
    pub fn validate(&self) -> ClientResult<EmployeeCreate> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Name is required"));
        }
        let position = self.position.trim();
        if position.is_empty() {
            return Err(ClientError::validation("Position is required"));
        }
        let hire_date = self
            .hire_date
            .ok_or_else(|| ClientError::validation("Select a hire date"))?;
        let company_id = self
            .assignment
            .company_id()
            .ok_or_else(|| ClientError::validation("Select a company"))?;

        Ok(EmployeeCreate {
            name: name.to_string(),
            position: position.to_string(),
            hire_date,
            company_id,
            project_id: self.assignment.project_id(),
        })
    }

    pub async fn submit<C: HttpClient>(
        &self,
        client: &RosterClient<C>,
        roster: &mut RosterView,
    ) -> ClientResult<OnboardResponse> {
        let payload = self.validate()?;
        let created = client.onboard(&payload).await?;
        refetch(client, roster).await;
        Ok(created)
    }
}

/// Re-fetch after a successful submission
///
/// The submission already succeeded; a failed refresh is recorded on the
/// view and logged, not returned.
async fn refetch<C: HttpClient>(client: &RosterClient<C>, roster: &mut RosterView) {
    if let Err(e) = roster.refresh(client).await {
        tracing::warn!(error = %e, "Roster refresh after submission failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionContext};
    use crate::testing::MockHttpClient;
    use http::Method;
    use shared::client::UserInfo;
    use shared::models::{Employee, EmployeeStatus, Role};
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn project(id: ProjectId, company_id: CompanyId) -> Project {
        Project {
            id,
            name: format!("P{}", id),
            company_id,
        }
    }

    fn employee(id: EmployeeId) -> Employee {
        Employee {
            id,
            name: "E101".into(),
            position: "Engineer".into(),
            effective_date: date(1),
            status: EmployeeStatus::Active,
            company_id: Some(1),
            project_id: Some(10),
            creator_id: 1,
            pending_change_id: None,
            created_at: 0,
        }
    }

    fn signed_in(mock: MockHttpClient) -> RosterClient<MockHttpClient> {
        let session = Arc::new(SessionContext::new());
        session.sign_in(Session {
            token: "tok".into(),
            user: UserInfo {
                id: 1,
                username: "root".into(),
                role: Role::SuperAdmin,
            },
        });
        RosterClient::new(mock, session)
    }

    #[test]
    fn test_company_change_resets_project() {
        let mut picker = AssignmentPicker::default();
        picker.select_company(2, vec![project(20, 2), project(21, 2), project(30, 3)]);
        assert_eq!(picker.projects().len(), 2);
        picker.select_project(21).unwrap();
        assert_eq!(picker.project_id(), Some(21));

        picker.select_company(3, vec![project(30, 3)]);
        assert_eq!(picker.company_id(), Some(3));
        assert_eq!(picker.project_id(), None);
    }

    #[test]
    fn test_project_outside_company_is_rejected() {
        let mut picker = AssignmentPicker::default();
        assert!(picker.select_project(20).is_err());

        picker.select_company(2, vec![project(20, 2), project(30, 3)]);
        let err = picker.select_project(30).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert_eq!(picker.project_id(), None);
    }

    #[test]
    fn test_transfer_requires_every_field() {
        let mut form = TransferForm::new(101);
        assert!(form.validate().is_err());

        form.destination.select_company(2, vec![project(20, 2)]);
        form.set_effective_date(date(15));
        // company and date but no project
        assert!(form.validate().is_err());

        form.destination.select_project(20).unwrap();
        let request = form.validate().unwrap();
        assert_eq!(
            request,
            TransferRequest {
                new_company: 2,
                new_project: 20,
                effective_date: date(15),
            }
        );
    }

    #[test]
    fn test_onboard_project_optional() {
        let mut form = OnboardForm::new();
        form.name = "  Alice ".into();
        form.position = "Analyst".into();
        form.set_hire_date(date(3));
        assert!(form.validate().is_err());

        form.assignment.select_company(1, vec![project(10, 1)]);
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.project_id, None);

        form.assignment.select_project(10).unwrap();
        assert_eq!(form.validate().unwrap().project_id, Some(10));
    }

    #[test]
    fn test_resign_requires_date() {
        let mut form = ResignForm::new(5);
        assert!(form.validate().is_err());
        form.set_resign_date(date(31));
        assert_eq!(form.validate().unwrap().resign_date, date(31));
    }

    #[tokio::test]
    async fn test_choose_company_loads_projects() {
        let mock = MockHttpClient::new();
        mock.reply(
            Method::GET,
            "/api/companies/2/projects",
            vec![project(20, 2), project(21, 2)],
        );
        let client = signed_in(mock);

        let mut form = TransferForm::new(101);
        form.destination.choose_company(&client, 2).await.unwrap();
        let ids: Vec<_> = form.destination.projects().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![20, 21]);
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let client = signed_in(MockHttpClient::new());
        let mut roster = RosterView::new();

        let form = TransferForm::new(101);
        assert!(form.submit(&client, &mut roster).await.is_err());
        assert!(client_calls(&client).is_empty());
    }

    #[tokio::test]
    async fn test_successful_submission_refetches_roster() {
        let mock = MockHttpClient::new();
        mock.reply(
            Method::PUT,
            "/api/pending-changes/101/resign",
            serde_json::json!({
                "id": 9,
                "kind": "resign",
                "employee_id": 101,
                "employee_name": "E101",
                "source": { "company_id": 1, "project_id": 10 },
                "destination": null,
                "effective_date": "2025-03-31",
                "status": "pending",
                "creator_id": 1,
                "created_at": 0
            }),
        );
        mock.reply(Method::GET, "/api/active-employees", vec![employee(101)]);
        let client = signed_in(mock);
        let mut roster = RosterView::new();

        let mut form = ResignForm::new(101);
        form.set_resign_date(date(31));
        let change = form.submit(&client, &mut roster).await.unwrap();

        assert_eq!(change.id, 9);
        assert_eq!(roster.employees().len(), 1);
        assert!(roster.find(101).is_some());
    }

    fn client_calls(client: &RosterClient<MockHttpClient>) -> Vec<crate::testing::Call> {
        client.http().calls()
    }
}
