use shared::models::{Employee, EmployeeId};

use super::ListView;
use crate::http::HttpClient;
use crate::{ClientResult, RosterClient};

/// Active-employee list, scoped by the server to the caller's role
#[derive(Debug, Clone, Default)]
pub struct RosterView {
    view: ListView<Employee>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employees(&self) -> &[Employee] {
        self.view.items()
    }

    pub fn find(&self, id: EmployeeId) -> Option<&Employee> {
        self.view.items().iter().find(|e| e.id == id)
    }

    pub fn view(&self) -> &ListView<Employee> {
        &self.view
    }

    /// For front ends that split a load across their own event loop
    pub fn view_mut(&mut self) -> &mut ListView<Employee> {
        &mut self.view
    }

    pub async fn refresh<C: HttpClient>(&mut self, client: &RosterClient<C>) -> ClientResult<()> {
        let ticket = self.view.begin_load();
        let result = client.list_active_employees().await;
        self.view.apply(ticket, result).map(|_| ())
    }

    pub fn dismiss(&mut self) {
        self.view.dismiss();
    }
}
