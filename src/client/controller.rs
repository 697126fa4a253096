use log::{error, info, warn};
use uuid::Uuid;

use super::filter::{EmployeeFilter, EmployeeStats};
use super::session::{Session, SessionStorage};
use super::EmployeeApi;
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Anonymous,
    Loading,
    Ready,
}

/// Client-side view of the directory.
///
/// Holds the session and the employee list last fetched from the API.
/// Mutations never touch the local list optimistically: the list is only
/// reconciled with what the server returned, so a failed call leaves it
/// exactly as it was. Failures are logged and otherwise swallowed.
pub struct DirectoryController<A, S> {
    api: A,
    storage: S,
    phase: Phase,
    username: String,
    employees: Vec<Employee>,
}

impl<A, S> DirectoryController<A, S>
where
    A: EmployeeApi,
    S: SessionStorage,
{
    /// Restores the stored session; a restored login fetches the list.
    pub async fn start(api: A, storage: S) -> Self {
        let mut controller = Self::restore(api, storage);
        if controller.is_authenticated() {
            controller.refresh().await;
        }
        controller
    }

    /// Restores the stored session without touching the API. A restored
    /// login is `Ready` with an empty list until `refresh` is called.
    pub fn restore(api: A, storage: S) -> Self {
        let session = storage.load().unwrap_or_else(|err| {
            warn!("Ignoring unreadable session: {}", err);
            Session::default()
        });

        let mut controller = DirectoryController {
            api,
            storage,
            phase: Phase::Anonymous,
            username: String::new(),
            employees: Vec::new(),
        };

        if session.is_logged_in {
            controller.username = session.username;
            controller.phase = Phase::Ready;
        }
        controller
    }

    /// Accepts any non-empty pair. There is no credential check.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }

        let was_anonymous = !self.is_authenticated();
        self.username = username.to_string();
        self.persist(true);

        if was_anonymous {
            self.refresh().await;
        }
        true
    }

    pub fn logout(&mut self) {
        self.phase = Phase::Anonymous;
        self.username.clear();
        self.employees.clear();
        self.persist(false);
    }

    fn persist(&self, is_logged_in: bool) {
        let session = Session {
            is_logged_in,
            username: self.username.clone(),
        };
        if let Err(err) = self.storage.save(&session) {
            error!("Failed to save session: {}", err);
        }
    }

    /// Replaces the local list with the server's.
    pub async fn refresh(&mut self) {
        self.phase = Phase::Loading;
        match self.api.list_employees().await {
            Ok(employees) => {
                info!("Fetched {} employees", employees.len());
                self.employees = employees;
            }
            Err(err) => error!("Failed to fetch employees: {}", err),
        }
        self.phase = Phase::Ready;
    }

    fn require_session(&self, action: &str) -> bool {
        if self.is_authenticated() {
            return true;
        }
        warn!("Cannot {} while logged out", action);
        false
    }

    pub async fn add_employee(&mut self, new_employee: NewEmployee) -> Option<Employee> {
        if !self.require_session("add employee") {
            return None;
        }
        match self.api.create_employee(&new_employee).await {
            Ok(created) => {
                self.employees.push(created.clone());
                Some(created)
            }
            Err(err) => {
                error!("Failed to add employee: {}", err);
                None
            }
        }
    }

    pub async fn update_employee(&mut self, id: Uuid, update: EmployeeUpdate) -> Option<Employee> {
        if !self.require_session("update employee") {
            return None;
        }
        match self.api.update_employee(id, &update).await {
            Ok(updated) => {
                self.replace(updated.clone());
                Some(updated)
            }
            Err(err) => {
                error!("Failed to update employee: {}", err);
                None
            }
        }
    }

    pub async fn delete_employee(&mut self, id: Uuid) -> bool {
        if !self.require_session("delete employee") {
            return false;
        }
        match self.api.delete_employee(id).await {
            Ok(()) => {
                self.employees.retain(|e| e.id != id);
                true
            }
            Err(err) => {
                error!("Failed to delete employee: {}", err);
                false
            }
        }
    }

    pub async fn toggle_status(&mut self, id: Uuid) -> Option<Employee> {
        if !self.require_session("toggle status") {
            return None;
        }
        match self.api.toggle_status(id).await {
            Ok(updated) => {
                self.replace(updated.clone());
                Some(updated)
            }
            Err(err) => {
                error!("Failed to toggle status: {}", err);
                None
            }
        }
    }

    fn replace(&mut self, updated: Employee) {
        if let Some(slot) = self.employees.iter_mut().find(|e| e.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase != Phase::Anonymous
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn visible(&self, filter: &EmployeeFilter) -> Vec<&Employee> {
        filter.apply(&self.employees)
    }

    pub fn stats(&self) -> EmployeeStats {
        EmployeeStats::of(&self.employees)
    }

    /// Looks a record up by its opaque id or its `EMP###` code.
    pub fn find(&self, key: &str) -> Option<&Employee> {
        let id = Uuid::parse_str(key).ok();
        self.employees.iter().find(|e| {
            Some(e.id) == id
                || e.employee_id
                    .as_deref()
                    .map_or(false, |code| code.eq_ignore_ascii_case(key))
        })
    }
}
