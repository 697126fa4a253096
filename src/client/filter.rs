use std::str::FromStr;

use crate::models::employee::{Employee, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Inactive,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            _ => Err(format!("Status must be 'active' or 'inactive', got '{}'", s)),
        }
    }
}

/// Search and filter inputs of the dashboard. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub search: String,
    pub gender: Option<Gender>,
    pub status: Option<StatusFilter>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let name_match = employee
            .full_name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let gender_match = self.gender.map_or(true, |g| g == employee.gender);
        let status_match = match self.status {
            None => true,
            Some(StatusFilter::Active) => employee.is_active,
            Some(StatusFilter::Inactive) => !employee.is_active,
        };
        name_match && gender_match && status_match
    }

    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Counts shown on the dashboard cards, always over the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl EmployeeStats {
    pub fn of(employees: &[Employee]) -> Self {
        let total = employees.len();
        let active = employees.iter().filter(|e| e.is_active).count();
        EmployeeStats {
            total,
            active,
            inactive: total - active,
        }
    }
}
