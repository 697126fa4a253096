use crate::client::EmployeeStats;
use crate::models::employee::Employee;

use super::table::{render_table, LOADING_MESSAGE};

pub const TITLE: &str = "Employee Dashboard";

pub fn render_header(username: &str) -> String {
    format!("{}    Hi, {}", TITLE, username)
}

pub fn render_stats(stats: &EmployeeStats) -> String {
    format!(
        "Total Employees: {}  |  Active: {}  |  Inactive: {}",
        stats.total, stats.active, stats.inactive
    )
}

/// Header, stat cards, then either the loading notice or the filtered table.
pub fn render_dashboard(username: &str, stats: &EmployeeStats, loading: bool, visible: &[&Employee]) -> String {
    let body = if loading {
        LOADING_MESSAGE.to_string()
    } else {
        render_table(visible)
    };

    [render_header(username), render_stats(stats), body].join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_hides_table() {
        let stats = EmployeeStats { total: 3, active: 2, inactive: 1 };
        let out = render_dashboard("admin", &stats, true, &[]);
        assert!(out.starts_with("Employee Dashboard    Hi, admin"));
        assert!(out.contains("Total Employees: 3  |  Active: 2  |  Inactive: 1"));
        assert!(out.ends_with(LOADING_MESSAGE));
    }
}
