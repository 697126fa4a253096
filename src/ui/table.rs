use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::models::employee::Employee;

pub const EMPTY_MESSAGE: &str = "No employees found";
pub const LOADING_MESSAGE: &str = "Loading employees...";

/// `1990-05-15` -> `15 May 1990`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn status_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Short description of a profile image; inline payloads are far too long
/// to print.
pub fn describe_image(image: &str) -> String {
    if let Some(rest) = image.strip_prefix("data:") {
        let mime = rest.split(';').next().unwrap_or("image");
        let payload = rest.split_once(',').map_or(0, |(_, data)| data.len());
        // base64 inflates by 4/3
        return format!("inline {} ({} KB)", mime, payload * 3 / 4 / 1024);
    }
    image.to_string()
}

pub fn render_table(employees: &[&Employee]) -> String {
    if employees.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Photo", "Name", "Gender", "DOB", "State", "Status"]);

    for employee in employees {
        table.add_row(vec![
            employee.employee_id.clone().unwrap_or_default(),
            describe_image(&employee.profile_image),
            employee.full_name.clone(),
            capitalize(employee.gender.as_str()),
            format_date(employee.date_of_birth),
            employee.state.clone(),
            status_label(employee.is_active).to_string(),
        ]);
    }

    table.to_string()
}

/// Every field of one record, for `show`.
pub fn render_details(employee: &Employee) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let rows = [
        ("ID", employee.employee_id.clone().unwrap_or_default()),
        ("Record", employee.id.to_string()),
        ("Name", employee.full_name.clone()),
        ("Gender", capitalize(employee.gender.as_str())),
        ("DOB", format_date(employee.date_of_birth)),
        ("State", employee.state.clone()),
        ("Status", status_label(employee.is_active).to_string()),
        ("Photo", describe_image(&employee.profile_image)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::{Gender, NewEmployee};
    use chrono::Utc;

    fn employee() -> Employee {
        Employee::from_new(
            NewEmployee {
                full_name: "Sneha".into(),
                gender: Gender::Female,
                date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 28).unwrap(),
                profile_image: "data:image/png;base64,AAAA".into(),
                state: "Telangana".into(),
                is_active: false,
            },
            Some("EMP004".into()),
            Utc::now(),
        )
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render_table(&[]), EMPTY_MESSAGE);
    }

    #[test]
    fn rows_show_formatted_fields() {
        let e = employee();
        let out = render_table(&[&e]);
        for expected in ["EMP004", "Sneha", "Female", "28 Mar 1995", "Telangana", "Inactive", "inline image/png"] {
            assert!(out.contains(expected), "missing {expected} in\n{out}");
        }
    }

    #[test]
    fn remote_images_print_as_is() {
        assert_eq!(describe_image("https://x.test/a.svg"), "https://x.test/a.svg");
    }
}
