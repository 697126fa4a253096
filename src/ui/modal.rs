use dialoguer::Confirm;

pub const DELETE_TITLE: &str = "Delete Employee?";

pub fn delete_prompt(employee_name: &str) -> String {
    format!(
        "{} Are you sure you want to delete {}? This action cannot be undone.",
        DELETE_TITLE, employee_name
    )
}

/// Asks on the terminal; anything but an explicit yes cancels.
pub fn confirm_delete(employee_name: &str) -> Result<bool, dialoguer::Error> {
    Confirm::new()
        .with_prompt(delete_prompt(employee_name))
        .default(false)
        .interact()
}
