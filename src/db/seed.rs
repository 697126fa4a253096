use chrono::NaiveDate;

use crate::models::employee::{Gender, NewEmployee};

pub const SEEDED_MESSAGE: &str = "Database seeded with sample data";
pub const ALREADY_SEEDED_MESSAGE: &str = "Database already has data";

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/adventurer/svg?seed=";

/// The fixed sample set written by `seed()` into an empty store, in
/// insertion order.
pub fn sample_employees() -> Vec<NewEmployee> {
    let rows: [(&str, Gender, (i32, u32, u32), &str, &str, bool); 5] = [
        ("Hari Chari", Gender::Male, (1990, 5, 15), "Hari", "Andhra Pradesh", true),
        ("Priya", Gender::Female, (1992, 8, 22), "Priya", "Gujarat", true),
        ("Kumar", Gender::Male, (1988, 12, 10), "Kumar", "Karnataka", false),
        ("Sneha", Gender::Female, (1995, 3, 28), "Sneha", "Telangana", true),
        ("Vikram", Gender::Male, (1985, 7, 4), "Vikram", "Delhi", false),
    ];

    rows.into_iter()
        .filter_map(|(name, gender, (y, m, d), avatar, state, is_active)| {
            Some(NewEmployee {
                full_name: name.to_string(),
                gender,
                date_of_birth: NaiveDate::from_ymd_opt(y, m, d)?,
                profile_image: format!("{}{}", AVATAR_BASE, avatar),
                state: state.to_string(),
                is_active,
            })
        })
        .collect()
}
