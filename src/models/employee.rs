use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EMPLOYEE_CODE_PREFIX: &str = "EMP";

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Gender must be one of 'male', 'female' or 'other', got '{}'", s)),
        }
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub profile_image: String,
    pub state: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a client supplies when adding an employee. Identifiers and
/// timestamps are always assigned by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub profile_image: String,
    pub state: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update; absent fields keep their stored value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Employee {
    pub fn from_new(new_employee: NewEmployee, employee_id: Option<String>, now: DateTime<Utc>) -> Self {
        Employee {
            id: Uuid::new_v4(),
            employee_id,
            full_name: new_employee.full_name,
            gender: new_employee.gender,
            date_of_birth: new_employee.date_of_birth,
            profile_image: new_employee.profile_image,
            state: new_employee.state,
            is_active: new_employee.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the provided fields onto this record and bumps `updated_at`.
    pub fn apply(&mut self, update: EmployeeUpdate, now: DateTime<Utc>) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(profile_image) = update.profile_image {
            self.profile_image = profile_image;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

impl From<NewEmployee> for EmployeeUpdate {
    fn from(e: NewEmployee) -> Self {
        EmployeeUpdate {
            full_name: Some(e.full_name),
            gender: Some(e.gender),
            date_of_birth: Some(e.date_of_birth),
            profile_image: Some(e.profile_image),
            state: Some(e.state),
            is_active: Some(e.is_active),
        }
    }
}

/// Formats a display code, e.g. `7` -> `EMP007`. Counters past 999 keep
/// all their digits.
pub fn format_employee_code(number: u32) -> String {
    format!("{}{:03}", EMPLOYEE_CODE_PREFIX, number)
}

/// Numeric suffix of a display code, or `None` when the code is malformed.
pub fn parse_employee_code(code: &str) -> Option<u32> {
    code.strip_prefix(EMPLOYEE_CODE_PREFIX)?.parse().ok()
}

/// Next code after the highest of `codes`; `EMP001` when there are none.
pub fn next_employee_code<'a, I>(codes: I, floor: u32) -> (u32, String)
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = codes
        .into_iter()
        .filter_map(parse_employee_code)
        .max()
        .unwrap_or(0)
        .max(floor);
    let next = highest + 1;
    (next, format_employee_code(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Employee {
        Employee::from_new(
            NewEmployee {
                full_name: "Amit Kumar".into(),
                gender: Gender::Male,
                date_of_birth: NaiveDate::from_ymd_opt(1988, 12, 10).unwrap(),
                profile_image: "https://example.com/a.png".into(),
                state: "Karnataka".into(),
                is_active: true,
            },
            Some("EMP001".into()),
            Utc::now(),
        )
    }

    #[test]
    fn formats_codes_with_zero_padding() {
        assert_eq!(format_employee_code(1), "EMP001");
        assert_eq!(format_employee_code(42), "EMP042");
        assert_eq!(format_employee_code(1000), "EMP1000");
    }

    #[test]
    fn next_code_starts_at_one_and_respects_floor() {
        assert_eq!(next_employee_code(Vec::<&str>::new(), 0).1, "EMP001");
        assert_eq!(next_employee_code(["EMP002", "EMP009", "junk"], 0).1, "EMP010");
        assert_eq!(next_employee_code(["EMP002"], 7).1, "EMP008");
        assert_eq!(next_employee_code(["EMP999"], 0).1, "EMP1000");
    }

    #[test]
    fn serializes_camel_case_with_iso_date() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["fullName"], "Amit Kumar");
        assert_eq!(value["employeeId"], "EMP001");
        assert_eq!(value["dateOfBirth"], "1988-12-10");
        assert_eq!(value["gender"], "male");
        assert_eq!(value["isActive"], true);
    }

    #[test]
    fn update_ignores_immutable_fields() {
        let update: EmployeeUpdate = serde_json::from_value(json!({
            "id": "not-a-uuid",
            "employeeId": "EMP999",
            "state": "Goa"
        }))
        .unwrap();

        let mut employee = sample();
        let before = employee.clone();
        employee.apply(update, Utc::now());

        assert_eq!(employee.state, "Goa");
        assert_eq!(employee.id, before.id);
        assert_eq!(employee.employee_id, before.employee_id);
        assert_eq!(employee.full_name, before.full_name);
    }

    #[test]
    fn rejects_unknown_gender() {
        assert!("robot".parse::<Gender>().is_err());
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
    }
}
