use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::employee::{Employee, Gender, NewEmployee};

/// Largest image accepted for inline upload.
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

pub const INDIAN_STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(text));
    err
}

fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(message("required", "Name is required"));
    }
    Ok(())
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    if !INDIAN_STATES.contains(&state) {
        return Err(message("state", "Select a state"));
    }
    Ok(())
}

/// Add/edit form. Validation never reaches the server; errors are reported
/// per field.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct EmployeeForm {
    #[validate(custom = "validate_full_name")]
    pub full_name: String,
    pub gender: Gender,
    #[validate(required(message = "DOB is required"))]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(custom = "validate_state")]
    pub state: String,
    pub is_active: bool,
    #[validate(length(min = 1, message = "Upload an image"))]
    pub profile_image: String,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        EmployeeForm {
            full_name: String::new(),
            gender: Gender::Male,
            date_of_birth: None,
            state: String::new(),
            is_active: true,
            profile_image: String::new(),
        }
    }
}

impl EmployeeForm {
    /// Pre-filled for editing.
    pub fn from_employee(employee: &Employee) -> Self {
        EmployeeForm {
            full_name: employee.full_name.clone(),
            gender: employee.gender,
            date_of_birth: Some(employee.date_of_birth),
            state: employee.state.clone(),
            is_active: employee.is_active,
            profile_image: employee.profile_image.clone(),
        }
    }

    /// Validates and produces the payload, with the name trimmed.
    pub fn submit(&self) -> Result<NewEmployee, FormErrors> {
        self.validate().map_err(FormErrors::from)?;

        let date_of_birth = self
            .date_of_birth
            .ok_or_else(|| FormErrors::single("date_of_birth", "DOB is required"))?;

        Ok(NewEmployee {
            full_name: self.full_name.trim().to_string(),
            gender: self.gender,
            date_of_birth,
            profile_image: self.profile_image.clone(),
            state: self.state.clone(),
            is_active: self.is_active,
        })
    }
}

/// Field name -> first message for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn single(field: &str, text: &str) -> Self {
        let mut errors = FormErrors::default();
        errors.0.insert(field.to_string(), text.to_string());
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let first = errs.first()?;
                let text = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some((field.to_string(), text))
            })
            .collect();
        FormErrors(fields)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|(field, text)| format!("{}: {}", field, text)).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for FormErrors {}

#[derive(Debug)]
pub enum ImageError {
    TooLarge,
    NotAnImage,
    Io(std::io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::TooLarge => write!(f, "Image too large (max 2MB)"),
            ImageError::NotAnImage => write!(f, "Only image files are allowed"),
            ImageError::Io(err) => write!(f, "Could not read image: {}", err),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err)
    }
}

/// Turns a local image file into a `data:` URL. Remote URLs and existing
/// data URLs are taken as they are.
pub fn capture_image(source: &str) -> Result<String, ImageError> {
    if source.starts_with("http://") || source.starts_with("https://") || source.starts_with("data:") {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    if fs::metadata(path)?.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }

    let bytes = fs::read(path)?;
    let kind = infer::get(&bytes).ok_or(ImageError::NotAnImage)?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(ImageError::NotAnImage);
    }

    Ok(format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // 1x1 transparent PNG
    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89,
    ];

    fn filled() -> EmployeeForm {
        EmployeeForm {
            full_name: "  Priya  ".into(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1992, 8, 22),
            state: "Gujarat".into(),
            is_active: true,
            profile_image: "https://example.com/p.png".into(),
        }
    }

    #[test]
    fn blank_form_reports_every_missing_field() {
        let errors = EmployeeForm::default().submit().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(!errors.is_empty());
        assert_eq!(errors.get("full_name"), Some("Name is required"));
        assert_eq!(errors.get("date_of_birth"), Some("DOB is required"));
        assert_eq!(errors.get("state"), Some("Select a state"));
        assert_eq!(errors.get("profile_image"), Some("Upload an image"));
    }

    #[test]
    fn whitespace_name_is_missing() {
        let form = EmployeeForm {
            full_name: "   ".into(),
            ..filled()
        };
        assert_eq!(form.submit().unwrap_err().get("full_name"), Some("Name is required"));
    }

    #[test]
    fn unknown_state_is_rejected() {
        let form = EmployeeForm {
            state: "Atlantis".into(),
            ..filled()
        };
        assert_eq!(form.submit().unwrap_err().get("state"), Some("Select a state"));
    }

    #[test]
    fn submit_trims_name() {
        let payload = filled().submit().unwrap();
        assert_eq!(payload.full_name, "Priya");
        assert_eq!(payload.state, "Gujarat");
        assert!(payload.is_active);
    }

    #[test]
    fn single_error_is_not_empty() {
        assert!(FormErrors::default().is_empty());
        assert!(!FormErrors::single("state", "Select a state").is_empty());
    }

    #[test]
    fn defaults_match_add_mode() {
        let form = EmployeeForm::default();
        assert_eq!(form.gender, Gender::Male);
        assert!(form.is_active);
    }

    #[test]
    fn captures_png_as_data_url() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PNG).unwrap();
        let url = capture_image(file.path().to_str().unwrap()).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn rejects_oversized_images() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PNG).unwrap();
        file.write_all(&vec![0u8; MAX_IMAGE_BYTES as usize]).unwrap();
        let err = capture_image(file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Image too large (max 2MB)");
    }

    #[test]
    fn rejects_non_images() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"just some text").unwrap();
        assert!(matches!(
            capture_image(file.path().to_str().unwrap()),
            Err(ImageError::NotAnImage)
        ));
    }

    #[test]
    fn urls_pass_through() {
        let url = "https://api.dicebear.com/7.x/adventurer/svg?seed=Hari";
        assert_eq!(capture_image(url).unwrap(), url);
    }
}
