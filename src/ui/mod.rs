//! Terminal rendering of the dashboard. Everything here is stateless: it
//! turns already-computed data into text.

pub mod dashboard;
pub mod form;
pub mod login;
pub mod modal;
pub mod table;

pub use dashboard::render_dashboard;
pub use form::{EmployeeForm, FormErrors, ImageError};
pub use login::LoginForm;
pub use table::render_table;
