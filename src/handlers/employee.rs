use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use log::info;

use crate::db::EmployeeStore;
use crate::errors::AppError;
use crate::models::employee::{EmployeeUpdate, NewEmployee};

// An id that is not a UUID can never match a stored record.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Not found".to_string()))
}

pub async fn get_employees(
    store: web::Data<dyn EmployeeStore>,
) -> Result<HttpResponse, AppError> {
    let employees = store
        .list()
        .await
        .map_err(AppError::from_store("Failed to fetch employees"))?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;

    let employee = store
        .get(id)
        .await
        .map_err(AppError::from_store("Failed to fetch employee"))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn create_employee(
    store: web::Data<dyn EmployeeStore>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = store
        .create(new_employee.into_inner())
        .await
        .map_err(AppError::from_store("Failed to create employee"))?;

    info!("Created employee {} ({})", employee.id, employee.employee_id.as_deref().unwrap_or("-"));
    Ok(HttpResponse::Created().json(employee))
}

pub async fn update_employee(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<String>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;

    let employee = store
        .update(id, updates.into_inner())
        .await
        .map_err(AppError::from_store("Failed to update employee"))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;

    store
        .delete(id)
        .await
        .map_err(AppError::from_store("Failed to delete employee"))?;

    info!("Deleted employee {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn toggle_status(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;

    let employee = store
        .toggle_status(id)
        .await
        .map_err(AppError::from_store("Failed to toggle status"))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn seed(
    store: web::Data<dyn EmployeeStore>,
) -> Result<HttpResponse, AppError> {
    let outcome = store
        .seed()
        .await
        .map_err(AppError::from_store("Failed to seed database"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": outcome.message(),
    })))
}
