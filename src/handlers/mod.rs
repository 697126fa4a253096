pub mod employee;

use actix_web::{error, web};

use crate::config::JSON_BODY_LIMIT;
use crate::errors::AppError;

/// Body parsing failures are reported like any other failed operation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err: error::JsonPayloadError, _req| {
            AppError::operation_failed("Failed to process request", err).into()
        })
}

/// Registers the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .service(
                web::resource("/employees")
                    .route(web::get().to(employee::get_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            .service(
                web::resource("/employees/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            )
            .service(
                web::resource("/employees/{id}/toggle")
                    .route(web::patch().to(employee::toggle_status)),
            )
            .service(
                web::resource("/seed")
                    .route(web::post().to(employee::seed)),
            ),
    );
}
