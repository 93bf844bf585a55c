use crate::{api::leave_request, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::debug;

// Helper to build the per-IP limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // None only for a zero period or burst, both clamped above
        .unwrap_or_default();
    Governor::new(&cfg)
}

// Malformed bodies get the same `{"message"}` shape as domain errors
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected leave payload");
    let response = HttpResponse::BadRequest().json(json!({ "message": err.to_string() }));
    InternalError::from_response(err, response).into()
}

/// Registers the leave routes without rate limiting.
pub fn leave_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));

    cfg.service(
        web::scope("/employees")
            // /employees/leaves
            .service(web::resource("/leaves").route(web::get().to(leave_request::leave_list)))
            // /employees/leaves/{id}/approve
            .service(
                web::resource("/leaves/{leave_id}/approve")
                    .route(web::put().to(leave_request::approve_leave)),
            )
            // /employees/leaves/{id}/deny
            .service(
                web::resource("/leaves/{leave_id}/deny")
                    .route(web::put().to(leave_request::deny_leave)),
            )
            // /employees/{employee_id}/leaves
            .service(
                web::resource("/{employee_id}/leaves")
                    .route(web::get().to(leave_request::employee_leaves))
                    .route(web::post().to(leave_request::create_leave)),
            )
            // /employees/{employee_id}/leave-summary
            .service(
                web::resource("/{employee_id}/leave-summary")
                    .route(web::get().to(leave_request::leave_summary)),
            ),
    )
    .service(
        web::resource("/managers/{manager_id}/leaves")
            .route(web::get().to(leave_request::team_leaves)),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .configure(leave_routes),
    );
}
