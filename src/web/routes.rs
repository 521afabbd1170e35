use crate::web::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/health", web::get().to(handlers::health_check))
        .route("/static/site.css", web::get().to(handlers::stylesheet))
        .route("/mountains", web::get().to(handlers::list_mountains))
        .route("/mountains/{slug}", web::get().to(handlers::mountain_detail))
        .route("/activities", web::get().to(handlers::list_activities))
        .route("/activities/{slug}", web::get().to(handlers::activity_detail))
        .route("/places", web::get().to(handlers::list_places))
        .route("/places/{slug}", web::get().to(handlers::place_detail))
        .route("/contact", web::get().to(handlers::contact_form))
        .service(
            web::scope("/api")
                .app_data(web::JsonConfig::default().limit(64 * 1024).error_handler(handlers::json_error))
                .route("/contact", web::post().to(handlers::submit_contact)),
        );
}
