// HTTP handlers: HTML pages plus the contact and health JSON endpoints.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{http::header::ContentType, web, HttpRequest, HttpResponse, Result};
use std::time::Instant;
use tracing::{error, info, warn};

use super::models::{ApiResponse, ContactRequest, HealthResponse};
use super::render::pages;
use super::render::RenderContext;
use crate::database_ops::contact::insert_contact_message;
use crate::database_ops::models::ContentKind;
use crate::database_ops::{content, images, mountains, Db};
use crate::util::env::SiteConfig;

/// Process start, for the health endpoint.
pub struct StartedAt(pub Instant);

const STYLESHEET: &str = include_str!("../../static/site.css");

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(pages::not_found_page(what))
}

fn server_error(context: &str, e: anyhow::Error) -> HttpResponse {
    error!(context, error = %e, "request failed");
    HttpResponse::InternalServerError()
        .content_type(ContentType::html())
        .body(pages::error_page())
}

fn render_ctx(cfg: &SiteConfig) -> RenderContext<'_> {
    RenderContext {
        supabase_url: &cfg.supabase_url,
        mapbox_token: cfg.mapbox_token.as_deref(),
    }
}

pub async fn home(db: web::Data<Db>) -> Result<HttpResponse> {
    let all = match mountains::get_all_mountains(&db).await {
        Ok(all) => all,
        Err(e) => return Ok(server_error("home", e)),
    };
    let image_count = images::count_images(&db).await.unwrap_or_else(|e| {
        warn!(error = %e, "image count unavailable");
        0
    });
    Ok(html(pages::home_page(&all, image_count)))
}

pub async fn list_mountains(db: web::Data<Db>) -> Result<HttpResponse> {
    match mountains::get_all_mountains(&db).await {
        Ok(all) => Ok(html(pages::mountains_page(&all))),
        Err(e) => Ok(server_error("mountains", e)),
    }
}

pub async fn mountain_detail(
    path: web::Path<String>,
    db: web::Data<Db>,
    cfg: web::Data<SiteConfig>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let found = match mountains::get_mountain_by_slug(&db, &slug).await {
        Ok(found) => found,
        Err(e) => return Ok(server_error("mountain", e)),
    };
    let Some(mwr) = found else {
        return Ok(not_found("Mountain"));
    };
    match pages::mountain_page(&mwr, render_ctx(&cfg)) {
        Ok(body) => Ok(html(body)),
        Err(e) => Ok(server_error("mountain", e)),
    }
}

async fn content_listing(db: &Db, kind: ContentKind) -> HttpResponse {
    match content::list_published(db, kind).await {
        Ok(rows) => html(pages::content_list_page(kind, &rows)),
        Err(e) => server_error(kind.table(), e),
    }
}

async fn content_detail(db: &Db, cfg: &SiteConfig, kind: ContentKind, slug: &str) -> HttpResponse {
    match content::get_published_by_slug(db, kind, slug).await {
        Ok(Some(page)) => html(pages::content_page(kind, &page, render_ctx(cfg))),
        Ok(None) => not_found(kind.label()),
        Err(e) => server_error(kind.table(), e),
    }
}

pub async fn list_activities(db: web::Data<Db>) -> Result<HttpResponse> {
    Ok(content_listing(&db, ContentKind::Activity).await)
}

pub async fn activity_detail(
    path: web::Path<String>,
    db: web::Data<Db>,
    cfg: web::Data<SiteConfig>,
) -> Result<HttpResponse> {
    Ok(content_detail(&db, &cfg, ContentKind::Activity, &path).await)
}

pub async fn list_places(db: web::Data<Db>) -> Result<HttpResponse> {
    Ok(content_listing(&db, ContentKind::Place).await)
}

pub async fn place_detail(
    path: web::Path<String>,
    db: web::Data<Db>,
    cfg: web::Data<SiteConfig>,
) -> Result<HttpResponse> {
    Ok(content_detail(&db, &cfg, ContentKind::Place, &path).await)
}

pub async fn contact_form() -> Result<HttpResponse> {
    Ok(html(pages::contact_page()))
}

pub async fn submit_contact(
    payload: web::Json<ContactRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse> {
    let msg = match payload.validate() {
        Ok(msg) => msg,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())));
        }
    };
    match insert_contact_message(&db, &msg).await {
        Ok(id) => {
            info!(%id, subject = %msg.subject, "contact message received");
            Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
                "message": "Message sent successfully"
            }))))
        }
        Err(e) => {
            error!(error = %e, "failed to store contact message");
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to send message")))
        }
    }
}

/// Body extraction failures on the JSON API still answer with the envelope.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected JSON body");
    let resp = HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid request body"));
    InternalError::from_response(err, resp).into()
}

/// Database connectivity plus process uptime.
pub async fn health_check(db: web::Data<Db>, started: web::Data<StartedAt>) -> Result<HttpResponse> {
    let db_status = if db.ping().await { "connected" } else { "disconnected" };
    let response = ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        database: db_status.to_string(),
        uptime_seconds: started.0.elapsed().as_secs(),
    });
    Ok(HttpResponse::Ok().json(response))
}

pub async fn stylesheet() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(STYLESHEET))
}

pub async fn fallback() -> Result<HttpResponse> {
    Ok(not_found("Page"))
}
