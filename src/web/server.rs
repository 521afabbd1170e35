use crate::database_ops::Db;
use crate::util::env::{self as env_util, SiteConfig};
use crate::web::handlers::{self, StartedAt};
use crate::web::{middleware, routes};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::time::Instant;

pub struct SiteServer {
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
}

impl SiteServer {
    /// `SITE_HOST` (default 0.0.0.0), `SITE_PORT` (default 3000), `ALLOWED_ORIGINS`.
    pub fn from_env() -> Result<Self> {
        env_util::init_env();

        let host = env_util::env_opt("SITE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match env_util::env_opt("SITE_PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid SITE_PORT {raw:?}"))?,
            None => 3000,
        };
        let allowed_origins = env_util::env_opt("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Self {
            host,
            port,
            allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn run(self, db: Db, config: SiteConfig) -> Result<()> {
        let bind_addr = self.bind_addr();
        tracing::info!(host = %self.host, port = self.port, "starting site server");

        let db_data = web::Data::new(db);
        let cfg_data = web::Data::new(config);
        let started = web::Data::new(StartedAt(Instant::now()));
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);

            App::new()
                .app_data(db_data.clone())
                .app_data(cfg_data.clone())
                .app_data(started.clone())
                .wrap(logger)
                .wrap(compress)
                .wrap(cors)
                .configure(routes::configure_routes)
                .default_service(web::to(handlers::fallback))
        })
        .bind(&bind_addr)
        .with_context(|| format!("failed to bind to {bind_addr}"))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let s = SiteServer {
            host: "127.0.0.1".into(),
            port: 8080,
            allowed_origins: String::new(),
        };
        assert_eq!(s.bind_addr(), "127.0.0.1:8080");
    }
}
