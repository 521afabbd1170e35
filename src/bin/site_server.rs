// HTTP server for the public site.

use anyhow::Result;
use explore_mournes::database_ops::Db;
use explore_mournes::tracing::init_tracing;
use explore_mournes::util::env::{self as env_util, SiteConfig};
use explore_mournes::web::SiteServer;

#[actix_web::main]
async fn main() -> Result<()> {
    env_util::init_env();
    init_tracing("info,sqlx=warn,actix_web=info", false)?;

    let config = SiteConfig::from_env()?;
    let server = SiteServer::from_env()?;

    let database_url = env_util::db_url()?;
    let max_connections: u32 = env_util::env_parse("DB_MAX_CONNS", 10u32);
    let db = Db::connect(&database_url, max_connections).await?;
    tracing::info!("database connected");

    server.run(db, config).await
}
