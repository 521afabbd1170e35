use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool, Row,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

use crate::util::env as env_util;

pub const MIGRATIONS_DIR: &str = "./migrations";

#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    /// Connect and, when `AUTO_MIGRATE` is on, apply pending files from `./migrations`.
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let db = Self::connect_no_migrate(database_url, max_connections).await?;
        if env_util::env_flag("AUTO_MIGRATE", false) {
            info!("running migrations (AUTO_MIGRATE=on)");
            db.run_migrations(Path::new(MIGRATIONS_DIR)).await?;
        } else {
            info!("AUTO_MIGRATE disabled; skipping migrations");
        }
        Ok(db)
    }

    // Variant that NEVER runs migrations regardless of env.
    #[instrument(skip(database_url))]
    pub async fn connect_no_migrate(database_url: &str, max_connections: u32) -> Result<Self> {
        let mut connect_options = PgConnectOptions::from_str(database_url)
            .context("parsing database URL")?
            // Supabase's pooler runs in transaction mode; prepared statements don't survive it.
            .statement_cache_capacity(0);

        if database_url.contains("sslmode=require") {
            connect_options = connect_options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(connect_options)
            .await
            .context("connecting to database")?;
        info!(max_connections, "connected to db");
        Ok(Self { pool })
    }

    /// Cheap connectivity probe for health checks.
    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, bool>("SELECT true")
            .persistent(false)
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    /// Lightweight runner: applies `NNNN_description.sql` files in numeric
    /// order, recording each in `_sqlx_migrations`. Other files are ignored.
    pub async fn run_migrations(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            info!(dir = %dir.display(), "no migrations directory; nothing to apply");
            return Ok(());
        }
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _sqlx_migrations (
                version BIGINT PRIMARY KEY,
                description TEXT,
                installed_at TIMESTAMPTZ DEFAULT now()
             )",
        )
        .execute(&self.pool)
        .await?;

        let applied_rows = sqlx::raw_sql("SELECT version FROM _sqlx_migrations")
            .fetch_all(&self.pool)
            .await?;
        let mut applied: HashSet<i64> = HashSet::new();
        for r in applied_rows {
            applied.insert(r.try_get::<i64, _>(0)?);
        }

        for (version, desc, path) in pending_migrations(dir, &applied)? {
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("reading migration {}", path.display()))?;
            info!(version, file = ?path, "applying migration");
            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(&sql).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO _sqlx_migrations(version, description) VALUES ($1, $2)")
                .persistent(false)
                .bind(version)
                .bind(&desc)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }
        info!("migrations up-to-date");
        Ok(())
    }
}

/// `0003_add_contact.sql` -> `(3, "add_contact")`.
fn parse_migration_filename(fname: &str) -> Option<(i64, String)> {
    let stem = fname.strip_suffix(".sql")?;
    let digits_end = stem.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let (num, rest) = stem.split_at(digits_end);
    let desc = rest.strip_prefix('_')?;
    Some((num.parse().ok()?, desc.to_string()))
}

fn pending_migrations(dir: &Path, applied: &HashSet<i64>) -> Result<Vec<(i64, String, PathBuf)>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some((version, desc)) = path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(parse_migration_filename)
        else {
            continue;
        };
        if !applied.contains(&version) {
            candidates.push((version, desc, path));
        }
    }
    candidates.sort_by_key(|(v, _, _)| *v);
    Ok(candidates)
}
