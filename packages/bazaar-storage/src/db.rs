use std::{str::FromStr, time::Duration};

use sqlx::{
	PgPool,
	postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &bazaar_config::Postgres) -> Result<Self> {
		let pool = pool_options(cfg).connect_with(connect_options(cfg)?).await?;

		Ok(Self { pool })
	}

	/// Builds the pool without opening a connection. The first query connects.
	pub fn connect_lazy(cfg: &bazaar_config::Postgres) -> Result<Self> {
		let pool = pool_options(cfg).connect_lazy_with(connect_options(cfg)?);

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 4_120_907;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

fn pool_options(cfg: &bazaar_config::Postgres) -> PgPoolOptions {
	PgPoolOptions::new()
		.max_connections(cfg.pool_max_conns)
		.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
}

fn connect_options(cfg: &bazaar_config::Postgres) -> Result<PgConnectOptions> {
	let options = PgConnectOptions::from_str(&cfg.dsn)?
		.options([("statement_timeout", cfg.statement_timeout_ms.to_string())]);

	Ok(options)
}
