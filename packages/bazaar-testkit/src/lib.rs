mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "BAZAAR_PG_DSN";

const DATABASE_PREFIX: &str = "bazaar_test";
const MAINTENANCE_DATABASE: &str = "postgres";

/// An empty database of its own for one test. Dropped on `cleanup`, or when the value goes out of
/// scope.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// Creates a database on the server named by `BAZAAR_PG_DSN`. Returns `None` and prints a skip
	/// notice for `suite` when the variable is unset.
	pub async fn from_env(suite: &str) -> Result<Option<Self>> {
		let Some(base_dsn) = env_dsn() else {
			eprintln!("Skipping {suite} tests; set {DSN_ENV} to run this test.");

			return Ok(None);
		};

		Self::create(&base_dsn).await.map(Some)
	}

	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("{DSN_ENV} is not a valid DSN: {err}.")))?;
		let (admin_options, mut admin) = admin_connection(&base_options).await?;
		let name = format!("{DATABASE_PREFIX}_{}", Uuid::new_v4().simple());

		admin
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Could not create {name}: {err}.")))?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Pool settings pointing at this database, sized for a single test.
	pub fn postgres_config(&self) -> bazaar_config::Postgres {
		bazaar_config::Postgres {
			dsn: self.dsn.clone(),
			pool_max_conns: 2,
			acquire_timeout_ms: 5_000,
			statement_timeout_ms: 5_000,
		}
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin_options).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		// The owning runtime may already be shutting down, so use a private one.
		let worker = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &admin_options)));

			if let Err(err) = result {
				eprintln!("Leaked test database {name}: {err}");
			}
		});
		let _ = worker.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Connects to the maintenance database, or to the DSN's own database when that is refused.
async fn admin_connection(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let maintenance = base_options.clone().database(MAINTENANCE_DATABASE);

	match PgConnection::connect_with(&maintenance).await {
		Ok(conn) => Ok((maintenance, conn)),
		Err(first) => {
			let conn = PgConnection::connect_with(base_options).await.map_err(|err| {
				Error::Message(format!("No admin connection ({first}); base DSN also failed: {err}."))
			})?;

			Ok((base_options.clone(), conn))
		},
	}
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await?;

	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
