//! Per-test database provisioning.
//!
//! All tests share one PostgreSQL container; each [`TestDb`] creates its
//! own database inside it and runs the migrations there. Isolation is
//! database-level, so services commit normally and tests never need a
//! rollback step. Dropped databases are removed by a background task so
//! `Drop` stays synchronous.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const DB_USER: &str = "feria_test";
const DB_PASSWORD: &str = "feria_test_password";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROP_QUEUE: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

/// An isolated, migrated database inside the shared container.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        // Make sure the drop worker exists before the first Drop can fire.
        DROP_QUEUE.get_or_init(spawn_drop_worker).await;

        let name = fresh_name();
        let admin_url = admin_url().await;

        let mut admin = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to the container's postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");

        admin
            .close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&format!("{}/{name}", base_url().await))
            .await
            .expect("Failed to open pool for test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(drops) = DROP_QUEUE.get() {
            let _ = drops.send(self.name.clone());
        }
    }
}

/// Unique database name per test. Only ascii alphanumerics and
/// underscores, so it is safe to splice into DDL.
fn fresh_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();

    let thread = format!("{:?}", std::thread::current().id());
    let thread: String = thread.chars().filter(char::is_ascii_digit).collect();

    format!("feria_test_{nanos}_{thread}")
}

async fn container() -> &'static ContainerAsync<PostgresImage> {
    CONTAINER
        .get_or_init(|| async {
            PostgresImage::default()
                .with_user(DB_USER)
                .with_password(DB_PASSWORD)
                .with_db_name("feria_test")
                .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
                .start()
                .await
                .expect("Failed to start PostgreSQL container")
        })
        .await
}

/// Connection URL prefix for the shared container, without a database.
async fn base_url() -> String {
    let container = container().await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to resolve container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{DB_USER}:{DB_PASSWORD}@{host}:{port}")
}

async fn admin_url() -> String {
    format!("{}/postgres", base_url().await)
}

async fn spawn_drop_worker() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    // Names come from fresh_name; anything else is not ours to drop.
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Ok(());
    }

    let mut admin = PgConnection::connect(&admin_url().await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut admin)
        .await?;

    admin.close().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_names_are_ddl_safe_and_unique() {
        let first = fresh_name();
        let second = fresh_name();

        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        );
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_migrations_run_on_a_fresh_database() {
        let db = TestDb::new().await;

        let tenants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
            .fetch_one(db.pool())
            .await
            .expect("migrated schema should have a tenants table");

        assert_eq!(tenants, 0);
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("INSERT INTO users (uuid, email, name) VALUES (gen_random_uuid(), 'a@b.c', 'A')")
            .execute(first.pool())
            .await
            .expect("insert into first database");

        let seen_by_second: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(second.pool())
            .await
            .expect("count users in second database");

        assert_eq!(seen_by_second, 0);
    }
}
