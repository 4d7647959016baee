use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

// Server part of the URL, without the database name
fn server_url() -> Option<String> {
    dotenv().ok();
    let db_url = env::var("DATABASE_URL").ok()?;
    Some(db_url.split('/').collect::<Vec<&str>>()[..3].join("/"))
}

async fn connect(url: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new().max_connections(10).connect(url).await
}

impl TestDb {
    /// One shared test database per run. Returns None when DATABASE_URL is
    /// not configured, so DB-backed tests can skip instead of failing.
    pub async fn try_instance() -> Option<Pool> {
        let base_url = server_url()?;

        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        if let Some(db) = guard.as_ref() {
            return Some(db.pool.clone());
        }

        match Self::setup_database(&base_url).await {
            Ok(db) => {
                let pool = db.pool.clone();
                *guard = Some(db);
                Some(pool)
            }
            Err(e) => {
                eprintln!("test database setup failed: {}", e);
                None
            }
        }
    }

    async fn setup_database(base_url: &str) -> Result<Self, Error> {
        let db_name = DB_NAME
            .get_or_init(|| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                format!("movie_test_{}", timestamp)
            })
            .clone();

        let admin_pool = connect(base_url).await?;
        sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = connect(&format!("{}/{}", base_url, db_name)).await?;
        Self::create_tables(&pool).await?;

        Ok(Self { pool, db_name })
    }

    async fn create_tables(pool: &Pool) -> Result<(), Error> {
        let tables = vec![
            "CREATE TABLE IF NOT EXISTS user (
                id INT AUTO_INCREMENT PRIMARY KEY,
                username VARCHAR(255) NOT NULL,
                password VARCHAR(255) NOT NULL,
                role ENUM('ADMIN', 'USER') DEFAULT 'USER' NOT NULL,
                CONSTRAINT user_username_uindex UNIQUE (username)
            )",
            "CREATE TABLE IF NOT EXISTS booking (
                id INT AUTO_INCREMENT PRIMARY KEY,
                user_id INT NOT NULL,
                user_name VARCHAR(255) NOT NULL,
                user_email VARCHAR(255) NOT NULL,
                movie_id VARCHAR(32) NOT NULL,
                movie_title VARCHAR(255) NOT NULL,
                show_date DATE NOT NULL,
                showtime VARCHAR(16) NOT NULL,
                seats TEXT NOT NULL,
                total_paid DECIMAL(10,2) NOT NULL,
                payment_id VARCHAR(64) NOT NULL,
                created_at DATETIME NOT NULL,
                expires_at DATETIME NOT NULL,
                CONSTRAINT booking_user_id_fk
                    FOREIGN KEY (user_id) REFERENCES user(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS booked_seat (
                id INT AUTO_INCREMENT PRIMARY KEY,
                booking_id INT NOT NULL,
                movie_id VARCHAR(32) NOT NULL,
                show_date DATE NOT NULL,
                showtime VARCHAR(16) NOT NULL,
                seat_id VARCHAR(4) NOT NULL,
                expires_at DATETIME NOT NULL,
                CONSTRAINT booked_seat_booking_id_fk
                    FOREIGN KEY (booking_id) REFERENCES booking(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS booking_session (
                user_id INT NOT NULL PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at DATETIME NOT NULL,
                CONSTRAINT booking_session_user_id_fk
                    FOREIGN KEY (user_id) REFERENCES user(id)
                    ON DELETE CASCADE
            )",
        ];

        for ddl in tables {
            sqlx::query(ddl).execute(pool).await?;
        }
        Ok(())
    }

    // Drop the run's database at process exit
    pub fn cleanup_database_sync() -> Result<(), Error> {
        let Some(db_name) = DB_NAME.get() else {
            return Ok(());
        };
        let Some(base_url) = server_url() else {
            return Ok(());
        };

        let runtime = tokio::runtime::Runtime::new().map_err(Error::Io)?;
        runtime.block_on(async {
            let admin_pool = connect(&base_url).await?;
            sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db_name))
                .execute(&admin_pool)
                .await?;
            Ok(())
        })
    }
}
