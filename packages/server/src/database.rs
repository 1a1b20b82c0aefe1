use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    if is_sqlite_memory(db_url) {
        // Every pooled connection would get its own empty in-memory database.
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(20)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800));
    }
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

fn is_sqlite_memory(db_url: &str) -> bool {
    db_url.starts_with("sqlite::memory:") || db_url.contains("mode=memory")
}
