use anyhow::{Result, anyhow};
use movie_catalog_bot::config::{database_url_from_env, DEFAULT_DATABASE_URL};
use movie_catalog_bot::database::connection::{sqlite_file_path, DatabaseManager};
use movie_catalog_bot::database::models::CatalogStats;
use std::env;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// Only the database location is needed here, so the bot credentials are
/// not required.
fn database_url() -> String {
    dotenvy::dotenv().ok();
    database_url_from_env()
}

async fn run_migrations() -> Result<()> {
    println!("🎬 Movie Catalog Bot - Database Migration Tool");
    println!("==============================================");

    let database_url = database_url();
    println!("📊 Database URL: {}", mask_url(&database_url));

    println!("🚀 Running database migrations...");

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🎯 Your catalog database is ready!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    db_manager.close().await;
    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let database_url = database_url();
    println!("📊 Database URL: {}", mask_url(&database_url));

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    match CatalogStats::collect(&db_manager.pool).await {
        Ok(stats) => println!(
            "📈 Catalog: {} movies, {} categories, {} users",
            stats.movies, stats.categories, stats.users
        ),
        Err(e) => println!("⚠️  Could not read catalog counts: {e}"),
    }

    db_manager.close().await;
    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL movies, categories and users!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = database_url();

    // For SQLite, we can just delete the file
    if let Some(db_path) = sqlite_file_path(&database_url) {
        if db_path.exists() {
            std::fs::remove_file(db_path)?;
            println!("🗑️  Deleted database file: {}", db_path.display());
        }
    } else {
        return Err(anyhow!("Reset is only supported for SQLite databases"));
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name"
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    // Don't show full paths in logs
    if let Some(path) = sqlite_file_path(url) {
        if let Some(filename) = path.file_name() {
            format!("sqlite:.../{}", filename.to_string_lossy())
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}

fn print_help() {
    println!("🎬 Movie Catalog Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Create the catalog tables (default)");
    println!("    check          Check database connection, schema and catalog size");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: {DEFAULT_DATABASE_URL})");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                    # Run migrations");
    println!("    migrate check              # Check database status");
    println!("    migrate reset              # Reset database (careful!)");
    println!();
}
