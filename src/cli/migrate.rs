use crate::cli::MigrateCommand;
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path, command: Option<MigrateCommand>) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;

    match command {
        None => {
            db.migrate()?;
            tracing::info!("Migrations complete");
        }
        Some(MigrateCommand::Status) => show_status(&db)?,
    }

    Ok(())
}

fn show_status(db: &Database) -> Result<()> {
    let statuses = db.migration_status()?;

    println!("\n  Migration Status\n");
    println!("  {:<10} {:<70} Applied", "Version", "Description");
    println!("  {}", "-".repeat(100));

    for (version, description, applied_at) in &statuses {
        let applied = match applied_at {
            Some(ts) => format!("\x1b[32m✓\x1b[0m {}", ts),
            None => "\x1b[33m✗ pending\x1b[0m".to_string(),
        };
        println!(
            "  {:<10} {:<70} {}",
            format!("{:03}", version),
            description,
            applied
        );
    }

    let applied_count = statuses.iter().filter(|(_, _, ts)| ts.is_some()).count();
    let pending_count = statuses.len() - applied_count;

    println!();
    if pending_count > 0 {
        println!(
            "  {} applied, {} pending. Run `mediavault migrate` to apply.",
            applied_count, pending_count
        );
    } else {
        println!("  All {} migrations applied.", applied_count);
    }
    println!();

    Ok(())
}
