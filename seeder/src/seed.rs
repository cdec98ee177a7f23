use async_trait::async_trait;
use colored::*;
use futures::FutureExt;
use sea_orm::{DatabaseConnection, DbErr};
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

#[async_trait]
pub trait Seeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr>;
}

/// Runs one seeder with a progress line. Any failure aborts the whole run.
pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, name: &str, db: &DatabaseConnection) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    let _ = io::stdout().flush();

    let start = Instant::now();
    match std::panic::AssertUnwindSafe(seeder.seed(db))
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(e)) => {
            println!("{}", "failed".red());
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
