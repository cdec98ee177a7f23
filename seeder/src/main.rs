use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    event::EventSeeder, notification::NotificationSeeder, sessional_mark::SessionalMarkSeeder,
    user::UserSeeder,
};
use colored::*;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "DB connection failed:".red(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {}", "Migrations failed:".red(), e);
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(EventSeeder), "Event"),
        (Box::new(SessionalMarkSeeder), "SessionalMark"),
        (Box::new(NotificationSeeder), "Notification"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
