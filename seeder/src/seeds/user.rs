use crate::seed::Seeder;
use db::models::user::{Model, Profile, Role};
use fake::{Fake, faker::name::en::FirstName};
use sea_orm::{DatabaseConnection, DbErr};

pub const DEFAULT_PASSWORD: &str = "password123";

const DEPARTMENTS: [&str; 4] = [
    "Computer Science",
    "Electrical Engineering",
    "Mathematics",
    "Physics",
];

pub struct UserSeeder;

/// Creates the account unless the username is already in use.
async fn ensure_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    profile: Profile,
) -> Result<(), DbErr> {
    if Model::find_by_username(db, username).await?.is_some() {
        return Ok(());
    }
    let email = format!("{username}@example.com");
    Model::create(db, username, &email, DEFAULT_PASSWORD, role, profile).await?;
    Ok(())
}

fn department() -> Option<String> {
    Some(DEPARTMENTS[fastrand::usize(..DEPARTMENTS.len())].to_string())
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed accounts
        ensure_user(db, "admin", Role::Admin, Profile::default()).await?;
        ensure_user(
            db,
            "faculty",
            Role::Faculty,
            Profile {
                department: department(),
                ..Default::default()
            },
        )
        .await?;
        ensure_user(
            db,
            "student",
            Role::Student,
            Profile {
                enrollment_no: Some("EN000000".into()),
                department: department(),
                ..Default::default()
            },
        )
        .await?;

        for i in 1..=3 {
            let profile = Profile {
                phone: Some(format!("555-{:04}", fastrand::u16(..10_000))),
                department: department(),
                ..Default::default()
            };
            ensure_user(db, &format!("faculty{i}"), Role::Faculty, profile).await?;
        }

        for i in 1..=20 {
            let name: String = FirstName().fake();
            let name: String = name
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase();
            let profile = Profile {
                phone: Some(format!("555-{:04}", fastrand::u16(..10_000))),
                enrollment_no: Some(format!("EN{:06}", i)),
                department: department(),
            };
            ensure_user(db, &format!("{name}{i:02}"), Role::Student, profile).await?;
        }

        Ok(())
    }
}
