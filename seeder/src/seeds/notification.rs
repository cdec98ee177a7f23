use crate::seed::Seeder;
use db::models::notification::{Model, TargetRole};
use db::models::user::{self, Role};
use sea_orm::{DatabaseConnection, DbErr, Iterable};

pub struct NotificationSeeder;

#[async_trait::async_trait]
impl Seeder for NotificationSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let Some(admin) = user::Model::find_by_role(db, Role::Admin).await?.into_iter().next()
        else {
            return Err(DbErr::Custom("No admin found; run UserSeeder first".into()));
        };

        for target in TargetRole::iter() {
            Model::create(
                db,
                admin.id,
                &format!("Notice for {}", target.label()),
                "Please check the updated sessional schedule on the events page.",
                target,
                true,
            )
            .await?;
        }

        Model::create(
            db,
            admin.id,
            "Draft: semester results",
            "Results will be published after moderation.",
            TargetRole::All,
            false,
        )
        .await?;

        for author in user::Model::find_by_role(db, Role::Faculty).await? {
            Model::create(
                db,
                author.id,
                "Quiz reminder",
                &format!("{} reminds you that marks for the latest quiz are now available.", author.username),
                TargetRole::Student,
                true,
            )
            .await?;
        }

        Ok(())
    }
}
