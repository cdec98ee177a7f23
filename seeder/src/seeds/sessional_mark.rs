use crate::seed::Seeder;
use chrono::Utc;
use db::models::event;
use db::models::sessional_mark::Model;
use db::models::user::{self, Role};
use sea_orm::{DatabaseConnection, DbErr};

const REMARKS: [&str; 4] = ["", "Good work", "Needs improvement", "Excellent"];

pub struct SessionalMarkSeeder;

#[async_trait::async_trait]
impl Seeder for SessionalMarkSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let today = Utc::now().date_naive();
        let students: Vec<i64> = user::Model::find_by_role(db, Role::Student)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        for evt in event::Model::find_all(db).await? {
            if evt.date > today {
                continue;
            }

            let assigned = event::Model::assigned_student_ids(db, evt.id).await?;
            let eligible = if assigned.is_empty() { &students } else { &assigned };

            for &student_id in eligible {
                if fastrand::u8(..10) >= 8 || Model::exists_for(db, student_id, evt.id).await? {
                    continue;
                }
                let marks = fastrand::i32(0..=evt.max_marks);
                let remarks = REMARKS[fastrand::usize(..REMARKS.len())];
                Model::create(db, student_id, evt.id, marks, remarks, evt.created_by).await?;
            }
        }

        Ok(())
    }
}
