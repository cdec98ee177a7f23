use crate::seed::Seeder;
use chrono::{Duration, NaiveTime, Utc};
use db::models::event::{self, EventType, NewEvent};
use db::models::user::{self, Role};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::{DatabaseConnection, DbErr, Iterable};

const TOPICS: [&str; 8] = [
    "Data Structures",
    "Operating Systems",
    "Database Systems",
    "Computer Networks",
    "Discrete Mathematics",
    "Software Engineering",
    "Compiler Design",
    "Machine Learning",
];

const VENUES: [&str; 5] = ["Hall A", "Hall B", "Lab 1", "Lab 2", "Room 204"];

const MAX_MARKS: [i32; 5] = [10, 20, 25, 50, 100];

pub struct EventSeeder;

#[async_trait::async_trait]
impl Seeder for EventSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();

        let faculty = user::Model::find_by_role(db, Role::Faculty).await?;
        let students: Vec<i64> = user::Model::find_by_role(db, Role::Student)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let kinds: Vec<EventType> = EventType::iter().collect();
        let today = Utc::now().date_naive();

        for author in &faculty {
            for _ in 0..3 {
                let (Some(kind), Some(topic), Some(venue), Some(max_marks)) = (
                    kinds.choose(&mut rng),
                    TOPICS.choose(&mut rng),
                    VENUES.choose(&mut rng),
                    MAX_MARKS.choose(&mut rng),
                ) else {
                    continue;
                };

                let fields = NewEvent {
                    title: format!("{} {}", topic, kind.label()),
                    event_type: *kind,
                    date: today + Duration::days(rng.gen_range(-30..=60)),
                    time: NaiveTime::from_hms_opt(rng.gen_range(8..=16), 0, 0),
                    venue: venue.to_string(),
                    description: format!("{} for {}.", kind.label(), topic),
                    max_marks: *max_marks,
                };
                let created = event::Model::create(db, author.id, fields).await?;

                // A third of the events are restricted to a subset of students.
                if !students.is_empty() && rng.gen_bool(1.0 / 3.0) {
                    let count = rng.gen_range(1..=students.len());
                    let assigned: Vec<i64> =
                        students.choose_multiple(&mut rng, count).copied().collect();
                    event::Model::set_assigned_students(db, created.id, &assigned).await?;
                }
            }
        }

        Ok(())
    }
}
