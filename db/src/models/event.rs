use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::{event_assigned_student, sessional_mark};

/// Kind of gradable activity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_type_enum")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventType {
    #[default]
    #[sea_orm(string_value = "sessional")]
    Sessional,
    #[sea_orm(string_value = "assignment")]
    Assignment,
    #[sea_orm(string_value = "project")]
    Project,
    #[sea_orm(string_value = "quiz")]
    Quiz,
    #[sea_orm(string_value = "workshop")]
    Workshop,
}

impl EventType {
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Sessional => "Sessional Exam",
            EventType::Assignment => "Assignment",
            EventType::Project => "Project",
            EventType::Quiz => "Quiz",
            EventType::Workshop => "Workshop",
        }
    }
}

/// An exam, assignment or other activity with a maximum score.
///
/// Students listed in `event_assigned_students` are the only ones who see the
/// event; with no rows there, every student sees it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub event_type: EventType,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub venue: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub max_marks: i32,
    /// Owning user; only they (or an admin) may edit or delete the event.
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(has_many = "super::sessional_mark::Entity")]
    Marks,

    #[sea_orm(has_many = "super::event_assigned_student::Entity")]
    AssignedStudents,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::sessional_mark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl Related<super::event_assigned_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Editable fields of an event. Used for both create and edit.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub event_type: EventType,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub venue: String,
    pub description: String,
    pub max_marks: i32,
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn like_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

impl Model {
    pub async fn create(db: &DbConn, created_by: i64, fields: NewEvent) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            title: Set(fields.title.trim().to_owned()),
            event_type: Set(fields.event_type),
            date: Set(fields.date),
            time: Set(fields.time),
            venue: Set(fields.venue.trim().to_owned()),
            description: Set(fields.description),
            max_marks: Set(fields.max_marks),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn update(db: &DbConn, id: i64, fields: NewEvent) -> Result<Model, DbErr> {
        let event = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Event {} not found", id)))?;

        let mut active: ActiveModel = event.into();
        active.title = Set(fields.title.trim().to_owned());
        active.event_type = Set(fields.event_type);
        active.date = Set(fields.date);
        active.time = Set(fields.time);
        active.venue = Set(fields.venue.trim().to_owned());
        active.description = Set(fields.description);
        active.max_marks = Set(fields.max_marks);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// All events, newest date first.
    pub async fn find_all(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn find_by_creator(db: &DbConn, user_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CreatedBy.eq(user_id))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_all(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// Case-insensitive substring search over title, description and venue.
    ///
    /// A blank query returns every event.
    pub async fn search(db: &DbConn, query: &str) -> Result<Vec<Model>, DbErr> {
        let query = query.trim();
        if query.is_empty() {
            return Self::find_all(db).await;
        }

        let matches = |column: Column| {
            Expr::expr(Func::lower(Expr::col((Entity, column)))).like(like_pattern(query))
        };

        Entity::find()
            .filter(
                Condition::any()
                    .add(matches(Column::Title))
                    .add(matches(Column::Description))
                    .add(matches(Column::Venue)),
            )
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Events on or after `today` that the student may see.
    pub async fn upcoming_for_student(
        db: &DbConn,
        student_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<Model>, DbErr> {
        let restricted = event_assigned_student::Entity::find()
            .all(db)
            .await?;

        let events = Entity::find()
            .filter(Column::Date.gte(today))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        Ok(events
            .into_iter()
            .filter(|event| {
                let mut assigned = restricted.iter().filter(|a| a.event_id == event.id).peekable();
                assigned.peek().is_none() || assigned.any(|a| a.student_id == student_id)
            })
            .collect())
    }

    pub async fn assigned_student_ids(db: &DbConn, event_id: i64) -> Result<Vec<i64>, DbErr> {
        Ok(event_assigned_student::Entity::find()
            .filter(event_assigned_student::Column::EventId.eq(event_id))
            .order_by_asc(event_assigned_student::Column::StudentId)
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.student_id)
            .collect())
    }

    /// Replaces the assignment list of an event.
    pub async fn set_assigned_students(
        db: &DbConn,
        event_id: i64,
        student_ids: &[i64],
    ) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        event_assigned_student::Entity::delete_many()
            .filter(event_assigned_student::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;

        let mut ids = student_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if !ids.is_empty() {
            event_assigned_student::Entity::insert_many(ids.into_iter().map(|student_id| {
                event_assigned_student::ActiveModel {
                    event_id: Set(event_id),
                    student_id: Set(student_id),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await
    }

    /// Deletes the event, its marks and its assignment rows in one transaction.
    pub async fn delete_with_marks(db: &DbConn, id: i64) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        sessional_mark::Entity::delete_many()
            .filter(sessional_mark::Column::EventId.eq(id))
            .exec(&txn)
            .await?;

        event_assigned_student::Entity::delete_many()
            .filter(event_assigned_student::Column::EventId.eq(id))
            .exec(&txn)
            .await?;

        Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await
    }
}
