use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use std::collections::HashMap;
use sea_orm::{QueryOrder, QuerySelect, Set};
use serde::Serialize;

use crate::models::{event, user};

/// A single score for one student on one event. At most one row per pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessional_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub marks_obtained: i32,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    pub entered_by: i64,
    pub entered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EnteredBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    EnteredBy,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A mark together with the event it was awarded for.
#[derive(Debug, Clone, Serialize)]
pub struct MarkWithEvent {
    #[serde(flatten)]
    pub mark: Model,
    pub event: event::Model,
    pub percentage: f64,
}

/// A mark together with the student it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct MarkWithStudent {
    #[serde(flatten)]
    pub mark: Model,
    pub student: user::Model,
}

/// A mark with the names an overview table needs.
#[derive(Debug, Clone, Serialize)]
pub struct MarkDetail {
    #[serde(flatten)]
    pub mark: Model,
    pub student_username: String,
    pub event_title: String,
    pub max_marks: i32,
    pub percentage: f64,
}

impl Model {
    pub async fn create(
        db: &DbConn,
        student_id: i64,
        event_id: i64,
        marks_obtained: i32,
        remarks: &str,
        entered_by: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            student_id: Set(student_id),
            event_id: Set(event_id),
            marks_obtained: Set(marks_obtained),
            remarks: Set(remarks.trim().to_owned()),
            entered_by: Set(entered_by),
            entered_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Score as a share of `max_marks`, in percent. Zero when `max_marks` is not positive.
    pub fn percentage(&self, max_marks: i32) -> f64 {
        if max_marks <= 0 {
            return 0.0;
        }
        f64::from(self.marks_obtained) / f64::from(max_marks) * 100.0
    }

    pub async fn exists_for(db: &DbConn, student_id: i64, event_id: i64) -> Result<bool, DbErr> {
        let count = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::EventId.eq(event_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// The student's marks, most recently entered first.
    pub async fn for_student_with_event(
        db: &DbConn,
        student_id: i64,
    ) -> Result<Vec<MarkWithEvent>, DbErr> {
        let rows = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(event::Entity)
            .order_by_desc(Column::EnteredAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(mark, event)| {
                event.map(|event| MarkWithEvent {
                    percentage: mark.percentage(event.max_marks),
                    mark,
                    event,
                })
            })
            .collect())
    }

    /// Marks recorded for an event, ordered by student username.
    pub async fn for_event_with_student(
        db: &DbConn,
        event_id: i64,
    ) -> Result<Vec<MarkWithStudent>, DbErr> {
        let rows = Entity::find()
            .filter(Column::EventId.eq(event_id))
            .find_also_related(user::Entity)
            .order_by_asc(user::Column::Username)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(mark, student)| student.map(|student| MarkWithStudent { mark, student }))
            .collect())
    }

    /// The most recent marks entered by `user_id`, newest first.
    pub async fn recent_entered_by(
        db: &DbConn,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<(Model, Option<event::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::EnteredBy.eq(user_id))
            .find_also_related(event::Entity)
            .order_by_desc(Column::EnteredAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn count_entered_by(db: &DbConn, user_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::EnteredBy.eq(user_id))
            .count(db)
            .await
    }

    /// Highest score stored for the event, if any mark exists.
    pub async fn highest_for_event(db: &DbConn, event_id: i64) -> Result<Option<i32>, DbErr> {
        let highest: Option<Option<i32>> = Entity::find()
            .select_only()
            .column_as(Column::MarksObtained.max(), "highest")
            .filter(Column::EventId.eq(event_id))
            .into_tuple()
            .one(db)
            .await?;
        Ok(highest.flatten())
    }

    pub async fn count_all(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// Every mark with student and event resolved, most recently entered first.
    pub async fn find_all_detailed(db: &DbConn) -> Result<Vec<MarkDetail>, DbErr> {
        let marks = Entity::find()
            .order_by_desc(Column::EnteredAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        let students: HashMap<i64, String> = user::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let events: HashMap<i64, event::Model> = event::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        Ok(marks
            .into_iter()
            .filter_map(|mark| {
                let event = events.get(&mark.event_id)?;
                let student_username = students.get(&mark.student_id)?.clone();
                Some(MarkDetail {
                    student_username,
                    event_title: event.title.clone(),
                    max_marks: event.max_marks,
                    percentage: mark.percentage(event.max_marks),
                    mark,
                })
            })
            .collect())
    }
}
