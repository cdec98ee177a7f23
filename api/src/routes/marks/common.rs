use common::FieldErrors;
use db::models::user::{self, Role};
use db::models::{event, sessional_mark};
use sea_orm::{DbConn, DbErr};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::routes::common::{Choice, form_context, parse_id, parse_int};

pub const DUPLICATE_MARK: &str = "Marks for this student and event already exist";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
const RECENT_LIMIT: u64 = 10;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkForm {
    pub student: String,
    pub event: String,
    pub marks_obtained: String,
    pub remarks: String,
}

#[derive(Debug)]
pub struct CleanMark {
    pub student_id: i64,
    pub event: event::Model,
    pub marks_obtained: i32,
    pub remarks: String,
}

impl MarkForm {
    /// Checks the references, the score bounds and the one-mark-per-pair rule.
    pub async fn clean(&self, db: &DbConn) -> Result<Result<CleanMark, FieldErrors>, DbErr> {
        let mut errors = FieldErrors::new();

        let student = match parse_id(&self.student, "student", &mut errors) {
            Some(id) => user::Model::find_by_id(db, id)
                .await?
                .filter(|u| u.role == Role::Student),
            None => None,
        };
        if student.is_none() && errors.get("student").is_none() {
            errors.add("student", INVALID_CHOICE);
        }

        let event = match parse_id(&self.event, "event", &mut errors) {
            Some(id) => event::Model::find_by_id(db, id).await?,
            None => None,
        };
        if event.is_none() && errors.get("event").is_none() {
            errors.add("event", INVALID_CHOICE);
        }

        let marks_obtained = parse_int(&self.marks_obtained, "marks_obtained", &mut errors);
        if let Some(marks) = marks_obtained {
            if marks < 0 {
                errors.add("marks_obtained", "Marks cannot be negative");
            } else if let Some(event) = &event {
                if marks > event.max_marks {
                    errors.add("marks_obtained", format!("Marks cannot exceed {}", event.max_marks));
                }
            }
        }

        if let (Some(student), Some(event)) = (&student, &event) {
            if sessional_mark::Model::exists_for(db, student.id, event.id).await? {
                errors.add_non_field(DUPLICATE_MARK);
            }
        }

        Ok(match (student, event, marks_obtained) {
            (Some(student), Some(event), Some(marks_obtained)) if errors.is_empty() => Ok(CleanMark {
                student_id: student.id,
                event,
                marks_obtained,
                remarks: self.remarks.clone(),
            }),
            _ => Err(errors),
        })
    }
}

/// Context for `mark_entry.html`: the form, the choices and the actor's latest entries.
pub async fn mark_entry_context(
    db: &DbConn,
    actor_id: i64,
    form: &MarkForm,
    errors: &FieldErrors,
) -> Result<Value, DbErr> {
    let students: Vec<Choice> = user::Model::find_by_role(db, Role::Student)
        .await?
        .into_iter()
        .map(|u| Choice::new(u.id, u.username))
        .collect();
    let events: Vec<Choice> = event::Model::find_all(db)
        .await?
        .into_iter()
        .map(|e| Choice::new(e.id, format!("{} - {}", e.title, e.date)))
        .collect();
    let recent_marks: Vec<Value> = sessional_mark::Model::recent_entered_by(db, actor_id, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(|(mark, event)| {
            let percentage = event.as_ref().map(|e| mark.percentage(e.max_marks));
            json!({ "mark": mark, "event": event, "percentage": percentage })
        })
        .collect();

    Ok(form_context(
        form,
        errors,
        json!({
            "students": students,
            "events": events,
            "recent_marks": recent_marks,
        }),
    ))
}
