use common::FieldErrors;
use db::models::event::{self, EventType, NewEvent};
use db::models::sessional_mark;
use db::models::user::{self, Role};
use sea_orm::{DbConn, DbErr, Iterable};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use validator::Validate;

use crate::routes::common::{Choice, REQUIRED, form_context, parse_date, parse_int, parse_optional_time};

/// Submitted event fields. `assigned_students` may repeat.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EventForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub title: String,
    pub event_type: String,
    pub date: String,
    pub time: String,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub venue: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
    pub max_marks: String,
    pub assigned_students: Vec<String>,
}

/// A validated form, ready for the store.
#[derive(Debug)]
pub struct CleanEvent {
    pub fields: NewEvent,
    pub assigned_students: Vec<i64>,
}

impl EventForm {
    pub fn from_model(event: &event::Model, assigned: &[i64]) -> Self {
        Self {
            title: event.title.clone(),
            event_type: event.event_type.to_string(),
            date: event.date.format("%Y-%m-%d").to_string(),
            time: event
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            venue: event.venue.clone(),
            description: event.description.clone(),
            max_marks: event.max_marks.to_string(),
            assigned_students: assigned.iter().map(i64::to_string).collect(),
        }
    }

    /// Validates every field and resolves assigned ids against the student list.
    ///
    /// When `editing` is set, `max_marks` may not drop below a mark already entered.
    pub async fn clean(
        &self,
        db: &DbConn,
        editing: Option<&event::Model>,
    ) -> Result<Result<CleanEvent, FieldErrors>, DbErr> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }
        for (field, value) in [("title", &self.title), ("description", &self.description)] {
            if value.trim().is_empty() && errors.get(field).is_none() {
                errors.add(field, REQUIRED);
            }
        }

        let event_type = if self.event_type.trim().is_empty() {
            Some(EventType::default())
        } else {
            EventType::from_str(self.event_type.trim())
                .map_err(|_| errors.add("event_type", "Select a valid choice."))
                .ok()
        };
        let date = parse_date(&self.date, "date", &mut errors);
        let time = parse_optional_time(&self.time, "time", &mut errors);
        let max_marks = parse_int(&self.max_marks, "max_marks", &mut errors);
        if matches!(max_marks, Some(m) if m < 1) {
            errors.add("max_marks", "Ensure this value is greater than or equal to 1.");
        }
        if let (Some(max), Some(event)) = (max_marks, editing) {
            if let Some(highest) = sessional_mark::Model::highest_for_event(db, event.id).await? {
                if max < highest && max >= 1 {
                    errors.add("max_marks", format!("Marks already entered up to {highest}"));
                }
            }
        }

        let students: Vec<i64> = user::Model::find_by_role(db, Role::Student)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let mut assigned = Vec::with_capacity(self.assigned_students.len());
        for raw in self.assigned_students.iter().filter(|s| !s.trim().is_empty()) {
            match raw.trim().parse::<i64>() {
                Ok(id) if students.contains(&id) => assigned.push(id),
                _ => errors.add(
                    "assigned_students",
                    format!("Select a valid choice. {} is not one of the available choices.", raw.trim()),
                ),
            }
        }

        Ok(match (event_type, date, max_marks) {
            (Some(event_type), Some(date), Some(max_marks)) if errors.is_empty() => Ok(CleanEvent {
                fields: NewEvent {
                    title: self.title.clone(),
                    event_type,
                    date,
                    time,
                    venue: self.venue.clone(),
                    description: self.description.clone(),
                    max_marks,
                },
                assigned_students: assigned,
            }),
            _ => Err(errors),
        })
    }
}

pub fn event_type_choices() -> Vec<Choice> {
    EventType::iter().map(|t| Choice::new(t, t.label())).collect()
}

/// Context for `event_form.html`.
pub async fn event_form_context(
    db: &DbConn,
    form: &EventForm,
    errors: &FieldErrors,
    title: &str,
    event: Option<&event::Model>,
) -> Result<Value, DbErr> {
    let students: Vec<Choice> = user::Model::find_by_role(db, Role::Student)
        .await?
        .into_iter()
        .map(|u| Choice::new(u.id, u.username))
        .collect();

    Ok(form_context(
        form,
        errors,
        json!({
            "title": title,
            "event": event,
            "event_types": event_type_choices(),
            "students": students,
        }),
    ))
}
