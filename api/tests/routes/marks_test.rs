use crate::helpers::{
    body_json, create_user, flash_messages, get, location, make_test_app, post_form,
    session_cookie,
};
use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::event::{self, EventType, NewEvent};
use db::models::sessional_mark;
use db::models::user::Role;
use tower::ServiceExt;
use util::state::AppState;

async fn quiz(state: &AppState, owner: i64, max_marks: i32) -> event::Model {
    event::Model::create(
        state.db(),
        owner,
        NewEvent {
            title: "Quiz".into(),
            event_type: EventType::Quiz,
            date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            time: None,
            venue: "Lab 2".into(),
            description: String::new(),
            max_marks,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn faculty_enters_marks() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = quiz(&state, faculty.id, 50).await;
    let cookie = session_cookie(&faculty);

    let body = format!(
        "student={}&event={}&marks_obtained=25&remarks=Good+work",
        student.id, evt.id
    );
    let response = app
        .clone()
        .oneshot(post_form("/marks/entry/", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/marks/entry/");
    assert_eq!(flash_messages(&response)[0]["message"], "Marks entered successfully!");

    let marks = sessional_mark::Model::for_student_with_event(state.db(), student.id)
        .await
        .unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].mark.marks_obtained, 25);
    assert_eq!(marks[0].mark.entered_by, faculty.id);
    assert_eq!(marks[0].mark.remarks, "Good work");

    let json = body_json(app.oneshot(get("/marks/entry/", Some(&cookie))).await.unwrap()).await;
    assert_eq!(json["data"]["template"], "mark_entry.html");
    assert_eq!(json["data"]["context"]["recent_marks"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["context"]["recent_marks"][0]["percentage"], 50.0);
}

#[tokio::test]
async fn marks_above_maximum_are_rejected() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = quiz(&state, faculty.id, 50).await;

    let body = format!("student={}&event={}&marks_obtained=55", student.id, evt.id);
    let response = app
        .oneshot(post_form("/marks/entry/", Some(&session_cookie(&faculty)), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["context"]["errors"]["marks_obtained"][0],
        "Marks cannot exceed 50"
    );
    assert_eq!(json["data"]["context"]["form"]["marks_obtained"], "55");
    assert_eq!(sessional_mark::Model::count_all(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn negative_marks_are_rejected() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = quiz(&state, faculty.id, 50).await;

    let body = format!("student={}&event={}&marks_obtained=-1", student.id, evt.id);
    let response = app
        .oneshot(post_form("/marks/entry/", Some(&session_cookie(&faculty)), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["context"]["errors"]["marks_obtained"][0],
        "Marks cannot be negative"
    );
}

#[tokio::test]
async fn second_mark_for_same_pair_is_rejected() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = quiz(&state, faculty.id, 50).await;
    sessional_mark::Model::create(state.db(), student.id, evt.id, 30, "", faculty.id)
        .await
        .unwrap();

    let body = format!("student={}&event={}&marks_obtained=40", student.id, evt.id);
    let response = app
        .oneshot(post_form("/marks/entry/", Some(&session_cookie(&faculty)), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["context"]["errors"]["__all__"][0],
        "Marks for this student and event already exist"
    );
    assert_eq!(sessional_mark::Model::count_all(state.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn students_cannot_enter_marks() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = quiz(&state, faculty.id, 50).await;

    let body = format!("student={}&event={}&marks_obtained=50", student.id, evt.id);
    let response = app
        .oneshot(post_form("/marks/entry/", Some(&session_cookie(&student)), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(flash_messages(&response)[0]["message"], "You do not have permission to enter marks");
    assert_eq!(sessional_mark::Model::count_all(state.db()).await.unwrap(), 0);
}
