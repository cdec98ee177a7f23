use crate::helpers::{
    body_json, create_user, flash_messages, get, location, make_test_app, post_form,
    session_cookie,
};
use axum::http::{StatusCode, header};
use chrono::{Duration, Utc};
use db::models::event::{self, EventType, NewEvent};
use db::models::notification::{self, TargetRole};
use db::models::sessional_mark;
use db::models::user::Role;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tower::ServiceExt;
use util::state::AppState;

async fn event_in(state: &AppState, owner: i64, title: &str, days: i64) -> event::Model {
    event::Model::create(
        state.db(),
        owner,
        NewEvent {
            title: title.into(),
            event_type: EventType::Sessional,
            date: (Utc::now() + Duration::days(days)).date_naive(),
            time: None,
            venue: "Hall".into(),
            description: String::new(),
            max_marks: 20,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn student_dashboard_shows_own_records() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let other = create_user(&state, "other", Role::Student).await;

    let past = event_in(&state, faculty.id, "Past", -10).await;
    event_in(&state, faculty.id, "Open", 5).await;
    let private = event_in(&state, faculty.id, "Private", 7).await;
    event::Model::set_assigned_students(state.db(), private.id, &[other.id])
        .await
        .unwrap();
    sessional_mark::Model::create(state.db(), student.id, past.id, 15, "", faculty.id)
        .await
        .unwrap();
    notification::Model::create(state.db(), faculty.id, "For students", "m", TargetRole::Student, true)
        .await
        .unwrap();
    notification::Model::create(state.db(), faculty.id, "For faculty", "m", TargetRole::Faculty, true)
        .await
        .unwrap();

    let response = app
        .oneshot(get("/dashboard/", Some(&session_cookie(&student))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["template"], "student_dashboard.html");
    let context = &json["data"]["context"];
    assert_eq!(context["total_events"], 1);
    assert_eq!(context["marks"][0]["percentage"], 75.0);
    assert_eq!(context["marks"][0]["event"]["title"], "Past");

    let upcoming: Vec<&str> = context["upcoming_events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(upcoming, vec!["Open"]);

    let notifications = context["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "For students");
}

#[tokio::test]
async fn faculty_and_admin_dashboards_report_totals() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = event_in(&state, faculty.id, "Quiz", 1).await;
    event_in(&state, admin.id, "Admin event", 2).await;
    sessional_mark::Model::create(state.db(), student.id, evt.id, 10, "", faculty.id)
        .await
        .unwrap();

    let json = body_json(
        app.clone()
            .oneshot(get("/dashboard/", Some(&session_cookie(&faculty))))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["template"], "faculty_dashboard.html");
    assert_eq!(json["data"]["context"]["total_events"], 1);
    assert_eq!(json["data"]["context"]["total_marks_entered"], 1);

    let json = body_json(
        app.oneshot(get("/dashboard/", Some(&session_cookie(&admin))))
            .await
            .unwrap(),
    )
    .await;
    let context = &json["data"]["context"];
    assert_eq!(json["data"]["template"], "admin_dashboard.html");
    assert_eq!(context["total_users"], 3);
    assert_eq!(context["total_students"], 1);
    assert_eq!(context["total_faculty"], 1);
    assert_eq!(context["total_events"], 2);
    assert_eq!(context["total_marks"], 1);
    assert_eq!(context["marks"][0]["student_username"], "stud");
}

#[tokio::test]
async fn rendered_page_consumes_flash_cookie() {
    let (app, state) = make_test_app().await;
    let student = create_user(&state, "stud", Role::Student).await;

    let flash = utf8_percent_encode(
        r#"[{"level":"success","message":"Saved"}]"#,
        NON_ALPHANUMERIC,
    )
    .to_string();
    let cookie = format!("{}; flash={flash}", session_cookie(&student));

    let response = app.oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let expired = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("flash=") && v.contains("Max-Age=0"));
    assert!(expired);

    let json = body_json(response).await;
    assert_eq!(json["data"]["messages"][0]["message"], "Saved");
    assert_eq!(json["data"]["messages"][0]["level"], "success");
}

#[tokio::test]
async fn revaluation_requests_are_for_students() {
    let (app, state) = make_test_app().await;
    let student = create_user(&state, "stud", Role::Student).await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let body = "exam_title=Midterm&type=recheck&reason=Totals+look+wrong";

    let response = app
        .clone()
        .oneshot(post_form("/request_reval/", Some(&session_cookie(&student)), body))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(
        flash_messages(&response)[0]["message"],
        "Your request was submitted successfully."
    );

    let response = app
        .oneshot(post_form("/request_reval/", Some(&session_cookie(&faculty)), body))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(flash_messages(&response)[0]["level"], "error");
    assert_eq!(flash_messages(&response)[0]["message"], "Invalid request");
}
