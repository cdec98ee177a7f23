use crate::helpers::{
    body_json, create_user, flash_messages, get, location, make_test_app, post_form,
    session_cookie,
};
use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::event::{self, EventType, NewEvent};
use db::models::sessional_mark;
use db::models::user::Role;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tower::ServiceExt;
use util::state::AppState;

async fn create_event(state: &AppState, owner: i64, title: &str, max_marks: i32) -> event::Model {
    event::Model::create(
        state.db(),
        owner,
        NewEvent {
            title: title.into(),
            event_type: EventType::Quiz,
            date: NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
            time: None,
            venue: "Room 101".into(),
            description: "Weekly quiz".into(),
            max_marks,
        },
    )
    .await
    .unwrap()
}

const EVENT_BODY: &str =
    "title=Midterm&event_type=sessional&date=2030-05-10&time=09%3A30&venue=Hall+A&description=Covers+units+1-3&max_marks=50";

#[tokio::test]
async fn student_cannot_create_events() {
    let (app, state) = make_test_app().await;
    let student = create_user(&state, "stud", Role::Student).await;

    let response = app
        .oneshot(post_form("/events/create/", Some(&session_cookie(&student)), EVENT_BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    let messages = flash_messages(&response);
    assert_eq!(messages[0]["level"], "error");
    assert_eq!(messages[0]["message"], "You do not have permission to create events");
    assert_eq!(event::Model::count_all(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn faculty_creates_event_with_assigned_students() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let s1 = create_user(&state, "s1", Role::Student).await;
    let s2 = create_user(&state, "s2", Role::Student).await;

    let body = format!("{EVENT_BODY}&assigned_students={}&assigned_students={}", s1.id, s2.id);
    let response = app
        .oneshot(post_form("/events/create/", Some(&session_cookie(&faculty)), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/events/");
    assert_eq!(flash_messages(&response)[0]["message"], "Event created successfully!");

    let events = event::Model::find_all(state.db()).await.unwrap();
    assert_eq!(events.len(), 1);
    let created = &events[0];
    assert_eq!(created.title, "Midterm");
    assert_eq!(created.event_type, EventType::Sessional);
    assert_eq!(created.max_marks, 50);
    assert_eq!(created.created_by, faculty.id);
    assert!(created.time.is_some());

    let assigned = event::Model::assigned_student_ids(state.db(), created.id).await.unwrap();
    assert_eq!(assigned, vec![s1.id, s2.id]);
}

#[tokio::test]
async fn invalid_event_form_is_redisplayed() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;

    let response = app
        .oneshot(post_form(
            "/events/create/",
            Some(&session_cookie(&faculty)),
            "title=&event_type=sessional&date=2030-05-10&venue=Hall&description=x&max_marks=0",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["data"]["template"], "event_form.html");
    let errors = &json["data"]["context"]["errors"];
    assert!(errors["title"].is_array());
    assert_eq!(errors["max_marks"][0], "Ensure this value is greater than or equal to 1.");
    assert_eq!(event::Model::count_all(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn faculty_cannot_edit_or_delete_someone_elses_event() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    let other = create_user(&state, "other", Role::Faculty).await;
    let evt = create_event(&state, owner.id, "Quiz 1", 10).await;
    let cookie = session_cookie(&other);

    let response = app
        .clone()
        .oneshot(post_form(&format!("/events/{}/edit/", evt.id), Some(&cookie), EVENT_BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(
        flash_messages(&response)[0]["message"],
        "You do not have permission to edit this event"
    );

    let response = app
        .oneshot(post_form(&format!("/events/{}/delete/", evt.id), Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(
        flash_messages(&response)[0]["message"],
        "You do not have permission to delete this event"
    );

    let unchanged = event::Model::find_by_id(state.db(), evt.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Quiz 1");
}

#[tokio::test]
async fn admin_edits_any_event() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    let admin = create_user(&state, "root", Role::Admin).await;
    let evt = create_event(&state, owner.id, "Quiz 1", 10).await;

    let response = app
        .oneshot(post_form(
            &format!("/events/{}/edit/", evt.id),
            Some(&session_cookie(&admin)),
            EVENT_BODY,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_messages(&response)[0]["message"], "Event updated successfully!");
    let updated = event::Model::find_by_id(state.db(), evt.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Midterm");
    assert_eq!(updated.max_marks, 50);
    assert_eq!(updated.created_by, owner.id);
}

#[tokio::test]
async fn deleting_event_removes_its_marks() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = create_event(&state, owner.id, "Quiz 1", 10).await;
    sessional_mark::Model::create(state.db(), student.id, evt.id, 7, "", owner.id)
        .await
        .unwrap();

    let response = app
        .oneshot(post_form(
            &format!("/events/{}/delete/", evt.id),
            Some(&session_cookie(&owner)),
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_messages(&response)[0]["message"], "Event deleted successfully!");
    assert!(event::Model::find_by_id(state.db(), evt.id).await.unwrap().is_none());
    assert_eq!(sessional_mark::Model::count_all(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn search_filters_event_list() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    create_event(&state, owner.id, "Database Quiz", 10).await;
    create_event(&state, owner.id, "Networks Project", 20).await;
    let cookie = session_cookie(&owner);

    let response = app
        .clone()
        .oneshot(get("/events/?query=database", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let events = json["data"]["context"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Database Quiz");
    assert_eq!(json["data"]["context"]["can_create"], true);

    let long = "x".repeat(101);
    let response = app
        .oneshot(get(&format!("/events/?query={long}"), Some(&cookie)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["context"]["events"].as_array().unwrap().len(), 2);
    assert!(json["data"]["context"]["search_form"]["errors"]["query"].is_array());
}

#[tokio::test]
async fn students_only_see_their_own_mark_on_event_detail() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    let s1 = create_user(&state, "s1", Role::Student).await;
    let s2 = create_user(&state, "s2", Role::Student).await;
    let evt = create_event(&state, owner.id, "Quiz 1", 10).await;
    sessional_mark::Model::create(state.db(), s1.id, evt.id, 7, "", owner.id).await.unwrap();
    sessional_mark::Model::create(state.db(), s2.id, evt.id, 9, "", owner.id).await.unwrap();

    let uri = format!("/events/{}/", evt.id);
    let json = body_json(app.clone().oneshot(get(&uri, Some(&session_cookie(&s1)))).await.unwrap()).await;
    let marks = json["data"]["context"]["marks"].as_array().unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0]["student_id"], s1.id);
    assert_eq!(json["data"]["context"]["can_modify"], false);

    let json = body_json(app.clone().oneshot(get(&uri, Some(&session_cookie(&owner)))).await.unwrap()).await;
    assert_eq!(json["data"]["context"]["marks"].as_array().unwrap().len(), 2);

    let response = app.oneshot(get("/events/9999/", Some(&session_cookie(&owner)))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn max_marks_cannot_drop_below_entered_marks() {
    let (app, state) = make_test_app().await;
    let owner = create_user(&state, "owner", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = create_event(&state, owner.id, "Quiz 1", 50).await;
    sessional_mark::Model::create(state.db(), student.id, evt.id, 45, "", owner.id)
        .await
        .unwrap();
    let cookie = session_cookie(&owner);
    let uri = format!("/events/{}/edit/", evt.id);

    let lowered = EVENT_BODY.replace("max_marks=50", "max_marks=10");
    let response = app.clone().oneshot(post_form(&uri, Some(&cookie), &lowered)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["context"]["errors"]["max_marks"][0],
        "Marks already entered up to 45"
    );
    let unchanged = event::Model::find_by_id(state.db(), evt.id).await.unwrap().unwrap();
    assert_eq!(unchanged.max_marks, 50);

    let exact = EVENT_BODY.replace("max_marks=50", "max_marks=45");
    let response = app.oneshot(post_form(&uri, Some(&cookie), &exact)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let updated = event::Model::find_by_id(state.db(), evt.id).await.unwrap().unwrap();
    assert_eq!(updated.max_marks, 45);
}

#[tokio::test]
async fn denial_keeps_messages_already_pending() {
    let (app, state) = make_test_app().await;
    let student = create_user(&state, "stud", Role::Student).await;

    let pending = utf8_percent_encode(r#"[{"level":"info","message":"Earlier"}]"#, NON_ALPHANUMERIC);
    let cookie = format!("{}; flash={pending}", session_cookie(&student));

    let response = app
        .oneshot(post_form("/events/create/", Some(&cookie), EVENT_BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    let messages: Vec<_> = flash_messages(&response)
        .into_iter()
        .map(|m| m["message"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(
        messages,
        vec!["Earlier", "You do not have permission to create events"]
    );
}
