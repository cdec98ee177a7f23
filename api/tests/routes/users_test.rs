use crate::helpers::{
    body_json, create_user, flash_messages, get, location, make_test_app, post_form,
    session_cookie,
};
use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::event::{self, EventType, NewEvent};
use db::models::sessional_mark;
use db::models::user::{self, Role};
use tower::ServiceExt;

#[tokio::test]
async fn admin_changes_role_and_profile() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;
    let target = create_user(&state, "pat", Role::Student).await;

    let response = app
        .oneshot(post_form(
            &format!("/edit_user/{}/", target.id),
            Some(&session_cookie(&admin)),
            "username=pat&email=pat%40uni.edu&role=faculty&department=Physics&phone=&enrollment_no=",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(flash_messages(&response)[0]["message"], "User details updated successfully.");

    let updated = user::Model::find_by_id(state.db(), target.id).await.unwrap().unwrap();
    assert_eq!(updated.role, Role::Faculty);
    assert_eq!(updated.email, "pat@uni.edu");
    assert_eq!(updated.department.as_deref(), Some("Physics"));
    assert_eq!(updated.phone, None);
    assert!(updated.verify_password("password123"));
}

#[tokio::test]
async fn edit_user_rejects_unknown_role_and_taken_username() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;
    let target = create_user(&state, "pat", Role::Student).await;

    let response = app
        .oneshot(post_form(
            &format!("/edit_user/{}/", target.id),
            Some(&session_cookie(&admin)),
            "username=root&email=pat%40example.com&role=superuser",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["data"]["template"], "edit_user.html");
    let errors = &json["data"]["context"]["errors"];
    assert!(errors["role"].is_array());
    assert_eq!(errors["username"][0], "A user with that username already exists.");

    let unchanged = user::Model::find_by_id(state.db(), target.id).await.unwrap().unwrap();
    assert_eq!(unchanged.role, Role::Student);
}

#[tokio::test]
async fn non_admins_cannot_manage_users() {
    let (app, state) = make_test_app().await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let target = create_user(&state, "pat", Role::Student).await;
    let cookie = session_cookie(&faculty);

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/edit_user/{}/", target.id),
            Some(&cookie),
            "username=pat&email=pat%40example.com&role=admin",
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/");
    assert_eq!(flash_messages(&response)[0]["message"], "Unauthorized");

    let response = app
        .oneshot(post_form(&format!("/delete_user/{}/", target.id), Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/");

    let unchanged = user::Model::find_by_id(state.db(), target.id).await.unwrap().unwrap();
    assert_eq!(unchanged.role, Role::Student);
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;

    let response = app
        .oneshot(post_form(
            &format!("/delete_user/{}/", admin.id),
            Some(&session_cookie(&admin)),
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_messages(&response)[0]["message"], "You cannot delete your own account");
    assert!(user::Model::find_by_id(state.db(), admin.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_faculty_removes_their_events_and_marks() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;
    let faculty = create_user(&state, "prof", Role::Faculty).await;
    let student = create_user(&state, "stud", Role::Student).await;
    let evt = event::Model::create(
        state.db(),
        faculty.id,
        NewEvent {
            title: "Lab".into(),
            event_type: EventType::Workshop,
            date: NaiveDate::from_ymd_opt(2030, 2, 2).unwrap(),
            time: None,
            venue: "Lab 1".into(),
            description: String::new(),
            max_marks: 10,
        },
    )
    .await
    .unwrap();
    sessional_mark::Model::create(state.db(), student.id, evt.id, 8, "", faculty.id)
        .await
        .unwrap();

    let response = app
        .oneshot(post_form(
            &format!("/delete_user/{}/", faculty.id),
            Some(&session_cookie(&admin)),
            "",
        ))
        .await
        .unwrap();

    assert_eq!(flash_messages(&response)[0]["message"], "User deleted.");
    assert!(user::Model::find_by_id(state.db(), faculty.id).await.unwrap().is_none());
    assert!(event::Model::find_by_id(state.db(), evt.id).await.unwrap().is_none());
    assert_eq!(sessional_mark::Model::count_all(state.db()).await.unwrap(), 0);
    assert!(user::Model::find_by_id(state.db(), student.id).await.unwrap().is_some());
}

#[tokio::test]
async fn admin_creates_user_with_any_role() {
    let (app, state) = make_test_app().await;
    let admin = create_user(&state, "root", Role::Admin).await;

    let response = app
        .oneshot(post_form(
            "/users/create/",
            Some(&session_cookie(&admin)),
            "username=second&email=second%40example.com&password1=longpassword&password2=longpassword&role=admin",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_messages(&response)[0]["message"], "User second created successfully.");
    let created = user::Model::find_by_username(state.db(), "second").await.unwrap().unwrap();
    assert_eq!(created.role, Role::Admin);
}

#[tokio::test]
async fn change_password_checks_old_password() {
    let (app, state) = make_test_app().await;
    let student = create_user(&state, "stud", Role::Student).await;
    let cookie = session_cookie(&student);

    let response = app
        .clone()
        .oneshot(post_form(
            "/password/",
            Some(&cookie),
            "old_password=wrong&new_password1=brandnewpass&new_password2=brandnewpass",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["context"]["errors"]["old_password"][0],
        "Your old password was entered incorrectly. Please enter it again."
    );

    let response = app
        .clone()
        .oneshot(post_form(
            "/password/",
            Some(&cookie),
            "old_password=password123&new_password1=brandnewpass&new_password2=brandnewpass",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_messages(&response)[0]["message"], "Your password was changed successfully.");

    let reloaded = user::Model::find_by_id(state.db(), student.id).await.unwrap().unwrap();
    assert!(reloaded.verify_password("brandnewpass"));

    let response = app.oneshot(get("/password/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
