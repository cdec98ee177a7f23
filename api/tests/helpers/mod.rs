pub mod app;

pub use app::{
    body_json, create_user, flash_messages, get, location, make_test_app, post_form,
    session_cookie,
};
