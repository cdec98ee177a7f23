mod dashboard_test;
mod events_test;
mod health_test;
mod marks_test;
mod users_test;
