pub mod m202510150001_create_users;
pub mod m202510150002_create_events;
pub mod m202510150003_create_sessional_marks;
pub mod m202510150004_create_notifications;
