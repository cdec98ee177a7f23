pub mod event;
pub mod notification;
pub mod sessional_mark;
pub mod user;
