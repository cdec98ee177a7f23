pub mod event;
pub mod event_assigned_student;
pub mod notification;
pub mod sessional_mark;
pub mod user;

pub use event::Entity as Event;
pub use event_assigned_student::Entity as EventAssignedStudent;
pub use notification::Entity as Notification;
pub use sessional_mark::Entity as SessionalMark;
pub use user::Entity as User;
