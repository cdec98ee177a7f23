use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::{event, event_assigned_student, notification, sessional_mark};

/// Application-wide role of a user. Decides every permission check.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "faculty")]
    Faculty,
    #[default]
    #[sea_orm(string_value = "student")]
    Student,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Faculty => "Faculty",
            Role::Student => "Student",
        }
    }
}

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub enrollment_no: Option<String>,
    pub department: Option<String>,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    CreatedEvents,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedEvents.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Optional profile fields shared by registration, admin creation and edits.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub phone: Option<String>,
    pub enrollment_no: Option<String>,
    pub department: Option<String>,
}

/// Full replacement of the editable fields of a user, as submitted by an admin.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile: Profile,
}

/// Blank strings are stored as NULL.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl Model {
    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let parsed = match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        profile: Profile,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            username: Set(username.trim().to_owned()),
            email: Set(email.trim().to_owned()),
            password_hash: Set(Self::hash_password(password)?),
            role: Set(role),
            phone: Set(normalize(profile.phone)),
            enrollment_no: Set(normalize(profile.enrollment_no)),
            department: Set(normalize(profile.department)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username.trim()))
            .one(db)
            .await
    }

    /// Returns the user when the username exists and the password matches.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_username(db, username)
            .await?
            .filter(|user| user.verify_password(password)))
    }

    /// Whether `username` or `email` is already taken by someone other than `exclude_id`.
    pub async fn identity_taken(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<(bool, bool), DbErr> {
        let mut username_query = Entity::find().filter(Column::Username.eq(username.trim()));
        let mut email_query = Entity::find().filter(Column::Email.eq(email.trim()));
        if let Some(id) = exclude_id {
            username_query = username_query.filter(Column::Id.ne(id));
            email_query = email_query.filter(Column::Id.ne(id));
        }

        let username_taken = username_query.count(db).await? > 0;
        let email_taken = email_query.count(db).await? > 0;
        Ok((username_taken, email_taken))
    }

    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Username).all(db).await
    }

    pub async fn find_by_role(db: &DatabaseConnection, role: Role) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(role))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    pub async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    pub async fn count_by_role(db: &DatabaseConnection, role: Role) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Role.eq(role)).count(db).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        changes: UserChanges,
    ) -> Result<Model, DbErr> {
        let user = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("User {} not found", id)))?;

        let mut active: ActiveModel = user.into();
        active.username = Set(changes.username.trim().to_owned());
        active.email = Set(changes.email.trim().to_owned());
        active.role = Set(changes.role);
        active.phone = Set(normalize(changes.profile.phone));
        active.enrollment_no = Set(normalize(changes.profile.enrollment_no));
        active.department = Set(normalize(changes.profile.department));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn set_password(
        db: &DatabaseConnection,
        id: i64,
        password: &str,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            id: Set(id),
            password_hash: Set(Self::hash_password(password)?),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        active.update(db).await
    }

    /// Deletes the user and everything that depends on them in one transaction.
    ///
    /// Order: marks (own, entered, or on authored events), event assignments,
    /// authored events, authored notifications, then the user row.
    pub async fn delete_with_dependents(db: &DatabaseConnection, id: i64) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        let authored: Vec<i64> = event::Entity::find()
            .filter(event::Column::CreatedBy.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        sessional_mark::Entity::delete_many()
            .filter(
                sea_orm::Condition::any()
                    .add(sessional_mark::Column::StudentId.eq(id))
                    .add(sessional_mark::Column::EnteredBy.eq(id))
                    .add(sessional_mark::Column::EventId.is_in(authored.clone())),
            )
            .exec(&txn)
            .await?;

        event_assigned_student::Entity::delete_many()
            .filter(
                sea_orm::Condition::any()
                    .add(event_assigned_student::Column::StudentId.eq(id))
                    .add(event_assigned_student::Column::EventId.is_in(authored.clone())),
            )
            .exec(&txn)
            .await?;

        event::Entity::delete_many()
            .filter(event::Column::Id.is_in(authored))
            .exec(&txn)
            .await?;

        notification::Entity::delete_many()
            .filter(notification::Column::CreatedBy.eq(id))
            .exec(&txn)
            .await?;

        Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await
    }
}
