use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::user::Role;

/// Audience of a notification.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_target_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetRole {
    #[default]
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "faculty")]
    Faculty,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl TargetRole {
    pub fn label(&self) -> &'static str {
        match self {
            TargetRole::All => "All Users",
            TargetRole::Student => "Students Only",
            TargetRole::Faculty => "Faculty Only",
            TargetRole::Admin => "Admins Only",
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => TargetRole::Admin,
            Role::Faculty => TargetRole::Faculty,
            Role::Student => TargetRole::Student,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub created_by: i64,
    pub target_role: TargetRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Notifications a user with `role` may read. Admins read everything.
fn audience(role: Role) -> Condition {
    match role {
        Role::Admin => Condition::all(),
        other => Condition::any()
            .add(Column::TargetRole.eq(TargetRole::All))
            .add(Column::TargetRole.eq(TargetRole::for_role(other))),
    }
}

impl Model {
    pub async fn create(
        db: &DbConn,
        created_by: i64,
        title: &str,
        message: &str,
        target_role: TargetRole,
        is_active: bool,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            title: Set(title.trim().to_owned()),
            message: Set(message.to_owned()),
            created_by: Set(created_by),
            target_role: Set(target_role),
            is_active: Set(is_active),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Active notifications addressed to `role`, newest first, at most `limit`.
    pub async fn active_for_role(
        db: &DbConn,
        role: Role,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsActive.eq(true))
            .filter(audience(role))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// Full notification list for `role`. Admins also see inactive ones.
    pub async fn list_for_role(db: &DbConn, role: Role) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().filter(audience(role));
        if role != Role::Admin {
            query = query.filter(Column::IsActive.eq(true));
        }

        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
