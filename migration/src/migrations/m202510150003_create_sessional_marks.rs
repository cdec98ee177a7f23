use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510150003_create_sessional_marks"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("sessional_marks"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("event_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("marks_obtained")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("remarks"))
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Alias::new("entered_by")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("entered_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .index(
                        Index::create()
                            .name("uq_sessional_marks_student_event")
                            .col(Alias::new("student_id"))
                            .col(Alias::new("event_id"))
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("sessional_marks"), Alias::new("student_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("sessional_marks"), Alias::new("event_id"))
                            .to(Alias::new("events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("sessional_marks"), Alias::new("entered_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("sessional_marks")).to_owned())
            .await
    }
}
