use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510150002_create_events"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("events"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("title")).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Alias::new("event_type"))
                            .enumeration(
                                Alias::new("event_type_enum"),
                                vec![
                                    Alias::new("sessional"),
                                    Alias::new("assignment"),
                                    Alias::new("project"),
                                    Alias::new("quiz"),
                                    Alias::new("workshop"),
                                ],
                            )
                            .not_null()
                            .default("sessional"),
                    )
                    .col(ColumnDef::new(Alias::new("date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("time")).time())
                    .col(
                        ColumnDef::new(Alias::new("venue"))
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Alias::new("description")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("max_marks"))
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Alias::new("created_by")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
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
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("events"), Alias::new("created_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alias::new("event_assigned_students"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("event_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("event_id"))
                            .col(Alias::new("student_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("event_assigned_students"), Alias::new("event_id"))
                            .to(Alias::new("events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("event_assigned_students"), Alias::new("student_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("event_assigned_students"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("events")).to_owned())
            .await
    }
}
