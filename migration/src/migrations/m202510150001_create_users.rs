use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510150001_create_users"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("users"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("username")).string_len(150).not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("email")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("password_hash")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("role"))
                            .enumeration(
                                Alias::new("user_role_type"),
                                vec![
                                    Alias::new("admin"),
                                    Alias::new("faculty"),
                                    Alias::new("student"),
                                ],
                            )
                            .not_null()
                            .default("student"),
                    )
                    .col(ColumnDef::new(Alias::new("phone")).string_len(15))
                    .col(ColumnDef::new(Alias::new("enrollment_no")).string_len(20))
                    .col(ColumnDef::new(Alias::new("department")).string_len(100))
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("users")).to_owned())
            .await
    }
}
