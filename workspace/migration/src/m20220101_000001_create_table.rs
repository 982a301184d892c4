use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .to_owned(),
            )
            .await?;

        // Create expenses table.
        //
        // `user_id` is a plain nullable column without a foreign key: expenses
        // may reference a user that was never created or has since been
        // deleted, and deleting a user leaves their expenses untouched.
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(string(Expenses::Title))
                    .col(string_null(Expenses::Description))
                    .col(double(Expenses::Amount))
                    .col(date(Expenses::Date))
                    .col(string(Expenses::Category))
                    .col(integer_null(Expenses::UserId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    Title,
    Description,
    Amount,
    Date,
    Category,
    UserId,
}
