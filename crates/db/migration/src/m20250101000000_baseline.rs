use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk_id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Accounts::Table)
                    .col(pk_id_col(Accounts::Id))
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Industry).string())
                    .col(ColumnDef::new(Accounts::Phone).string())
                    .col(ColumnDef::new(Accounts::Website).string())
                    .col(ColumnDef::new(Accounts::Address).string())
                    .col(timestamp_col(Accounts::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Contacts::Table)
                    .col(pk_id_col(Contacts::Id))
                    .col(ColumnDef::new(Contacts::FirstName).string().not_null())
                    .col(ColumnDef::new(Contacts::LastName).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string())
                    .col(ColumnDef::new(Contacts::Phone).string())
                    .col(ColumnDef::new(Contacts::JobTitle).string())
                    .col(ColumnDef::new(Contacts::AccountId).big_integer())
                    .col(timestamp_col(Contacts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_account_id")
                            .from(Contacts::Table, Contacts::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_contacts_account_id")
                    .table(Contacts::Table)
                    .col(Contacts::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tickets::Table)
                    .col(pk_id_col(Tickets::Id))
                    .col(ColumnDef::new(Tickets::Number).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::ShortDescription).string().not_null())
                    .col(ColumnDef::new(Tickets::Description).text())
                    .col(
                        ColumnDef::new(Tickets::State)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("New")),
                    )
                    .col(
                        ColumnDef::new(Tickets::Priority)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("Medium")),
                    )
                    .col(ColumnDef::new(Tickets::Category).string())
                    .col(ColumnDef::new(Tickets::AssignedTo).string())
                    .col(ColumnDef::new(Tickets::AccountId).big_integer())
                    .col(ColumnDef::new(Tickets::ContactId).big_integer())
                    .col(timestamp_col(Tickets::CreatedAt))
                    .col(timestamp_col(Tickets::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_account_id")
                            .from(Tickets::Table, Tickets::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_contact_id")
                            .from(Tickets::Table, Tickets::ContactId)
                            .to(Contacts::Table, Contacts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness of ticket numbers is enforced here; concurrent creators
        // computing the same number lose with a constraint violation.
        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_number")
                    .table(Tickets::Table)
                    .col(Tickets::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_state")
                    .table(Tickets::Table)
                    .col(Tickets::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_account_id")
                    .table(Tickets::Table)
                    .col(Tickets::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_contact_id")
                    .table(Tickets::Table)
                    .col(Tickets::ContactId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tasks::Table)
                    .col(pk_id_col(Tasks::Id))
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text())
                    .col(ColumnDef::new(Tasks::DueDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Tasks::State)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("Open")),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("Medium")),
                    )
                    .col(ColumnDef::new(Tasks::AssignedTo).string())
                    .col(timestamp_col(Tasks::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_state")
                    .table(Tasks::Table)
                    .col(Tasks::State)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Industry,
    Phone,
    Website,
    Address,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    JobTitle,
    AccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    Number,
    ShortDescription,
    Description,
    State,
    Priority,
    Category,
    AssignedTo,
    AccountId,
    ContactId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    DueDate,
    State,
    Priority,
    AssignedTo,
    CreatedAt,
}
