use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Users Table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Firstname).string().not_null())
                    .col(ColumnDef::new(Users::Lastname).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Age).integer().not_null())
                    .col(ColumnDef::new(Users::Gender).string().not_null())
                    .col(ColumnDef::new(Users::Mobile).big_integer().not_null())
                    .col(ColumnDef::new(Users::Address).text().not_null())
                    .col(
                        ColumnDef::new(Users::IsDoctor)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create Doctors Table
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Doctors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Doctors::UserId).integer().not_null())
                    .col(ColumnDef::new(Doctors::Email).string().not_null())
                    .col(ColumnDef::new(Doctors::Specialization).string().not_null())
                    .col(ColumnDef::new(Doctors::Experience).integer().not_null())
                    .col(ColumnDef::new(Doctors::Fees).integer().not_null())
                    .col(
                        ColumnDef::new(Doctors::IsDoctor)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Doctors::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Doctors::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-doctor-user_id")
                            .from(Doctors::Table, Doctors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_doctors_user_id")
                    .table(Doctors::Table)
                    .col(Doctors::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Firstname,
    Lastname,
    Email,
    PasswordHash,
    Age,
    Gender,
    Mobile,
    Address,
    IsDoctor,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Doctors {
    Table,
    Id,
    UserId,
    Email,
    Specialization,
    Experience,
    Fees,
    IsDoctor,
    CreatedAt,
    UpdatedAt,
}
