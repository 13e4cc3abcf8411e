//! Asset registers and the global cash figure.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Employees {
    Table,
    Id,
}

#[derive(Iden)]
enum Bikes {
    Table,
    Id,
    RegistrationNumber,
    Model,
    EmployeeId,
    PurchasedOn,
    Status,
    Notes,
}

#[derive(Iden)]
enum AgricultureVehicles {
    Table,
    Id,
    Name,
    VehicleType,
    RegistrationNumber,
    PurchasedOn,
    Status,
    Notes,
}

#[derive(Iden)]
enum NewInstallations {
    Table,
    Id,
    CustomerName,
    Location,
    InstalledOn,
    AmountMinor,
    Status,
    Notes,
}

#[derive(Iden)]
enum AgristoreTransactions {
    Table,
    Id,
    TransactionDate,
    Item,
    Kind,
    Quantity,
    RateMinor,
    AmountMinor,
    Notes,
}

#[derive(Iden)]
enum CashRegister {
    Table,
    Id,
    AmountMinor,
    UpdatedBy,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bikes::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Bikes::RegistrationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bikes::Model).string().not_null())
                    .col(ColumnDef::new(Bikes::EmployeeId).string())
                    .col(ColumnDef::new(Bikes::PurchasedOn).string())
                    .col(
                        ColumnDef::new(Bikes::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Bikes::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bikes-employee_id")
                            .from(Bikes::Table, Bikes::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgricultureVehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgricultureVehicles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgricultureVehicles::Name).string().not_null())
                    .col(
                        ColumnDef::new(AgricultureVehicles::VehicleType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgricultureVehicles::RegistrationNumber).string())
                    .col(ColumnDef::new(AgricultureVehicles::PurchasedOn).string())
                    .col(
                        ColumnDef::new(AgricultureVehicles::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(AgricultureVehicles::Notes).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NewInstallations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewInstallations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NewInstallations::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NewInstallations::Location).string().not_null())
                    .col(
                        ColumnDef::new(NewInstallations::InstalledOn)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NewInstallations::AmountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NewInstallations::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(NewInstallations::Notes).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgristoreTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgristoreTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AgristoreTransactions::TransactionDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgristoreTransactions::Item).string().not_null())
                    .col(ColumnDef::new(AgristoreTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(AgristoreTransactions::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgristoreTransactions::RateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgristoreTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgristoreTransactions::Notes).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-agristore_transactions-date")
                    .table(AgristoreTransactions::Table)
                    .col(AgristoreTransactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashRegister::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashRegister::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CashRegister::AmountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CashRegister::UpdatedBy).string())
                    .col(ColumnDef::new(CashRegister::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashRegister::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AgristoreTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NewInstallations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AgricultureVehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bikes::Table).to_owned())
            .await?;
        Ok(())
    }
}
