//! Initial schema: the bookkeeping core.
//!
//! - `users`: accounts, roles and password hashes
//! - `employees`: staff referenced by ledger codes and rows
//! - `ledger_codes`: the chart of codes every row is booked against
//! - `transactions`: daily rows plus one balance record per date

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Username,
    Email,
    Role,
    Status,
    PasswordHash,
    PasswordSalt,
    CreatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    Name,
    Designation,
    SalaryMinor,
    Status,
}

#[derive(Iden)]
enum LedgerCodes {
    Table,
    Id,
    Code,
    CodeNorm,
    Category,
    SubCategory,
    EmployeeId,
    IsActive,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    TransactionDate,
    LedgerCodeId,
    EmployeeId,
    CashIn,
    BankIn,
    ExpenditureOut,
    ExpenditureCash,
    Description,
    SortOrder,
    IsBalanceEntry,
    PreviousBalance,
    TotalBalance,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("read"),
                    )
                    .col(
                        ColumnDef::new(Users::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::PasswordSalt).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Employees
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Designation).string().not_null())
                    .col(
                        ColumnDef::new(Employees::SalaryMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Employees::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Ledger codes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerCodes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerCodes::Code).string().not_null())
                    .col(ColumnDef::new(LedgerCodes::CodeNorm).string().not_null())
                    .col(ColumnDef::new(LedgerCodes::Category).string().not_null())
                    .col(ColumnDef::new(LedgerCodes::SubCategory).string())
                    .col(ColumnDef::new(LedgerCodes::EmployeeId).string())
                    .col(
                        ColumnDef::new(LedgerCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_codes-employee_id")
                            .from(LedgerCodes::Table, LedgerCodes::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_codes-code_norm-unique")
                    .table(LedgerCodes::Table)
                    .col(LedgerCodes::CodeNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::LedgerCodeId).string())
                    .col(ColumnDef::new(Transactions::EmployeeId).string())
                    .col(
                        ColumnDef::new(Transactions::CashIn)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::BankIn)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::ExpenditureOut)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::ExpenditureCash)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Transactions::Description).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::IsBalanceEntry)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::PreviousBalance).big_integer())
                    .col(ColumnDef::new(Transactions::TotalBalance).big_integer())
                    .col(ColumnDef::new(Transactions::CreatedBy).string())
                    .col(ColumnDef::new(Transactions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Transactions::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-ledger_code_id")
                            .from(Transactions::Table, Transactions::LedgerCodeId)
                            .to(LedgerCodes::Table, LedgerCodes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-employee_id")
                            .from(Transactions::Table, Transactions::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-date-balance_entry")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .col(Transactions::IsBalanceEntry)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-ledger_code_id")
                    .table(Transactions::Table)
                    .col(Transactions::LedgerCodeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation (FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
