use sea_orm::{DatabaseConnection, EntityTrait};
use tokio::sync::watch;

use crate::{Amount, ResultEngine, cash_register};

mod access;
mod assets;
mod balances;
mod cash;
mod employees;
mod ledger_codes;
mod reports;
mod transactions;
mod users;

pub use balances::{DayLedger, SaveOutcome};
pub use reports::{DaySummary, LedgerCodeTotal, MonthlyReport};
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    cash: watch::Sender<Amount>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, seeding the cash watch with the stored figure.
    pub async fn build(self) -> ResultEngine<Engine> {
        let current = cash_register::Entity::find_by_id(cash_register::CASH_REGISTER_ID)
            .one(&self.database)
            .await?
            .map(|model| Amount::new(model.amount_minor))
            .unwrap_or_default();
        let (cash, _) = watch::channel(current);

        Ok(Engine {
            database: self.database,
            cash,
        })
    }
}
