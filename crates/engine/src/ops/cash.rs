use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};

use crate::{Amount, CashWatch, ResultEngine, Session, cash_register, util::ensure_non_negative};

use super::Engine;

impl Engine {
    /// The cash figure last published.
    pub fn cash_in_hand(&self) -> Amount {
        *self.cash.borrow()
    }

    /// Stores the cash figure and publishes it to every subscriber.
    pub async fn set_cash_in_hand(&self, session: &Session, amount: Amount) -> ResultEngine<Amount> {
        session.require_write()?;
        ensure_non_negative(amount, "cash in hand")?;

        let existing = cash_register::Entity::find_by_id(cash_register::CASH_REGISTER_ID)
            .one(&self.database)
            .await?;
        let now = Utc::now();
        match existing {
            Some(model) => {
                let mut active: cash_register::ActiveModel = model.into();
                active.amount_minor = ActiveValue::Set(amount.minor());
                active.updated_by = ActiveValue::Set(Some(session.username.clone()));
                active.updated_at = ActiveValue::Set(now);
                active.update(&self.database).await?;
            }
            None => {
                cash_register::ActiveModel {
                    id: ActiveValue::Set(cash_register::CASH_REGISTER_ID),
                    amount_minor: ActiveValue::Set(amount.minor()),
                    updated_by: ActiveValue::Set(Some(session.username.clone())),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&self.database)
                .await?;
            }
        }

        // `send_replace` also works with no subscribers.
        self.cash.send_replace(amount);
        tracing::info!(%amount, user = %session.username, "cash in hand updated");
        Ok(amount)
    }

    pub fn watch_cash_in_hand(&self) -> CashWatch {
        CashWatch::new(self.cash.subscribe())
    }
}
