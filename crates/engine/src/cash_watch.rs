//! Subscription to the global cash figure.
//!
//! Every write through [`Engine::set_cash_in_hand`] publishes the new value;
//! subscribers only ever see the latest one.
//!
//! [`Engine::set_cash_in_hand`]: crate::Engine::set_cash_in_hand

use tokio::sync::watch;

use crate::Amount;

#[derive(Debug)]
pub struct CashWatch {
    receiver: watch::Receiver<Amount>,
}

impl CashWatch {
    pub(crate) fn new(receiver: watch::Receiver<Amount>) -> Self {
        Self { receiver }
    }

    /// The value currently published.
    pub fn current(&self) -> Amount {
        *self.receiver.borrow()
    }

    /// Waits for the next published value.
    ///
    /// Returns `None` once the engine has been dropped.
    pub async fn changed(&mut self) -> Option<Amount> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }

    /// Releases the subscription. Dropping the watch has the same effect.
    pub fn unsubscribe(self) {
        tracing::debug!("cash watch released");
    }
}
