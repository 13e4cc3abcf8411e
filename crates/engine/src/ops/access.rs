use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, employees, ledger_codes};

use super::Engine;

/// Generates `_exists` and `require_` methods for a referenced entity.
macro_rules! impl_require_exists {
    ($exists_fn:ident, $require_fn:ident, $entity:path, $err_msg:literal) => {
        async fn $exists_fn<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> ResultEngine<bool> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await
                .map(|model| model.is_some())
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
        ) -> ResultEngine<()> {
            if !self.$exists_fn(db, id).await? {
                return Err(EngineError::KeyNotFound($err_msg.to_string()));
            }
            Ok(())
        }
    };
}

impl Engine {
    impl_require_exists!(
        employee_exists,
        require_employee,
        employees::Entity,
        "employee not exists"
    );

    impl_require_exists!(
        ledger_code_exists,
        require_ledger_code,
        ledger_codes::Entity,
        "ledger code not exists"
    );

    pub(super) async fn require_optional_employee<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Option<Uuid>,
    ) -> ResultEngine<()> {
        match id {
            Some(id) => self.require_employee(db, id).await,
            None => Ok(()),
        }
    }
}
