use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, LedgerCategory, LedgerCode, LedgerCodeInput, ResultEngine, Session,
    ledger_codes, transactions,
    util::{normalize_key, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    async fn ensure_code_available(
        db_tx: &DatabaseTransaction,
        code_norm: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query =
            ledger_codes::Entity::find().filter(ledger_codes::Column::CodeNorm.eq(code_norm));
        if let Some(id) = except {
            query = query.filter(ledger_codes::Column::Id.ne(id.to_string()));
        }
        if let Some(existing) = query.one(db_tx).await? {
            return Err(EngineError::ExistingKey(existing.code));
        }
        Ok(())
    }

    pub async fn create_ledger_code(
        &self,
        session: &Session,
        input: LedgerCodeInput,
    ) -> ResultEngine<LedgerCode> {
        session.require_write()?;
        let code = normalize_required_text(&input.code, "code")?;
        let code_norm = normalize_key(&code)?;

        with_tx!(self, |db_tx| {
            Self::ensure_code_available(&db_tx, &code_norm, None).await?;
            self.require_optional_employee(&db_tx, input.employee_id)
                .await?;

            let active = ledger_codes::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                code: ActiveValue::Set(code),
                code_norm: ActiveValue::Set(code_norm),
                category: ActiveValue::Set(input.category.as_str().to_string()),
                sub_category: ActiveValue::Set(normalize_optional_text(
                    input.sub_category.as_deref(),
                )),
                employee_id: ActiveValue::Set(input.employee_id.map(|id| id.to_string())),
                is_active: ActiveValue::Set(input.is_active),
            };
            let model = active.insert(&db_tx).await?;
            LedgerCode::try_from(model)
        })
    }

    /// Lists ledger codes ordered by code.
    pub async fn list_ledger_codes(
        &self,
        category: Option<LedgerCategory>,
        include_inactive: bool,
    ) -> ResultEngine<Vec<LedgerCode>> {
        let mut query = ledger_codes::Entity::find().order_by_asc(ledger_codes::Column::CodeNorm);
        if let Some(category) = category {
            query = query.filter(ledger_codes::Column::Category.eq(category.as_str()));
        }
        if !include_inactive {
            query = query.filter(ledger_codes::Column::IsActive.eq(true));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerCode::try_from)
            .collect()
    }

    pub async fn ledger_code(&self, ledger_code_id: Uuid) -> ResultEngine<LedgerCode> {
        let model = ledger_codes::Entity::find_by_id(ledger_code_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("ledger code not exists".to_string()))?;
        LedgerCode::try_from(model)
    }

    pub async fn update_ledger_code(
        &self,
        session: &Session,
        ledger_code_id: Uuid,
        input: LedgerCodeInput,
    ) -> ResultEngine<LedgerCode> {
        session.require_write()?;
        let code = normalize_required_text(&input.code, "code")?;
        let code_norm = normalize_key(&code)?;

        with_tx!(self, |db_tx| {
            let model = ledger_codes::Entity::find_by_id(ledger_code_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("ledger code not exists".to_string()))?;
            Self::ensure_code_available(&db_tx, &code_norm, Some(ledger_code_id)).await?;
            self.require_optional_employee(&db_tx, input.employee_id)
                .await?;

            let mut active: ledger_codes::ActiveModel = model.into();
            active.code = ActiveValue::Set(code);
            active.code_norm = ActiveValue::Set(code_norm);
            active.category = ActiveValue::Set(input.category.as_str().to_string());
            active.sub_category =
                ActiveValue::Set(normalize_optional_text(input.sub_category.as_deref()));
            active.employee_id = ActiveValue::Set(input.employee_id.map(|id| id.to_string()));
            active.is_active = ActiveValue::Set(input.is_active);
            let model = active.update(&db_tx).await?;
            LedgerCode::try_from(model)
        })
    }

    pub async fn set_ledger_code_active(
        &self,
        session: &Session,
        ledger_code_id: Uuid,
        is_active: bool,
    ) -> ResultEngine<LedgerCode> {
        session.require_write()?;
        let model = ledger_codes::Entity::find_by_id(ledger_code_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("ledger code not exists".to_string()))?;
        let mut active: ledger_codes::ActiveModel = model.into();
        active.is_active = ActiveValue::Set(is_active);
        let model = active.update(&self.database).await?;
        LedgerCode::try_from(model)
    }

    /// Deletes a ledger code that no transaction references.
    pub async fn delete_ledger_code(
        &self,
        session: &Session,
        ledger_code_id: Uuid,
    ) -> ResultEngine<()> {
        session.require_write()?;
        with_tx!(self, |db_tx| {
            self.require_ledger_code(&db_tx, ledger_code_id).await?;
            let used = transactions::Entity::find()
                .filter(transactions::Column::LedgerCodeId.eq(ledger_code_id.to_string()))
                .count(&db_tx)
                .await?;
            if used > 0 {
                return Err(EngineError::Conflict(format!(
                    "ledger code is used by {used} transactions; deactivate it instead"
                )));
            }
            ledger_codes::Entity::delete_by_id(ledger_code_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
