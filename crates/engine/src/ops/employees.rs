use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Employee, EmployeeInput, EngineError, ResultEngine, Session, Status, bikes, employees,
    ledger_codes, transactions,
    util::{ensure_non_negative, normalize_required_text},
};

use super::{Engine, with_tx};

struct ValidEmployee {
    name: String,
    designation: String,
    salary_minor: i64,
    status: Status,
}

fn validate(input: EmployeeInput) -> ResultEngine<ValidEmployee> {
    ensure_non_negative(input.salary, "salary")?;
    Ok(ValidEmployee {
        name: normalize_required_text(&input.name, "name")?,
        designation: normalize_required_text(&input.designation, "designation")?,
        salary_minor: input.salary.minor(),
        status: input.status,
    })
}

impl Engine {
    pub async fn create_employee(
        &self,
        session: &Session,
        input: EmployeeInput,
    ) -> ResultEngine<Employee> {
        session.require_write()?;
        let valid = validate(input)?;
        let active = employees::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            name: ActiveValue::Set(valid.name),
            designation: ActiveValue::Set(valid.designation),
            salary_minor: ActiveValue::Set(valid.salary_minor),
            status: ActiveValue::Set(valid.status.as_str().to_string()),
        };
        let model = active.insert(&self.database).await?;
        Employee::try_from(model)
    }

    pub async fn list_employees(&self, include_inactive: bool) -> ResultEngine<Vec<Employee>> {
        let mut query = employees::Entity::find().order_by_asc(employees::Column::Name);
        if !include_inactive {
            query = query.filter(employees::Column::Status.eq(Status::Active.as_str()));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Employee::try_from)
            .collect()
    }

    pub async fn employee(&self, employee_id: Uuid) -> ResultEngine<Employee> {
        let model = employees::Entity::find_by_id(employee_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("employee not exists".to_string()))?;
        Employee::try_from(model)
    }

    pub async fn update_employee(
        &self,
        session: &Session,
        employee_id: Uuid,
        input: EmployeeInput,
    ) -> ResultEngine<Employee> {
        session.require_write()?;
        let valid = validate(input)?;
        let model = employees::Entity::find_by_id(employee_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("employee not exists".to_string()))?;

        let mut active: employees::ActiveModel = model.into();
        active.name = ActiveValue::Set(valid.name);
        active.designation = ActiveValue::Set(valid.designation);
        active.salary_minor = ActiveValue::Set(valid.salary_minor);
        active.status = ActiveValue::Set(valid.status.as_str().to_string());
        let model = active.update(&self.database).await?;
        Employee::try_from(model)
    }

    /// Deletes an employee nothing references; otherwise mark them inactive.
    pub async fn delete_employee(&self, session: &Session, employee_id: Uuid) -> ResultEngine<()> {
        session.require_write()?;
        let id = employee_id.to_string();
        with_tx!(self, |db_tx| {
            self.require_employee(&db_tx, employee_id).await?;

            let codes = ledger_codes::Entity::find()
                .filter(ledger_codes::Column::EmployeeId.eq(id.clone()))
                .count(&db_tx)
                .await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::EmployeeId.eq(id.clone()))
                .count(&db_tx)
                .await?;
            let bikes = bikes::Entity::find()
                .filter(bikes::Column::EmployeeId.eq(id.clone()))
                .count(&db_tx)
                .await?;
            if codes + rows + bikes > 0 {
                return Err(EngineError::Conflict(
                    "employee is still referenced; mark them inactive instead".to_string(),
                ));
            }

            employees::Entity::delete_by_id(id.clone()).exec(&db_tx).await?;
            Ok(())
        })
    }
}
