//! # Feedback Store
//!
//! SeaORM implementation of [`FeedbackStore`]. Rule procedures are plain SQL
//! functions called with the session id; the procedures of one rule share a
//! transaction.

use std::time::Instant;

use async_trait::async_trait;
use entity::{feedbacks, sessions};
use error::{AppError, Result, ResultExt};
use evaluation::{FeedbackStore, Procedure};
use logging::log_db_call;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    DbBackend,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    Statement,
    TransactionTrait,
};
use uuid::Uuid;

/// Store backed by the service's database connection.
#[derive(Debug, Clone, Copy)]
pub struct SeaOrmFeedbackStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SeaOrmFeedbackStore<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
        }
    }

    fn call_statement(procedure: Procedure, session_id: Uuid) -> Statement {
        Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("SELECT {}($1) AS result", procedure.name()),
            [session_id.into()],
        )
    }
}

#[async_trait]
impl FeedbackStore for SeaOrmFeedbackStore<'_> {
    async fn find_session(&self, session_id: Uuid) -> Result<Option<sessions::Model>> {
        Ok(sessions::Entity::find_by_id(session_id).one(self.db).await?)
    }

    async fn count_feedbacks(&self, session_id: Uuid) -> Result<u64> {
        Ok(feedbacks::Entity::find()
            .filter(feedbacks::Column::SessionId.eq(session_id))
            .count(self.db)
            .await?)
    }

    async fn count_feedbacks_for_rule(&self, session_id: Uuid, rule_number: i32) -> Result<u64> {
        Ok(feedbacks::Entity::find()
            .filter(feedbacks::Column::SessionId.eq(session_id))
            .filter(feedbacks::Column::RuleNumber.eq(rule_number))
            .count(self.db)
            .await?)
    }

    async fn run_procedures(&self, procedures: &[Procedure], session_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        for &procedure in procedures {
            let started = Instant::now();
            txn.execute(Self::call_statement(procedure, session_id))
                .await
                .log_error()?;
            log_db_call!(procedure, session_id, started.elapsed().as_millis());
        }
        // Dropping `txn` on an early return rolls back the earlier calls.
        txn.commit().await?;
        Ok(())
    }

    async fn remove_duplicate_feedbacks(&self, session_id: Uuid) -> Result<u64> {
        let procedure = Procedure::RemoveDuplicateFeedbacks;
        let started = Instant::now();
        let row = self
            .db
            .query_one(Self::call_statement(procedure, session_id))
            .await
            .log_error()?
            .ok_or_else(|| AppError::database(format!("{} returned no row", procedure)))?;
        let removed: i32 = row.try_get("", "result")?;
        log_db_call!(procedure, session_id, started.elapsed().as_millis());

        u64::try_from(removed).map_err(|_| AppError::database(format!("{} returned {}", procedure, removed)))
    }

    async fn update_session(&self, session: sessions::Model) -> Result<sessions::Model> {
        let active: sessions::ActiveModel = session.into();
        Ok(active.reset_all().update(self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use evaluation::RuleNumber;

    use super::*;

    #[test]
    fn test_call_statement_uses_procedure_name() {
        let rule = RuleNumber::try_from(3).unwrap();
        let statement = SeaOrmFeedbackStore::call_statement(Procedure::GenerateRule(rule), Uuid::nil());
        assert_eq!(statement.sql, "SELECT generate_rule3_feedbacks($1) AS result");
        assert_eq!(statement.values.map(|v| v.0.len()), Some(1));
    }
}
