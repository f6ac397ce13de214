//! Migration: `remove_duplicate_feedbacks(session uuid) -> integer`
//!
//! Deletes every feedback of the session sharing `(sender, receiver, question)`
//! with an earlier one and returns how many rows were removed. Answered rows
//! win over unanswered ones, then the oldest row wins.
//!
//! The `generate_ruleN_feedbacks` procedures are provisioned separately.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE OR REPLACE FUNCTION remove_duplicate_feedbacks(p_session_id uuid)
                RETURNS integer AS $$
                DECLARE
                    removed integer;
                BEGIN
                    WITH ranked AS (
                        SELECT id,
                               row_number() OVER (
                                   PARTITION BY sender_id, receiver_id, question_id
                                   ORDER BY (value IS NULL), created_at, id
                               ) AS position
                        FROM feedbacks
                        WHERE session_id = p_session_id
                    )
                    DELETE FROM feedbacks f
                    USING ranked r
                    WHERE f.id = r.id AND r.position > 1;

                    GET DIAGNOSTICS removed = ROW_COUNT;
                    RETURN removed;
                END;
                $$ language 'plpgsql';
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS remove_duplicate_feedbacks(uuid)")
            .await?;

        Ok(())
    }
}
