//! Migration: questions, processes and rules.

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000001_create_directory_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Questions::Id))
                    .col(text(Questions::Description))
                    .col(
                        string_len(Questions::SkillType, 16)
                            .check(Expr::col(Questions::SkillType).is_in(["SOFT", "EXECUTION", "STRATEGY"])),
                    )
                    .col(uuid(Questions::CompanyId))
                    .col(timestamp_with_time_zone(Questions::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Questions::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Processes::Table)
                    .if_not_exists()
                    .col(pk_uuid(Processes::Id))
                    .col(string(Processes::Name))
                    .col(uuid_null(Processes::LinkedQuestionId))
                    .col(uuid(Processes::CompanyId))
                    .col(timestamp_with_time_zone(Processes::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Processes::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_processes_linked_question_id")
                            .from(Processes::Table, Processes::LinkedQuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProcesses::Table)
                    .if_not_exists()
                    .col(uuid(UserProcesses::UserId))
                    .col(uuid(UserProcesses::ProcessId))
                    .col(timestamp_with_time_zone(UserProcesses::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .col(UserProcesses::UserId)
                            .col(UserProcesses::ProcessId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_processes_user_id")
                            .from(UserProcesses::Table, UserProcesses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_processes_process_id")
                            .from(UserProcesses::Table, UserProcesses::ProcessId)
                            .to(Processes::Table, Processes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rules::Table)
                    .if_not_exists()
                    .col(pk_uuid(Rules::Id))
                    .col(string(Rules::Name))
                    .col(text_null(Rules::Description))
                    .col(text_null(Rules::ContentSql))
                    .col(integer(Rules::Number))
                    .col(boolean(Rules::IsTemplate).default(false))
                    .col(uuid_null(Rules::CompanyId))
                    .col(timestamp_with_time_zone(Rules::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Rules::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rules_company_id_number")
                    .table(Rules::Table)
                    .col(Rules::CompanyId)
                    .col(Rules::Number)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProcesses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Processes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Questions {
    Table,
    Id,
    Description,
    SkillType,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Processes {
    Table,
    Id,
    Name,
    LinkedQuestionId,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProcesses {
    Table,
    UserId,
    ProcessId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Rules {
    Table,
    Id,
    Name,
    Description,
    ContentSql,
    Number,
    IsTemplate,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}
