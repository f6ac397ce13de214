//! Migration: sessions, their associations, feedbacks and initiatives.

use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261001_000001_create_directory_tables::{Clusters, Users},
    m20261001_000002_create_catalog_tables::{Questions, Rules},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Sessions::Id))
                    .col(string(Sessions::Name))
                    .col(timestamp_with_time_zone_null(Sessions::StartTime))
                    .col(timestamp_with_time_zone_null(Sessions::EndTime))
                    .col(
                        string_len(Sessions::Status, 32)
                            .default("In preparazione")
                            .check(Expr::col(Sessions::Status).is_in(["In preparazione", "In corso", "Conclusa"])),
                    )
                    .col(uuid(Sessions::CompanyId))
                    .col(timestamp_with_time_zone(Sessions::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Sessions::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionClusters::Table)
                    .if_not_exists()
                    .col(uuid(SessionClusters::SessionId))
                    .col(uuid(SessionClusters::ClusterId))
                    .primary_key(
                        Index::create()
                            .col(SessionClusters::SessionId)
                            .col(SessionClusters::ClusterId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_clusters_session_id")
                            .from(SessionClusters::Table, SessionClusters::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_clusters_cluster_id")
                            .from(SessionClusters::Table, SessionClusters::ClusterId)
                            .to(Clusters::Table, Clusters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionRules::Table)
                    .if_not_exists()
                    .col(uuid(SessionRules::SessionId))
                    .col(uuid(SessionRules::RuleId))
                    .primary_key(
                        Index::create()
                            .col(SessionRules::SessionId)
                            .col(SessionRules::RuleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_rules_session_id")
                            .from(SessionRules::Table, SessionRules::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_rules_rule_id")
                            .from(SessionRules::Table, SessionRules::RuleId)
                            .to(Rules::Table, Rules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(pk_uuid(Feedbacks::Id))
                    .col(uuid(Feedbacks::SenderId))
                    .col(uuid(Feedbacks::ReceiverId))
                    .col(uuid(Feedbacks::QuestionId))
                    .col(uuid(Feedbacks::SessionId))
                    .col(small_integer_null(Feedbacks::Value).check(Expr::col(Feedbacks::Value).between(0, 5)))
                    .col(text_null(Feedbacks::Comment))
                    .col(integer_null(Feedbacks::RuleNumber))
                    .col(timestamp_with_time_zone(Feedbacks::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Feedbacks::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_sender_id")
                            .from(Feedbacks::Table, Feedbacks::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_receiver_id")
                            .from(Feedbacks::Table, Feedbacks::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_question_id")
                            .from(Feedbacks::Table, Feedbacks::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_session_id")
                            .from(Feedbacks::Table, Feedbacks::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Rule pre-checks and result pages filter on these
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedbacks_session_id_rule_number")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::SessionId)
                    .col(Feedbacks::RuleNumber)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedbacks_session_id_receiver_id")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::SessionId)
                    .col(Feedbacks::ReceiverId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedbacks_session_id_sender_id")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::SessionId)
                    .col(Feedbacks::SenderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Initiatives::Table)
                    .if_not_exists()
                    .col(pk_uuid(Initiatives::Id))
                    .col(text(Initiatives::Description))
                    .col(uuid(Initiatives::SessionId))
                    .col(uuid(Initiatives::QuestionId))
                    .col(uuid(Initiatives::UserId))
                    .col(string(Initiatives::InitiativeType))
                    .col(timestamp_with_time_zone(Initiatives::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Initiatives::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_initiatives_session_id")
                            .from(Initiatives::Table, Initiatives::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_initiatives_question_id")
                            .from(Initiatives::Table, Initiatives::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_initiatives_user_id")
                            .from(Initiatives::Table, Initiatives::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Initiatives::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionRules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionClusters::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    Name,
    StartTime,
    EndTime,
    Status,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SessionClusters {
    Table,
    SessionId,
    ClusterId,
}

#[derive(DeriveIden)]
enum SessionRules {
    Table,
    SessionId,
    RuleId,
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    SenderId,
    ReceiverId,
    QuestionId,
    SessionId,
    Value,
    Comment,
    RuleNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Initiatives {
    Table,
    Id,
    Description,
    SessionId,
    QuestionId,
    UserId,
    InitiativeType,
    CreatedAt,
    UpdatedAt,
}
