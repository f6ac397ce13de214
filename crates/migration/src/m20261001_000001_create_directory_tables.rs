//! Migration: levels, users, teams, clusters and their join tables.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Levels::Table)
                    .if_not_exists()
                    .col(pk_uuid(Levels::Id))
                    .col(string(Levels::Role))
                    .col(small_integer(Levels::Step))
                    .col(small_integer(Levels::ExecutionWeight))
                    .col(small_integer(Levels::SoftWeight))
                    .col(small_integer(Levels::StrategyWeight))
                    .col(double(Levels::Standard))
                    .col(uuid(Levels::CompanyId))
                    .col(timestamp_with_time_zone(Levels::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Levels::UpdatedAt).default(Expr::current_timestamp()))
                    .check(Expr::cust(
                        "execution_weight + soft_weight + strategy_weight = 100",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Surname))
                    .col(string(Users::Email).unique_key())
                    .col(uuid_null(Users::CompanyId))
                    .col(uuid_null(Users::LevelId))
                    .col(uuid_null(Users::MentorId))
                    .col(boolean(Users::IsAdmin).default(false))
                    .col(string_len(Users::Status, 16).default("active"))
                    .col(timestamp_with_time_zone(Users::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Users::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_level_id")
                            .from(Users::Table, Users::LevelId)
                            .to(Levels::Table, Levels::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_mentor_id")
                            .from(Users::Table, Users::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_company_id")
                    .table(Users::Table)
                    .col(Users::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_uuid(Teams::Id))
                    .col(string(Teams::Name))
                    .col(uuid(Teams::LeaderId))
                    .col(uuid(Teams::CompanyId))
                    .col(boolean(Teams::IsProject).default(false))
                    .col(boolean(Teams::IsClusterLeader).default(false))
                    .col(timestamp_with_time_zone(Teams::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Teams::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_leader_id")
                            .from(Teams::Table, Teams::LeaderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clusters::Table)
                    .if_not_exists()
                    .col(pk_uuid(Clusters::Id))
                    .col(string(Clusters::Name))
                    .col(uuid(Clusters::LeaderId))
                    .col(small_integer(Clusters::Level))
                    .col(uuid(Clusters::CompanyId))
                    .col(timestamp_with_time_zone(Clusters::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Clusters::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clusters_leader_id")
                            .from(Clusters::Table, Clusters::LeaderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamClusters::Table)
                    .if_not_exists()
                    .col(uuid(TeamClusters::TeamId))
                    .col(uuid(TeamClusters::ClusterId))
                    .col(timestamp_with_time_zone(TeamClusters::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .col(TeamClusters::TeamId)
                            .col(TeamClusters::ClusterId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_clusters_team_id")
                            .from(TeamClusters::Table, TeamClusters::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_clusters_cluster_id")
                            .from(TeamClusters::Table, TeamClusters::ClusterId)
                            .to(Clusters::Table, Clusters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A team sits in at most one cluster
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_clusters_team_id_unique")
                    .table(TeamClusters::Table)
                    .col(TeamClusters::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserTeams::Table)
                    .if_not_exists()
                    .col(uuid(UserTeams::UserId))
                    .col(uuid(UserTeams::TeamId))
                    .col(timestamp_with_time_zone(UserTeams::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(Index::create().col(UserTeams::UserId).col(UserTeams::TeamId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_teams_user_id")
                            .from(UserTeams::Table, UserTeams::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_teams_team_id")
                            .from(UserTeams::Table, UserTeams::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTeams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamClusters::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clusters::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Levels::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Levels {
    Table,
    Id,
    Role,
    Step,
    ExecutionWeight,
    SoftWeight,
    StrategyWeight,
    Standard,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Name,
    Surname,
    Email,
    CompanyId,
    LevelId,
    MentorId,
    IsAdmin,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Teams {
    Table,
    Id,
    Name,
    LeaderId,
    CompanyId,
    IsProject,
    IsClusterLeader,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Clusters {
    Table,
    Id,
    Name,
    LeaderId,
    Level,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamClusters {
    Table,
    TeamId,
    ClusterId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserTeams {
    Table,
    UserId,
    TeamId,
    CreatedAt,
}
