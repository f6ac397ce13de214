//! Rule templates 1 to 6, shared by every company.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use chrono::Utc;
use entity::rules;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::SeedProvider;

/// A built-in rule definition.
#[derive(Debug, Clone, Copy)]
pub struct RuleTemplate {
    pub number:      i32,
    pub name:        &'static str,
    pub description: &'static str,
}

pub const RULE_TEMPLATES: [RuleTemplate; 6] = [
    RuleTemplate {
        number:      1,
        name:        "Self assessment",
        description: "Every user of the session clusters evaluates themself on every question.",
    },
    RuleTemplate {
        number:      2,
        name:        "Mentor assessment",
        description: "Every mentor evaluates their mentees on every question.",
    },
    RuleTemplate {
        number:      3,
        name:        "Team peers",
        description: "Team members evaluate each other, then evaluate their team leader.",
    },
    RuleTemplate {
        number:      4,
        name:        "Team leader assessment",
        description: "Team leaders evaluate every member of their teams.",
    },
    RuleTemplate {
        number:      5,
        name:        "Cluster leader assessment",
        description: "Cluster leaders evaluate the leaders of the teams in their clusters.",
    },
    RuleTemplate {
        number:      6,
        name:        "Project peers",
        description: "Members of project teams evaluate each other.",
    },
];

/// Inserts the missing rule templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTemplateSeed;

#[async_trait::async_trait]
impl SeedProvider for RuleTemplateSeed {
    fn name(&self) -> &str { "rule_templates" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();
        let mut inserted = 0;
        let mut skipped = 0;

        for template in RULE_TEMPLATES {
            let existing = rules::Entity::find()
                .filter(rules::Column::IsTemplate.eq(true))
                .filter(rules::Column::CompanyId.is_null())
                .filter(rules::Column::Number.eq(template.number))
                .one(db)
                .await?;

            if existing.is_some() {
                skipped += 1;
                continue;
            }

            let now = Utc::now();
            let model = rules::ActiveModel {
                id:          Set(uuid::Uuid::new_v4()),
                name:        Set(template.name.to_string()),
                description: Set(Some(template.description.to_string())),
                content_sql: Set(None),
                number:      Set(template.number),
                is_template: Set(true),
                company_id:  Set(None),
                created_at:  Set(now),
                updated_at:  Set(now),
            };
            rules::Entity::insert(model).exec_without_returning(db).await?;
            inserted += 1;
        }

        Ok(SeedResult::success(
            self.name(),
            inserted,
            skipped,
            started.elapsed().as_millis() as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn template_row(number: i32) -> rules::Model {
        let now = Utc::now();
        rules::Model {
            id: uuid::Uuid::new_v4(),
            name: format!("Rule {number}"),
            description: None,
            content_sql: None,
            number,
            is_template: true,
            company_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_templates_cover_known_rules() {
        let numbers = RULE_TEMPLATES.iter().map(|t| t.number).collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_seed_skips_existing_templates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results((1 ..= 6).map(|n| vec![template_row(n)]))
            .into_connection();

        let result = RuleTemplateSeed.run(&db).await.unwrap();
        assert_eq!(result.inserted_count, 0);
        assert_eq!(result.skipped_count, 6);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_seed_inserts_missing_templates() {
        let mut queries = (1 ..= 5)
            .map(|n| vec![template_row(n)])
            .collect::<Vec<_>>();
        queries.push(Vec::new());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(queries)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected:  1,
            }])
            .into_connection();

        let result = RuleTemplateSeed.run(&db).await.unwrap();
        assert_eq!(result.inserted_count, 1);
        assert_eq!(result.skipped_count, 5);
    }
}
