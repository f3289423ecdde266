use sea_orm_migration::prelude::*;

/// A migration backed by a pair of SQL files from `migrations/`.
struct SqlMigration {
    name: &'static str,
    up: &'static str,
    down: &'static str,
}

impl MigrationName for SqlMigration {
    fn name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl MigrationTrait for SqlMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Unprepared execution runs over the simple query protocol, which
        // accepts a whole file of statements at once.
        manager.get_connection().execute_unprepared(self.up).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(self.down).await?;
        Ok(())
    }
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(SqlMigration {
                name: "m0001_init",
                up: include_str!("../migrations/0001_init.sql"),
                down: include_str!("../migrations/0001_init.down.sql"),
            }),
            Box::new(SqlMigration {
                name: "m0002_order_checks",
                up: include_str!("../migrations/0002_order_checks.sql"),
                down: include_str!("../migrations/0002_order_checks.down.sql"),
            }),
            Box::new(SqlMigration {
                name: "m0003_product_images",
                up: include_str!("../migrations/0003_product_images.sql"),
                down: include_str!("../migrations/0003_product_images.down.sql"),
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_named_in_apply_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(
            names,
            ["m0001_init", "m0002_order_checks", "m0003_product_images"]
        );
    }
}
