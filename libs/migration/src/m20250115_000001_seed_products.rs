use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Insert demo catalog entries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO products (name, description, price, category, is_active, created_at, updated_at)
            SELECT * FROM (
                VALUES
                    ('USB-C Kabel 1m', 'Flexibles USB-C Kabel', 7.99, 'kabel', true, NOW(), NOW()),
                    ('Bluetooth Lautsprecher', 'Kompakter Speaker', 29.90, 'audio', true, NOW(), NOW()),
                    ('Gaming Maus', 'Ergonomische Maus', 39.00, 'zubehör', true, NOW(), NOW()),
                    ('Gaming Stuhl', 'Ergonomischer Gaming Stuhl', 249.00, 'ausstattung', true, NOW(), NOW())
            ) AS seed(name, description, price, category, is_active, created_at, updated_at)
            WHERE NOT EXISTS (SELECT 1 FROM products)
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM products WHERE name IN ('USB-C Kabel 1m', 'Bluetooth Lautsprecher', 'Gaming Maus', 'Gaming Stuhl')",
            )
            .await?;

        Ok(())
    }
}
