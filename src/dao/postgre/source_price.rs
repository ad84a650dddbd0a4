use sqlx::Error;

use crate::model::{Source_Price, Table};

impl Table<Source_Price> {
    /// Update-then-insert keyed by symbol, inside one transaction so a
    /// symbol never ends up with two rows.
    pub async fn upsert(
        &self,
        table: &str,
        symbol: &str,
        price: f64,
        updated_at: i64,
    ) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let update = format!(
            r#"
            UPDATE {} SET "price" = $1, "updated_at" = $2 WHERE "symbol" = $3
            "#,
            table
        );
        let result = sqlx::query(&update)
            .bind(price)
            .bind(updated_at)
            .bind(symbol)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            let insert = format!(
                r#"
                INSERT INTO {} ("symbol", "price", "updated_at")
                VALUES ($1, $2, $3)
                "#,
                table
            );
            sqlx::query(&insert)
                .bind(symbol)
                .bind(price)
                .bind(updated_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    pub async fn get_by_symbols(
        &self,
        table: &str,
        symbols: &[String],
    ) -> Result<Vec<Source_Price>, Error> {
        let query = format!(
            r#"
            SELECT "symbol", "price", "updated_at"
            FROM {}
            WHERE "symbol" = ANY($1)
            ORDER BY "symbol"
            "#,
            table
        );
        sqlx::query_as(&query)
            .bind(symbols)
            .fetch_all(&self.pool)
            .await
    }
}
