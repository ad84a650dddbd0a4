use sqlx::Error;

use crate::model::{Source_Supply, Table};

impl Table<Source_Supply> {
    pub async fn upsert(
        &self,
        table: &str,
        symbol: &str,
        supply: f64,
    ) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let update = format!(
            r#"UPDATE {} SET "supply" = $1 WHERE "symbol" = $2"#,
            table
        );
        let result = sqlx::query(&update)
            .bind(supply)
            .bind(symbol)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            let insert = format!(
                r#"INSERT INTO {} ("symbol", "supply") VALUES ($1, $2)"#,
                table
            );
            sqlx::query(&insert)
                .bind(symbol)
                .bind(supply)
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
    ) -> Result<Vec<Source_Supply>, Error> {
        let query = format!(
            r#"
            SELECT "symbol", "supply"
            FROM {}
            WHERE "symbol" = ANY($1)
            "#,
            table
        );
        sqlx::query_as(&query)
            .bind(symbols)
            .fetch_all(&self.pool)
            .await
    }
}
