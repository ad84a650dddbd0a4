use sqlx::Error;

use crate::model::{Fiat_Price, Table};

impl Table<Fiat_Price> {
    pub async fn upsert(&self, fiat: &Fiat_Price) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE oracle."fiats" SET "price" = $1 WHERE "symbol" = $2
            "#,
        )
        .bind(fiat.price)
        .bind(&fiat.symbol)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO oracle."fiats" ("symbol", "price") VALUES ($1, $2)
                "#,
            )
            .bind(&fiat.symbol)
            .bind(fiat.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    pub async fn get_by_symbols(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Fiat_Price>, Error> {
        sqlx::query_as(
            r#"
            SELECT "symbol", "price"
            FROM oracle."fiats"
            WHERE "symbol" = ANY($1)
            ORDER BY "symbol"
            "#,
        )
        .bind(symbols)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }
}
