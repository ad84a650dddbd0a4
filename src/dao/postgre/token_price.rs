use sqlx::Error;

use crate::model::{Table, Token_Price};

impl Table<Token_Price> {
    /// A missing supply keeps whatever supply the row already carries.
    pub async fn upsert(&self, token: &Token_Price) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE oracle."tokens"
            SET "price" = $1, "supply" = COALESCE($2, "supply")
            WHERE "symbol" = $3
            "#,
        )
        .bind(token.price)
        .bind(token.supply)
        .bind(&token.symbol)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO oracle."tokens" ("symbol", "price", "supply")
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&token.symbol)
            .bind(token.price)
            .bind(token.supply)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    pub async fn get_by_symbols(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Token_Price>, Error> {
        sqlx::query_as(
            r#"
            SELECT "symbol", "price", "supply"
            FROM oracle."tokens"
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
