use sqlx::Error;

use crate::model::{Registry_Denom, Table};

impl Table<Registry_Denom> {
    /// Every denom of every registered chain, in registry order.
    pub async fn get_all(&self) -> Result<Vec<Registry_Denom>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                d.denom->>'ticker' AS "ticker",
                d.denom->>'price_id' AS "price_id",
                COALESCE((d.denom->>'fetch_price')::boolean, false) AS "fetch_price"
            FROM cns."chains" c
            CROSS JOIN LATERAL jsonb_array_elements(c."denoms")
                WITH ORDINALITY AS d(denom, idx)
            ORDER BY c."chain_name", d.idx
            "#,
        )
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }
}
