use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::SubscriptionRepo,
    domain::entities::{
        period::{Period, PeriodRange},
        subscription::{Subscription, SubscriptionPatch},
    },
};

const SELECT_COLS: &str = "user_id, service_name, price, start_date, end_date";

fn decode_period(column: &str, raw: &str) -> Result<Period, sqlx::Error> {
    raw.parse::<Period>()
        .map_err(|err| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(err),
        })
}

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Result<Subscription, sqlx::Error> {
    let start_date: String = row.try_get("start_date")?;
    let end_date: Option<String> = row.try_get("end_date")?;

    Ok(Subscription {
        user_id: row.try_get("user_id")?,
        service_name: row.try_get("service_name")?,
        price: row.try_get("price")?,
        start_date: decode_period("start_date", &start_date)?,
        end_date: end_date
            .as_deref()
            .map(|raw| decode_period("end_date", raw))
            .transpose()?,
    })
}

fn not_found(op: &'static str, user_id: &str, service_name: &str) -> AppError {
    tracing::warn!(operation = op, user_id, service_name, "Subscription not found");
    AppError::NotFound
}

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn create(&self, subscription: &Subscription) -> AppResult<Subscription> {
        let row = self
            .run(
                "create",
                sqlx::query(&format!(
                    r#"
                    INSERT INTO subscriptions (user_id, service_name, price, start_date, end_date)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING {}
                    "#,
                    SELECT_COLS
                ))
                .bind(&subscription.user_id)
                .bind(&subscription.service_name)
                .bind(subscription.price)
                .bind(subscription.start_date.to_string())
                .bind(subscription.end_date.map(|d| d.to_string()))
                .fetch_one(&self.pool),
            )
            .await?;

        let created = row_to_subscription(&row).map_err(|e| super::map_db_error("create", e))?;
        tracing::debug!(
            user_id = %created.user_id,
            service_name = %created.service_name,
            "Subscription row inserted"
        );
        Ok(created)
    }

    async fn get(&self, user_id: &str, service_name: &str) -> AppResult<Subscription> {
        let row = self
            .run(
                "get",
                sqlx::query(&format!(
                    "SELECT {} FROM subscriptions WHERE user_id = $1 AND service_name = $2",
                    SELECT_COLS
                ))
                .bind(user_id)
                .bind(service_name)
                .fetch_optional(&self.pool),
            )
            .await?
            .ok_or_else(|| not_found("get", user_id, service_name))?;

        row_to_subscription(&row).map_err(|e| super::map_db_error("get", e))
    }

    async fn list(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        let rows = self
            .run(
                "list",
                sqlx::query(&format!(
                    "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY created_at",
                    SELECT_COLS
                ))
                .bind(user_id)
                .fetch_all(&self.pool),
            )
            .await?;

        rows.iter()
            .map(row_to_subscription)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| super::map_db_error("list", e))
    }

    async fn update(
        &self,
        user_id: &str,
        service_name: &str,
        patch: &SubscriptionPatch,
    ) -> AppResult<Subscription> {
        // Single conditional statement: no read-before-write, and zero rows
        // affected means the key does not exist.
        let row = self
            .run(
                "update",
                sqlx::query(&format!(
                    r#"
                    UPDATE subscriptions SET
                        price = COALESCE($3, price),
                        start_date = COALESCE($4, start_date),
                        end_date = COALESCE($5, end_date)
                    WHERE user_id = $1 AND service_name = $2
                    RETURNING {}
                    "#,
                    SELECT_COLS
                ))
                .bind(user_id)
                .bind(service_name)
                .bind(patch.price)
                .bind(patch.start_date.map(|d| d.to_string()))
                .bind(patch.end_date.map(|d| d.to_string()))
                .fetch_optional(&self.pool),
            )
            .await?
            .ok_or_else(|| not_found("update", user_id, service_name))?;

        row_to_subscription(&row).map_err(|e| super::map_db_error("update", e))
    }

    async fn delete(&self, user_id: &str, service_name: &str) -> AppResult<Subscription> {
        let row = self
            .run(
                "delete",
                sqlx::query(&format!(
                    "DELETE FROM subscriptions WHERE user_id = $1 AND service_name = $2 RETURNING {}",
                    SELECT_COLS
                ))
                .bind(user_id)
                .bind(service_name)
                .fetch_optional(&self.pool),
            )
            .await?
            .ok_or_else(|| not_found("delete", user_id, service_name))?;

        row_to_subscription(&row).map_err(|e| super::map_db_error("delete", e))
    }

    async fn total_cost_by_period(
        &self,
        user_id: &str,
        service_name: Option<&str>,
        range: &PeriodRange,
    ) -> AppResult<i64> {
        // start_date alone bounds the window; end_date is not consulted.
        let total = self
            .run(
                "total_cost_by_period",
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COALESCE(SUM(price), 0)::BIGINT
                    FROM subscriptions
                    WHERE user_id = $1
                      AND ($2::TEXT IS NULL OR service_name = $2)
                      AND to_date(start_date, 'MM-YYYY') BETWEEN $3 AND $4
                    "#,
                )
                .bind(user_id)
                .bind(service_name)
                .bind(range.lower_bound())
                .bind(range.upper_bound())
                .fetch_one(&self.pool),
            )
            .await?;

        tracing::debug!(
            user_id,
            ?service_name,
            from = %range.start(),
            to = %range.end(),
            total,
            "Total cost aggregated"
        );
        Ok(total)
    }
}
