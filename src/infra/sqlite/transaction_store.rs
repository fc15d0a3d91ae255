use {
    crate::domain::{
        error::PaymentError,
        gateway::VerificationResult,
        id::Reference,
        money::Money,
        transaction::{PaymentSource, Transaction, TransactionStatus},
    },
    chrono::Utc,
    sqlx::SqlitePool,
};

/// Outcome of applying a verification result to the ledger.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// Row advanced to the incoming status.
    Updated(Transaction),
    /// Row already holds a terminal status — the guard rejected the write.
    Unchanged(Transaction),
    /// No row with that reference; nothing to reconcile against.
    Missing,
}

/// Filters for the admin listing.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter {
    pub status: Option<String>,
    pub email: Option<String>,
    /// Substring match over reference and customer phone.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const TERMINAL_GUARD: &str = "('successful', 'failed', 'cancelled')";
const COLUMNS: &str = "id, reference, gateway_id, amount, currency, customer_email, \
                       customer_phone, status, source, raw_payload, notified_at, \
                       created_at, updated_at";

/// Handle over the single `transactions` table. Constructed once per process
/// and passed into the reconciliation service — never referenced as ambient
/// global state.
#[derive(Clone)]
pub struct TransactionStore {
    pool: SqlitePool,
}

impl TransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Record a freshly initiated payment. Insert-or-ignore on the reference:
    /// a retry of the same logical request is a no-op, never an error and
    /// never a second row. Returns whether a row was actually inserted.
    pub async fn insert_initialized(
        &self,
        reference: &Reference,
        money: Money,
        email: Option<&str>,
        phone: Option<&str>,
        source: PaymentSource,
    ) -> Result<bool, PaymentError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO transactions
                (reference, amount, currency, customer_email, customer_phone,
                 status, source, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT (reference) DO NOTHING
            "#,
        )
        .bind(reference.as_str())
        .bind(money.amount().units())
        .bind(money.currency().as_str())
        .bind(email)
        .bind(phone)
        .bind(TransactionStatus::Initialized.as_str())
        .bind(source.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply a normalized verification to the row. The terminal guard lives
    /// inside the UPDATE statement itself, so two racing reconciles cannot
    /// regress a terminal status via lost update. Status, gateway_id,
    /// raw_payload and updated_at mutate; customer_email is backfilled only
    /// while the row has none. Amount and currency are fixed at creation no
    /// matter what the payload claims.
    pub async fn apply_verification(
        &self,
        result: &VerificationResult,
    ) -> Result<ReconcileOutcome, PaymentError> {
        if self
            .find_by_reference(result.reference.as_str())
            .await?
            .is_none()
        {
            return Ok(ReconcileOutcome::Missing);
        }

        let raw = sqlx::types::Json(result.raw_payload.clone());
        let updated = sqlx::query(&format!(
            r#"
            UPDATE transactions
            SET status = ?2,
                gateway_id = COALESCE(?3, gateway_id),
                customer_email = COALESCE(customer_email, ?4),
                raw_payload = ?5,
                updated_at = ?6
            WHERE reference = ?1 AND status NOT IN {TERMINAL_GUARD}
            "#,
        ))
        .bind(result.reference.as_str())
        .bind(result.status.as_str())
        .bind(result.gateway_id.as_deref())
        .bind(result.customer_email.as_deref())
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let row = self
            .find_by_reference(result.reference.as_str())
            .await?
            .ok_or_else(|| PaymentError::NotFound(result.reference.to_string()))?;

        if updated.rows_affected() > 0 {
            Ok(ReconcileOutcome::Updated(row))
        } else {
            Ok(ReconcileOutcome::Unchanged(row))
        }
    }

    /// Atomically claim the right to send the success receipt. True at most
    /// once per transaction: the flag suppresses a duplicate mail when the
    /// same terminal webhook is delivered twice.
    pub async fn claim_notification(&self, reference: &str) -> Result<bool, PaymentError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET notified_at = ?2
            WHERE reference = ?1 AND status = 'successful' AND notified_at IS NULL
            "#,
        )
        .bind(reference)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Transaction>, PaymentError> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE reference = ?1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Admin lookup accepts either the numeric row id or the reference.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<Transaction>, PaymentError> {
        if let Ok(id) = key.parse::<i64>() {
            let row = sqlx::query_as::<_, Transaction>(&format!(
                "SELECT {COLUMNS} FROM transactions WHERE id = ?1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        } else {
            self.find_by_reference(key).await
        }
    }

    pub async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, PaymentError> {
        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM transactions WHERE 1 = 1"
        ));

        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(email) = &filter.email {
            builder
                .push(" AND customer_email = ")
                .push_bind(email.clone());
        }
        if let Some(q) = &filter.q {
            let like = format!("%{}%", q.to_lowercase());
            builder
                .push(" AND (lower(reference) LIKE ")
                .push_bind(like.clone())
                .push(" OR lower(customer_phone) LIKE ")
                .push_bind(like)
                .push(")");
        }

        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let offset = filter.offset.unwrap_or(0).max(0);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
