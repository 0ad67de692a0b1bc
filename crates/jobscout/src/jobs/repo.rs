// crates/jobscout/src/jobs/repo.rs

use crate::jobs::model::{Job, StoredJob};
use sqlx::PgPool;

const JOB_COLUMNS: &str = "id, title, company, location, salary, url, description";

#[derive(Clone)]
pub struct JobsRepo {
    pool: PgPool,
}

impl JobsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ----------------------------
    // Reads
    // ----------------------------

    pub async fn find_by_url(&self, url: &str) -> anyhow::Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    // ----------------------------
    // Writes
    // ----------------------------

    /// Inserts a new row. Returns `None` when a row with the same url already
    /// exists; the existing row is left untouched.
    pub async fn insert(&self, job: &Job) -> anyhow::Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (id, title, company, location, salary, url, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (url) DO NOTHING
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(&job.url)
        .bind(&job.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns the stored row for `job.url`, inserting `job` first if the url
    /// has never been seen. Stored values win over the fresh ones; rows are
    /// never updated.
    ///
    /// Two requests racing on the same url both end up with the winner's row:
    /// the loser's insert hits the unique constraint and re-reads.
    pub async fn read_or_insert(&self, job: &Job) -> anyhow::Result<Job> {
        if let Some(existing) = self.find_by_url(&job.url).await? {
            return Ok(existing);
        }

        if let Some(inserted) = self.insert(job).await? {
            tracing::debug!(id = %inserted.id, url = %inserted.url, "stored new job");
            return Ok(inserted);
        }

        self.find_by_url(&job.url).await?.ok_or_else(|| {
            anyhow::anyhow!("job with url {} vanished after insert conflict", job.url)
        })
    }

    // ----------------------------
    // Operator views (jobscoutctl)
    // ----------------------------

    /// Newest first. `limit` is clamped to [1, 500].
    pub async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<StoredJob>> {
        let limit = limit.clamp(1, 500);

        let rows = sqlx::query_as::<_, StoredJob>(
            r#"
            SELECT id, title, company, url, created_at
            FROM jobs
            ORDER BY created_at DESC, url DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub async fn truncate(&self) -> anyhow::Result<()> {
        sqlx::query("TRUNCATE TABLE jobs")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
