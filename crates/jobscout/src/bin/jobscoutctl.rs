use jobscout::config::{self, Config};
use jobscout::db;
use jobscout::jobs::{normalize, JobsRepo};
use jobscout::upstream::UpstreamClient;
use sqlx::PgPool;
use std::env;

const USAGE: &str = "jobscoutctl <command>\n\
     Commands:\n\
     - check          connect to the store and read one row from jobs\n\
     - migrate        apply embedded migrations\n\
     - reset          truncate the jobs table\n\
     - list [n]       show the n most recent stored jobs (default 20)\n\
     - fetch [tag]    fetch and normalize upstream jobs, print JSON (no store)\n\
     \n\
     Store commands use JOBSCOUT_STORE_URL and JOBSCOUT_STORE_KEY.\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let Some(command) = args.get(1) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    match command.as_str() {
        "check" => check(&connect().await?).await?,
        "migrate" => {
            let pool = connect().await?;
            db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        "reset" => {
            let repo = JobsRepo::new(connect().await?);
            let before = repo.count().await?;
            repo.truncate().await?;
            println!("removed {before} job(s)");
        }
        "list" => {
            let n: i64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
            list(&JobsRepo::new(connect().await?), n).await?;
        }
        "fetch" => fetch(args.get(2).map(String::as_str)).await?,
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let store = config::store_from_env()?;
    println!("store: {store:?}");
    db::make_pool(&store, 2).await
}

async fn check(pool: &PgPool) -> anyhow::Result<()> {
    let row = sqlx::query_as::<_, jobscout::jobs::Job>(
        "SELECT id, title, company, location, salary, url, description FROM jobs LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    match row {
        Some(job) => println!("ok: {}", serde_json::to_string_pretty(&job)?),
        None => println!("ok: jobs table is reachable and empty"),
    }
    Ok(())
}

async fn list(repo: &JobsRepo, n: i64) -> anyhow::Result<()> {
    let total = repo.count().await?;
    let rows = repo.list_recent(n).await?;

    println!("{total} stored job(s), showing {}", rows.len());
    for r in rows {
        println!(
            "{}  {:<12} {} @ {}  {}",
            r.created_at.format("%Y-%m-%d %H:%M:%S"),
            r.id,
            r.title,
            r.company,
            r.url
        );
    }
    Ok(())
}

async fn fetch(tag: Option<&str>) -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let upstream = UpstreamClient::new(&cfg.upstream_url, &cfg.user_agent)?;

    let raw = upstream.fetch(tag).await?;
    let jobs = normalize(raw);

    println!("{}", serde_json::to_string_pretty(&jobs)?);
    eprintln!("{} job(s) from {}", jobs.len(), upstream.endpoint());
    Ok(())
}
