//! Blog ledger admin CLI
//!
//! Run with:
//! ```bash
//! cargo run -p blog-admin -- migrate
//! cargo run -p blog-admin -- audit --kind article_likes --repair
//! cargo run -p blog-admin -- comments --author 5 --status reported
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

mod cli;

use std::sync::Arc;

use anyhow::Context;
use blog_common::{init_tracing, AppConfig, TracingConfig};
use blog_core::{CommentStatus, Counter, CounterKind, EntityId, RelationshipKind};
use blog_db::{create_pool, run_migrations, PgLedgerStore, PgPool};
use blog_service::dto::{
    AuditSummaryResponse, CommentResponse, CommenterResponse, DriftResponse, FollowStatusResponse,
    RelationshipResponse,
};
use blog_service::{AuditService, LedgerService, ServiceContext};
use clap::Parser;
use tracing::{error, info};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let mut tracing_config = TracingConfig::for_environment(config.app.env);
    if cli.json_logs {
        tracing_config.json = true;
    }
    init_tracing(&tracing_config);

    info!(env = ?config.app.env, worker_id = config.worker_id, "Configuration loaded");

    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    let ctx = ServiceContext::from_config(Arc::new(PgLedgerStore::new(pool.clone())), &config);
    let output = match cli.command {
        Command::Migrate => return migrate(&pool).await,
        Command::Audit { kind, owner, repair } => audit(&ctx, kind, owner, repair).await?,
        Command::Comments { author, status } => comments(&ctx, author, status).await?,
        Command::Commenters { article } => commenters(&ctx, article).await?,
        Command::Relations { target, kind } => relations(&ctx, target, kind).await?,
        Command::FollowStatus { user, other } => follow_status(&ctx, user, other).await?,
    };

    println!("{output}");
    Ok(())
}

async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool).await.context("Failed to apply schema")
}

async fn audit(
    ctx: &ServiceContext,
    kind: CounterKind,
    owner: Option<EntityId>,
    repair: bool,
) -> anyhow::Result<String> {
    let service = AuditService::new(ctx);

    let output = match owner {
        Some(owner_id) => {
            let counter = Counter::new(owner_id, kind);
            let report = if repair {
                service.repair(counter).await?
            } else {
                service.audit(counter).await?
            };
            serde_json::to_string_pretty(&DriftResponse::from(report))?
        }
        None => {
            let summary = service.audit_all(kind, repair).await?;
            serde_json::to_string_pretty(&AuditSummaryResponse::from(&summary))?
        }
    };
    Ok(output)
}

async fn comments(
    ctx: &ServiceContext,
    author: EntityId,
    status: Option<CommentStatus>,
) -> anyhow::Result<String> {
    let comments = LedgerService::new(ctx).user_comments(author, status).await?;
    let responses: Vec<CommentResponse> = comments.iter().map(CommentResponse::from).collect();
    Ok(serde_json::to_string_pretty(&responses)?)
}

async fn commenters(ctx: &ServiceContext, article: EntityId) -> anyhow::Result<String> {
    let entries = LedgerService::new(ctx).commenters(article).await?;
    let responses: Vec<CommenterResponse> = entries.iter().map(CommenterResponse::from).collect();
    Ok(serde_json::to_string_pretty(&responses)?)
}

async fn relations(ctx: &ServiceContext, target: EntityId, kind: RelationshipKind) -> anyhow::Result<String> {
    let rows = LedgerService::new(ctx).list_actors(target, kind).await?;
    let responses: Vec<RelationshipResponse> = rows.iter().map(RelationshipResponse::from).collect();
    Ok(serde_json::to_string_pretty(&responses)?)
}

async fn follow_status(ctx: &ServiceContext, user: EntityId, other: EntityId) -> anyhow::Result<String> {
    let status = LedgerService::new(ctx).follow_status(user, other).await?;
    Ok(serde_json::to_string_pretty(&FollowStatusResponse::from(status))?)
}
