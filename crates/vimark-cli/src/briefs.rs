//! `briefs` command handlers: the human approval queue.
//!
//! `pending` lists what is waiting for review; `approve` and `reject` record
//! the decision. Only pending briefs can be decided, so a second decision on
//! the same brief reports not found.

use clap::Subcommand;
use uuid::Uuid;

/// Sub-commands available under `briefs`.
#[derive(Debug, Subcommand)]
pub enum BriefsCommands {
    /// List briefs waiting for approval, oldest first
    Pending {
        /// Maximum number of briefs to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Approve a pending brief
    Approve {
        /// Public brief id
        #[arg(long)]
        brief: Uuid,
        /// Optional reviewer feedback
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Reject a pending brief
    Reject {
        /// Public brief id
        #[arg(long)]
        brief: Uuid,
        /// Optional reviewer feedback
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Show one brief with its generated copy and publication history
    Show {
        /// Public brief id
        #[arg(long)]
        brief: Uuid,
    },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: BriefsCommands) -> anyhow::Result<()> {
    match command {
        BriefsCommands::Pending { limit } => run_briefs_pending(pool, i64::from(limit)).await,
        BriefsCommands::Approve { brief, feedback } => {
            run_briefs_decision(pool, brief, true, feedback.as_deref()).await
        }
        BriefsCommands::Reject { brief, feedback } => {
            run_briefs_decision(pool, brief, false, feedback.as_deref()).await
        }
        BriefsCommands::Show { brief } => run_briefs_show(pool, brief).await,
    }
}

async fn run_briefs_pending(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let rows =
        vimark_db::list_briefs_by_status(pool, vimark_db::BriefStatus::Pending, limit).await?;

    if rows.is_empty() {
        println!("no briefs pending approval");
        return Ok(());
    }

    println!("{} briefs pending approval", rows.len());
    println!();
    for row in &rows {
        let hook = row
            .brief
            .get("hook")
            .and_then(|v| v.as_str())
            .unwrap_or("(no hook)");
        println!("{}  {}  {}", row.public_id, row.trend_id, row.content_format);
        println!("    {hook}");
        println!("    created {}", row.created_at.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(())
}

async fn run_briefs_decision(
    pool: &sqlx::PgPool,
    brief_id: Uuid,
    approved: bool,
    feedback: Option<&str>,
) -> anyhow::Result<()> {
    let result = if approved {
        vimark_db::approve_brief(pool, brief_id, feedback).await
    } else {
        vimark_db::reject_brief(pool, brief_id, feedback).await
    };

    let row = match result {
        Ok(row) => row,
        Err(vimark_db::DbError::NotFound) => {
            anyhow::bail!("brief '{brief_id}' is not pending; check `briefs pending`")
        }
        Err(e) => return Err(e.into()),
    };

    println!("brief {} is now {}", row.public_id, row.status);
    if approved {
        println!("generate copy with `copy --brief {}`", row.public_id);
    }
    Ok(())
}

async fn run_briefs_show(pool: &sqlx::PgPool, brief_id: Uuid) -> anyhow::Result<()> {
    let row = match vimark_db::get_brief(pool, brief_id).await {
        Ok(row) => row,
        Err(vimark_db::DbError::NotFound) => anyhow::bail!("brief '{brief_id}' not found"),
        Err(e) => return Err(e.into()),
    };

    println!("Brief: {} ({})", row.public_id, row.status);
    println!("Trend: {}  Format: {}", row.trend_id, row.content_format);
    if let Some(feedback) = &row.feedback {
        println!("Feedback: {feedback}");
    }
    if let Some(hook) = row.brief.get("hook").and_then(|v| v.as_str()) {
        println!("Hook: {hook}");
    }

    let copies = vimark_db::list_copy_for_brief(pool, row.id).await?;
    println!();
    if copies.is_empty() {
        println!("no copy generated yet; run `copy --brief {}`", row.public_id);
    } else {
        println!("{} generated copies", copies.len());
        for copy in &copies {
            let variant_id = copy.variant_id.as_deref().unwrap_or("-");
            println!(
                "  {:<12}{:<14}{:<14}{}",
                copy.platform, copy.variant, copy.tone, variant_id
            );
        }
    }

    let publications = vimark_db::list_publications_for_brief(pool, row.id).await?;
    if !publications.is_empty() {
        println!();
        println!("{} publications", publications.len());
        for publication in &publications {
            let external_ref = publication.external_ref.as_deref().unwrap_or("-");
            println!(
                "  {:<12}{:<12}{:<14}{}",
                publication.published_at.format("%Y-%m-%d").to_string(),
                publication.platform,
                publication.status,
                external_ref
            );
        }
    }

    Ok(())
}
