//! `copy` command: render platform copy for an approved brief.

use std::str::FromStr;

use uuid::Uuid;

use vimark_content::{run_copy_generation, ContentBrief, Platform};
use vimark_db::BriefStatus;

/// Generate copy for an approved brief and record it unless `dry_run`.
///
/// # Errors
///
/// Returns an error if the brief is missing or not approved, a platform name
/// is unknown, or a database write fails.
pub(crate) async fn run_copy(
    pool: &sqlx::PgPool,
    brief_id: Uuid,
    platforms: &[String],
    variants: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    if platforms.is_empty() {
        anyhow::bail!("at least one --platform is required (facebook, tiktok, shopee, instagram)");
    }
    let platforms = platforms
        .iter()
        .map(|name| Platform::from_str(name))
        .collect::<Result<Vec<_>, _>>()?;

    let row = match vimark_db::get_brief(pool, brief_id).await {
        Ok(row) => row,
        Err(vimark_db::DbError::NotFound) => anyhow::bail!("brief '{brief_id}' not found"),
        Err(e) => return Err(e.into()),
    };
    if BriefStatus::parse(&row.status) != Some(BriefStatus::Approved) {
        anyhow::bail!(
            "brief '{brief_id}' is {}, not approved; decide it with `briefs approve` first",
            row.status
        );
    }

    let brief: ContentBrief = serde_json::from_value(row.brief.clone())?;
    let bundle = run_copy_generation(&brief, &platforms, variants);

    for copy in &bundle.copies {
        let label = copy
            .variant_id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", copy.platform, copy.variant));
        println!("=== {label} ({} tone) ===", copy.tone);
        println!("{}", copy.copy.body);
        println!();
        println!("hashtags: {}", copy.copy.hashtags.join(" "));
        println!("cta: {}", copy.copy.call_to_action);
        println!(
            "{}/{} chars{}",
            copy.metadata.character_count,
            copy.metadata.character_limit,
            if copy.metadata.within_limit {
                ""
            } else {
                " (over limit)"
            }
        );
        if !copy.metadata.hashtag_validation.valid {
            println!(
                "hashtag issues: {}",
                copy.metadata.hashtag_validation.issues.join("; ")
            );
        }
        println!("emoji: {}", copy.metadata.emoji_analysis.recommendation);
        println!();
    }

    if dry_run {
        println!("dry run: {} copies not recorded", bundle.copies.len());
        return Ok(());
    }

    for copy in &bundle.copies {
        let payload = serde_json::to_value(copy)?;
        vimark_db::insert_generated_copy(
            pool,
            &vimark_db::NewGeneratedCopy {
                brief_id: row.id,
                platform: copy.platform.as_str(),
                variant: copy.variant.as_str(),
                tone: copy.tone.as_str(),
                variant_id: copy.variant_id.as_deref(),
                payload: &payload,
            },
        )
        .await?;
    }
    println!("recorded {} copies for brief {brief_id}", bundle.copies.len());

    Ok(())
}
