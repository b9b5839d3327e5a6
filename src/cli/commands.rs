use crate::app::{operations, AppContext, Result};

pub fn add_feed(ctx: &AppContext, name: &str, url: &str) -> Result<()> {
    operations::add_feed(ctx, name, url)?;
    println!("Added feed: {} ({})", name, url);
    Ok(())
}

pub fn remove_feed(ctx: &AppContext, name: &str) -> Result<()> {
    let removed = operations::remove_feed(ctx, name)?;
    println!("Removed feed: {} ({})", name, removed.url);
    Ok(())
}

pub async fn update_feeds(ctx: &AppContext) -> Result<()> {
    let report = operations::update_all(ctx).await?;

    for (name, count) in &report.new_entries {
        println!("  {} new entries from {}", count, name);
    }
    for failure in &report.failed {
        eprintln!("  Error updating {}: {}", failure.feed_name, failure.reason);
    }

    println!(
        "Update complete: {} new entries, {} unchanged, {} errors",
        report.total(),
        report.unchanged.len(),
        report.failed.len()
    );
    Ok(())
}

pub fn show_status(ctx: &AppContext) -> Result<()> {
    let rows = operations::get_status(ctx)?;

    if rows.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for row in rows {
        println!("{:>6}  {}", row.pending, row.feed_name);
    }
    Ok(())
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = operations::list_feeds(ctx)?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for (name, feed) in &feeds {
        println!("{} ({})\n  {}", name, feed.display_title(name), feed.url);
    }
    Ok(())
}
