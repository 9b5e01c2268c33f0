use anyhow::Result;
use bookcal_core::config::BookingConfig;
use bookcal_core::event::EventPatch;
use bookcal_remote::EventSyncClient;
use owo_colors::OwoColorize;

use crate::utils::parse;

pub async fn run(
    config: &BookingConfig,
    id: &str,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let zone = config.timezone;

    let patch = EventPatch {
        title,
        start: start
            .map(|s| parse::parse_local_datetime(&s, zone))
            .transpose()?,
        end: end
            .map(|s| parse::parse_local_datetime(&s, zone))
            .transpose()?,
        client_id: None,
        notes,
    };
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass --title, --start, --end, or --notes.");
    }
    if let (Some(start), Some(end)) = (patch.start, patch.end) {
        if start >= end {
            anyhow::bail!("End must come after start.");
        }
    }

    let mut client = EventSyncClient::new(config.api_base_url.clone(), zone);
    client.update(id, &patch).await?;

    println!("{}", format!("  Updated {id}").green());
    Ok(())
}
