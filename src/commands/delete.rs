use anyhow::Result;
use bookcal_core::config::BookingConfig;
use bookcal_remote::EventSyncClient;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

pub async fn run(config: &BookingConfig, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Cancel appointment {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let mut client = EventSyncClient::new(config.api_base_url.clone(), config.timezone);
    client.remove(id).await?;

    println!("{}", format!("  Cancelled {id}").green());
    Ok(())
}
