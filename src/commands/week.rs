use anyhow::Result;
use bookcal_core::config::BookingConfig;
use bookcal_remote::EventSyncClient;

use crate::render::Render;
use crate::utils::tui;
use crate::view::WeekView;

pub async fn run(config: &BookingConfig, offset: i64) -> Result<()> {
    let mut client = EventSyncClient::new(config.api_base_url.clone(), config.timezone);

    let spinner = tui::create_spinner("Loading week".to_string());
    let view = WeekView::load(&mut client, config, offset).await;
    spinner.finish_and_clear();

    println!("{}", view?.render());
    Ok(())
}
