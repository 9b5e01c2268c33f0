//! Week view assembly: the composition root behind `bookcal week`.
//!
//! Pulls a week of events through the sync client, groups them per day,
//! runs column layout, and counts each day's open booking slots.

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use bookcal_core::config::BookingConfig;
use bookcal_core::event::Event;
use bookcal_core::interval::TimeInterval;
use bookcal_core::layout::{self, LayoutSlot};
use bookcal_core::{slots, time};
use bookcal_remote::{EventSyncClient, SyncResult, Transport, WeekMetrics};

/// One loaded week: seven laid-out days plus the booking summary.
pub struct WeekView {
    pub anchor: NaiveDate,
    pub zone: Tz,
    pub days: Vec<DayView>,
    pub metrics: WeekMetrics,
}

/// One day column of the week grid.
pub struct DayView {
    pub date: NaiveDate,
    pub zone: Tz,
    pub slots: Vec<LayoutSlot>,
    pub open_slots: usize,
}

impl WeekView {
    /// Fetch and lay out the week at `offset` from the current week.
    pub async fn load<T: Transport>(
        client: &mut EventSyncClient<T>,
        config: &BookingConfig,
        offset: i64,
    ) -> SyncResult<WeekView> {
        let zone = config.timezone;
        let anchor = time::week_anchor_date(Utc::now(), zone) + Duration::days(7 * offset);
        let from = time::day_start(anchor, zone);
        let to = time::day_start(anchor + Duration::days(7), zone);

        let events = client.events_in_range(from, to).await?;
        let metrics = client.week_metrics(offset).await?;

        let days = (0..7)
            .map(|i| DayView::build(anchor + Duration::days(i), &events, config))
            .collect();

        Ok(WeekView {
            anchor,
            zone,
            days,
            metrics,
        })
    }
}

impl DayView {
    fn build(date: NaiveDate, week_events: &[Event], config: &BookingConfig) -> DayView {
        let zone = config.timezone;
        let day_events: Vec<Event> = week_events
            .iter()
            .filter(|e| e.start.with_timezone(&zone).date_naive() == date)
            .cloned()
            .collect();
        let busy: Vec<TimeInterval> = day_events.iter().filter_map(Event::busy_interval).collect();

        let window = config.booking_window;
        let candidates = slots::window_slots(
            date,
            window.start_hour,
            window.end_hour,
            window.step_hours,
            zone,
        );
        let open_slots = slots::available_slots(candidates, &busy).len();

        DayView {
            date,
            zone,
            slots: layout::layout_day(&day_events),
            open_slots,
        }
    }
}
