//! Event synchronization against the remote store.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use bookcal_core::{Event, EventDraft, EventPatch, time};

use crate::cache::{QueryCache, WeekMetrics};
use crate::error::{SyncError, SyncResult};
use crate::shape::{self, RequestShape};
use crate::transport::{HttpTransport, RawResponse, Transport};

#[derive(Debug, Deserialize)]
struct WeekResponse {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct DayResponse {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    created: Event,
}

/// Client for the remote event store.
///
/// Holds the read-through query cache: reads populate their own key,
/// successful mutations invalidate the `events` and `metrics` namespaces
/// wholesale, and callers refetch rather than patching from responses.
pub struct EventSyncClient<T: Transport> {
    transport: T,
    zone: Tz,
    cache: QueryCache,
}

impl EventSyncClient<HttpTransport> {
    pub fn new(base_url: impl Into<String>, zone: Tz) -> Self {
        EventSyncClient::with_transport(HttpTransport::new(base_url), zone)
    }
}

impl<T: Transport> EventSyncClient<T> {
    pub fn with_transport(transport: T, zone: Tz) -> Self {
        EventSyncClient {
            transport,
            zone,
            cache: QueryCache::new(),
        }
    }

    /// Events overlapping `[from, to)`.
    ///
    /// The range is fetched in calendar-week buckets (one request per
    /// week offset from the current week, Sunday-anchored in the business
    /// timezone), concatenated, then trimmed to the requested range so
    /// partial weeks come back precise.
    pub async fn events_in_range(
        &mut self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SyncResult<Vec<Event>> {
        let key = format!("{}..{}", from.to_rfc3339(), to.to_rfc3339());
        if let Some(events) = self.cache.events(&key) {
            return Ok(events.to_vec());
        }

        let mut events = Vec::new();
        for offset in week_offsets(Utc::now(), from, to, self.zone) {
            let week = self.fetch_week(offset).await?;
            events.extend(week.events);
        }
        events.retain(|e| e.start < to && e.end > from);
        events.sort_by_key(|e| e.start);

        self.cache.put_events(key, events.clone());
        Ok(events)
    }

    /// Events for one calendar day in the business timezone.
    pub async fn events_for_day(&mut self, date: NaiveDate) -> SyncResult<Vec<Event>> {
        let key = format!("day:{date}");
        if let Some(events) = self.cache.events(&key) {
            return Ok(events.to_vec());
        }

        let response = self.transport.execute(&shape::events_shape(date, date)).await?;
        let decoded: DayResponse = decode("fetch", response)?;

        let day_start = time::day_start(date, self.zone);
        let day_end = time::day_end(date, self.zone);
        let mut events = decoded.events;
        events.retain(|e| e.start < day_end && e.end > day_start);
        events.sort_by_key(|e| e.start);

        self.cache.put_events(key, events.clone());
        Ok(events)
    }

    /// Booking summary for the week at `offset`, cached under the
    /// `metrics` namespace.
    pub async fn week_metrics(&mut self, offset: i64) -> SyncResult<WeekMetrics> {
        let key = offset.to_string();
        if let Some(metrics) = self.cache.metrics(&key) {
            return Ok(metrics.clone());
        }

        let week = self.fetch_week(offset).await?;
        let booked = week
            .events
            .iter()
            .map(|e| (e.end - e.start).max(Duration::zero()))
            .fold(Duration::zero(), |total, d| total + d);
        let metrics = WeekMetrics {
            event_count: week.events.len(),
            booked_hours: booked.num_minutes() as f64 / 60.0,
        };

        self.cache.put_metrics(key, metrics.clone());
        Ok(metrics)
    }

    /// Book a new appointment.
    pub async fn create(&mut self, draft: &EventDraft) -> SyncResult<Event> {
        let payload = serde_json::to_value(draft)?;
        let response = self.transport.execute(&shape::create_shape(payload)).await?;
        let decoded: CreateResponse = decode("create", response)?;

        self.cache.invalidate_after_mutation();
        Ok(decoded.created)
    }

    /// Update an appointment through the fallback chain.
    pub async fn update(&mut self, id: &str, patch: &EventPatch) -> SyncResult<()> {
        let payload = match serde_json::to_value(patch)? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        self.run_fallback("update", &shape::update_shapes(id, &payload))
            .await?;

        self.cache.invalidate_after_mutation();
        Ok(())
    }

    /// Delete an appointment through the fallback chain.
    pub async fn remove(&mut self, id: &str) -> SyncResult<()> {
        self.run_fallback("delete", &shape::delete_shapes(id)).await?;

        self.cache.invalidate_after_mutation();
        Ok(())
    }

    async fn fetch_week(&self, offset: i64) -> SyncResult<WeekResponse> {
        let response = self.transport.execute(&shape::week_shape(offset)).await?;
        decode("fetch", response)
    }

    /// Try each shape in order, returning on the first success.
    ///
    /// Attempts are strictly sequential: a wrong-shape endpoint could
    /// answer 200 without effect, so candidates are never raced. An
    /// intermediate failure only means the shape is unsupported on this
    /// deployment and is swallowed; the last failure is surfaced. A 409
    /// ends the chain immediately -- that endpoint understood the request
    /// and refused it.
    async fn run_fallback(
        &self,
        action: &'static str,
        shapes: &[RequestShape],
    ) -> SyncResult<RawResponse> {
        let mut last_error = None;

        for shape in shapes {
            match self.transport.execute(shape).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    let error = SyncError::from_status(action, response.status, &response.body);
                    if matches!(error, SyncError::Conflict) {
                        return Err(error);
                    }
                    debug!(action, path = %shape.path, status = response.status, "shape rejected, trying next");
                    last_error = Some(error);
                }
                Err(error) => {
                    debug!(action, path = %shape.path, %error, "attempt failed, trying next");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or(SyncError::Api {
            action,
            status: 0,
            message: format!("{action} failed"),
        }))
    }
}

/// Week offsets (relative to `now`'s week) whose buckets cover `[from, to)`.
fn week_offsets(now: DateTime<Utc>, from: DateTime<Utc>, to: DateTime<Utc>, zone: Tz) -> Vec<i64> {
    if from >= to {
        return Vec::new();
    }
    let first = time::week_offset(now, from, zone);
    // The range end is exclusive; step just inside it.
    let last = time::week_offset(now, to - Duration::milliseconds(1), zone);
    (first..=last).collect()
}

fn decode<R: serde::de::DeserializeOwned>(
    action: &'static str,
    response: RawResponse,
) -> SyncResult<R> {
    if !response.is_success() {
        return Err(SyncError::from_status(action, response.status, &response.body));
    }
    Ok(serde_json::from_str(&response.body)?)
}
