//! Remote event synchronization for bookcal.
//!
//! Talks to the remote event store over HTTP. The endpoint contract
//! varies by deployment, so mutations run through an ordered fallback
//! chain of request shapes; reads go through a read-through query cache
//! that mutations invalidate wholesale.

pub mod cache;
pub mod client;
pub mod error;
pub mod shape;
pub mod transport;

pub use cache::{Namespace, QueryCache, WeekMetrics};
pub use client::EventSyncClient;
pub use error::{SyncError, SyncResult};
pub use transport::{HttpTransport, RawResponse, Transport};
