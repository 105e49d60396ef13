//! Product notifications (delay, out-of-stock, expiration) and the sinks that
//! deliver them.
//!
//! Notifications are fire-and-forget: the disposition engine sends them and
//! never consults a delivery result beyond propagating a transport failure.

pub mod in_memory_sink;
pub mod notification;
pub mod sink;
pub mod subscription;
pub mod tracing_sink;

pub use in_memory_sink::InMemoryNotificationSink;
pub use notification::Notification;
pub use sink::{NotificationSink, NotifyError};
pub use subscription::Subscription;
pub use tracing_sink::TracingNotificationSink;
