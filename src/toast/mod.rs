//! Transient notification queue for the admin UI.
//!
//! Toasts are pushed (usually in response to an API outcome), shown in
//! arrival order, and dropped either on dismissal or when their timer fires.

pub mod kind;
pub mod queue;

pub use kind::ToastKind;
pub use queue::{SubscriptionId, Toast, ToastQueue, DEFAULT_DURATION};
