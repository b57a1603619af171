//! Admin console plumbing: an authenticated backend client, a toast queue
//! for surfacing outcomes, and the admin credential gate.

pub mod api;
pub mod gate;
pub mod toast;
