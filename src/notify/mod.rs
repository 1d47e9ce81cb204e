//! Notification pipeline
//!
//! After a run is aggregated, [`policy::decide`] picks between silence,
//! an alert and an all-clear heartbeat. [`mailgun`] composes and delivers
//! the message, [`heartbeat`] keeps the quiet-period clock on disk.

pub mod heartbeat;
pub mod mailgun;
pub mod policy;
