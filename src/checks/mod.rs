//! The probe core
//!
//! Everything needed to turn a watchlist into per-endpoint outcomes:
//!
//! - [`spec`]: what to check ([`spec::CheckSpec`])
//! - [`executor`]: one probe, one outcome, faults contained
//! - [`dispatcher`]: concurrent fan-out over a shared client
//! - [`html`]: visible-text extraction for the rendered-text rule
//! - [`outcome`]: the per-check result record
//!
//! ```text
//! watchlist → [CheckSpec, ...] → dispatcher ⇉ executor (N tasks)
//!                                     │
//!                                     └→ [CheckOutcome, ...] → report
//! ```

pub mod dispatcher;
pub mod executor;
pub mod html;
pub mod outcome;
pub mod spec;
