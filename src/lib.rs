pub mod checks;
pub mod config;
pub mod notify;
pub mod report;

pub use checks::dispatcher::{run_all, run_all_with_deadline};
pub use checks::executor::{USER_AGENT, execute};
pub use checks::outcome::{CheckOutcome, Level};
pub use checks::spec::{CheckRules, CheckSpec};
pub use config::{Config, MailgunConfig, ResolvedConfig};
pub use notify::policy::{Decision, NotifyPolicy, decide};
pub use report::{ReportWriter, RunReport};
