//! Auxiliary maintenance actions.
//!
//! Both actions walk a catalog's item listing the same way the retention
//! engine does, with simpler per-item work:
//!
//! - [`SeasonUnmonitor`] stops monitoring seasons none of whose episodes
//!   are monitored any more.
//! - [`RefreshTrigger`] asks the catalog to rescan every item.
//!
//! A failure listing items ends that catalog's pass; a failure on one
//! item is recorded and the loop moves on.

mod refresh;
mod report;
mod unmonitor;

pub use refresh::RefreshTrigger;
pub use report::{ItemAction, MaintenanceItem, MaintenanceReport, MaintenanceTask};
pub use unmonitor::{SeasonUnmonitor, seasons_to_unmonitor};
