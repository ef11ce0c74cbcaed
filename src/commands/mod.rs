pub mod auth;
pub mod preview;
pub mod run;

use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use meetup_core::CalendarWindow;
use meetup_core::window::today_in;

use crate::config::Config;

/// Per-invocation day anchor. "Today" is computed once and every window
/// derives from it.
pub struct RunWindows {
    pub tz: Tz,
    pub today: NaiveDate,
    /// Collection and rendering window
    pub events: CalendarWindow,
    /// Calendar cleanup window
    pub cleanup: CalendarWindow,
}

impl RunWindows {
    pub fn new(cfg: &Config) -> Result<Self> {
        let tz = cfg.tz()?;
        Ok(Self::for_day(cfg, tz, today_in(&tz)))
    }

    pub fn for_day(cfg: &Config, tz: Tz, today: NaiveDate) -> Self {
        RunWindows {
            tz,
            today,
            events: CalendarWindow::build(today, 0, cfg.window_days),
            cleanup: CalendarWindow::build(today, 0, cfg.cleanup_days),
        }
    }
}
