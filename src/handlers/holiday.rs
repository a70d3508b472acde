//! Holiday handlers

use crate::Planner;
use crate::formatting;
use crate::validation;
use anyhow::Result;

impl Planner {
    /// Holiday and make-up workday entries for a year
    pub async fn handle_holidays(&self, year: String) -> Result<String> {
        let year = validation::parse_year(&year)?;
        let holidays = self.holiday_map(year).await;
        Ok(formatting::format_holidays(year, &holidays))
    }

    /// Refresh a year's cached holidays from the configured payload files
    pub async fn handle_sync_holidays(&self, year: String) -> Result<String> {
        let year = validation::parse_year(&year)?;
        let report = self.sync_holidays(year).await?;
        Ok(formatting::format_sync_report(&report))
    }
}
