//! Settings handler

use crate::Planner;
use crate::formatting;
use crate::validation;
use anyhow::Result;

impl Planner {
    /// Show settings, or change the given ones and show the result
    pub async fn handle_settings(
        &self,
        language: Option<String>,
        timezone: Option<String>,
        theme: Option<String>,
    ) -> Result<String> {
        if language.is_none() && timezone.is_none() && theme.is_none() {
            return Ok(formatting::format_settings(&self.settings()));
        }

        let language = language.as_deref().map(validation::parse_language).transpose()?;
        let timezone = timezone.as_deref().map(validation::parse_tz).transpose()?;
        let theme = theme.as_deref().map(validation::parse_theme).transpose()?;

        let settings = self.update_settings(language, timezone, theme)?;
        Ok(formatting::format_settings(&settings))
    }
}
