//! Report row projection

use crate::client::models::DynamicScanConfig;
use crate::error::ReportError;

/// Header of the report worksheet, in column order
pub const REPORT_COLUMNS: [&str; 9] = [
    "Application",
    "Site URL",
    "Authorization Type",
    "Primary User Name",
    "Secondary User Name",
    "Other User Name",
    "Site Facing",
    "Entitlement Frequency Type",
    "Time Zone",
];

/// One data row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub application: String,
    pub site_url: String,
    pub authentication_type: String,
    pub primary_user_name: String,
    pub secondary_user_name: String,
    pub other_user_name: String,
    pub environment_facing_type: String,
    pub entitlement_frequency_type: String,
    pub time_zone: String,
}

impl ReportRow {
    /// Project a release's configuration onto the report columns.
    ///
    /// Unset configuration fields become empty cells; a release without an
    /// application name cannot be reported.
    pub fn build(application_name: &str, config: &DynamicScanConfig) -> Result<Self, ReportError> {
        if application_name.trim().is_empty() {
            return Err(ReportError::MissingApplicationName);
        }

        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(Self {
            application: application_name.to_string(),
            site_url: config.site_url().unwrap_or_default().to_string(),
            authentication_type: text(&config.authentication_type),
            primary_user_name: text(&config.primary_user_name),
            secondary_user_name: text(&config.secondary_user_name),
            other_user_name: text(&config.other_user_name),
            environment_facing_type: text(&config.environment_facing_type),
            entitlement_frequency_type: text(&config.entitlement_frequency_type),
            time_zone: text(&config.time_zone),
        })
    }

    /// Cell values in [`REPORT_COLUMNS`] order
    pub fn cells(&self) -> [&str; 9] {
        [
            self.application.as_str(),
            self.site_url.as_str(),
            self.authentication_type.as_str(),
            self.primary_user_name.as_str(),
            self.secondary_user_name.as_str(),
            self.other_user_name.as_str(),
            self.environment_facing_type.as_str(),
            self.entitlement_frequency_type.as_str(),
            self.time_zone.as_str(),
        ]
    }
}
