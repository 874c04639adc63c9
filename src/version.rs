// Version information for the Careloom label splitter

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-block-splitting-2025-08-26";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-26";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Careloom {} ({})", VERSION_NUMBER, BUILD_DATE)
}
