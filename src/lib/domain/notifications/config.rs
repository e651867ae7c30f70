//! Notification configuration

use std::path::PathBuf;

use clap::Parser;

use crate::domain::communication::email_addresses::EmailAddress;

/// The placeholder substituted with the request's subject
const SUBJECT_PLACEHOLDER: &str = "%s";

/// Process-wide notification settings, read once at startup
#[derive(Clone, Debug, Parser)]
pub struct NotificationConfig {
    /// Send notifications at all
    #[clap(long, env = "NOTIFICATIONS_ENABLED", default_value = "false")]
    pub enabled: bool,

    /// Directory that local image references are resolved against
    #[clap(long, env = "NOTIFICATIONS_RESOURCE_ROOT", default_value = "templates")]
    pub resource_root: PathBuf,

    /// Sender used when a request does not name one
    #[clap(long, env = "NOTIFICATIONS_DEFAULT_SENDER")]
    pub default_sender: EmailAddress,

    /// Subject format, `%s` is replaced with the request's subject
    #[clap(
        long,
        env = "NOTIFICATIONS_SUBJECT_FORMAT",
        default_value = "[Notification] %s"
    )]
    pub subject_format: String,

    /// Inline stylesheets into the rendered HTML before embedding images
    #[clap(long, env = "NOTIFICATIONS_INLINE_CSS", default_value = "false")]
    pub inline_css: bool,
}

impl NotificationConfig {
    /// Applies the subject format to `subject`
    pub fn subject(&self, subject: &str) -> String {
        self.subject_format.replacen(SUBJECT_PLACEHOLDER, subject, 1)
    }
}

/// A configuration sending from `noreply@example.com` with the default subject format
#[cfg(test)]
pub fn test_config(enabled: bool) -> NotificationConfig {
    NotificationConfig {
        enabled,
        resource_root: PathBuf::from("templates"),
        default_sender: EmailAddress::new_unchecked("noreply@example.com"),
        subject_format: "[Notification] %s".to_string(),
        inline_css: false,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_subject_substitutes_placeholder() {
        let config = test_config(true);

        assert_eq!(config.subject("Welcome"), "[Notification] Welcome");
        assert_eq!(config.subject(""), "[Notification] ");
    }

    #[test]
    fn test_subject_only_substitutes_first_placeholder() {
        let config = NotificationConfig {
            subject_format: "%s (%s)".to_string(),
            ..test_config(true)
        };

        assert_eq!(config.subject("Hi"), "Hi (%s)");
    }

    #[test]
    fn test_parse_from_arguments() -> TestResult {
        let config = NotificationConfig::try_parse_from([
            "notify",
            "--default-sender",
            "noreply@example.com",
            "--resource-root",
            "/srv/templates",
        ])?;

        assert!(!config.enabled);
        assert!(!config.inline_css);
        assert_eq!(config.resource_root, PathBuf::from("/srv/templates"));
        assert_eq!(config.default_sender.as_str(), "noreply@example.com");
        assert_eq!(config.subject_format, "[Notification] %s");

        Ok(())
    }

    #[test]
    fn test_parse_rejects_invalid_default_sender() {
        let result =
            NotificationConfig::try_parse_from(["notify", "--default-sender", "not-an-address"]);

        assert!(result.is_err());
    }
}
