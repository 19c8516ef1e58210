//! Command-line argument parsing for the console.
//!
//! This module handles parsing command-line arguments and determining
//! which command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Run the TUI application (default)
    RunTui {
        /// Base URL of a REST identity gateway. Without it the built-in
        /// demo gateway is used.
        gateway_url: Option<String>,
    },
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use vestibule::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["vestibule".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut gateway_url = None;
    let mut args = args.skip(1); // Skip the program name

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--gateway-url" => {
                gateway_url = args.next();
            }
            other => {
                if let Some(url) = other.strip_prefix("--gateway-url=") {
                    gateway_url = Some(url.to_string());
                }
            }
        }
    }

    CliCommand::RunTui { gateway_url }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["vestibule", "--version"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_version_short_flag() {
        assert_eq!(parse(&["vestibule", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args_runs_tui_with_demo_gateway() {
        assert_eq!(
            parse(&["vestibule"]),
            CliCommand::RunTui { gateway_url: None }
        );
    }

    #[test]
    fn test_parse_gateway_url_with_separate_value() {
        assert_eq!(
            parse(&["vestibule", "--gateway-url", "http://id.local:8080"]),
            CliCommand::RunTui {
                gateway_url: Some("http://id.local:8080".to_string())
            }
        );
    }

    #[test]
    fn test_parse_gateway_url_with_equals() {
        assert_eq!(
            parse(&["vestibule", "--gateway-url=http://id.local"]),
            CliCommand::RunTui {
                gateway_url: Some("http://id.local".to_string())
            }
        );
    }

    #[test]
    fn test_parse_unknown_flag_is_ignored() {
        assert_eq!(
            parse(&["vestibule", "--unknown"]),
            CliCommand::RunTui { gateway_url: None }
        );
    }

    #[test]
    fn test_version_wins_over_gateway_url() {
        assert_eq!(
            parse(&["vestibule", "--version", "--gateway-url", "http://x"]),
            CliCommand::Version
        );
    }
}
