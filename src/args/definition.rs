//! Command-line argument definition.

use clap::Parser;

/// Lisan - bilingual (Arabic/English) client that keeps every section in step with the active language
#[derive(Parser, Debug)]
#[command(name = "lisan")]
#[command(version)]
#[command(about = "Fetch and render localized sections from the backend API", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Start in this locale (ar, en); overrides settings.conf
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Switch to this locale after the first render and render again
    #[arg(long)]
    pub switch_to: Option<String>,

    /// Force dark mode (persisted)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (persisted)
    #[arg(long)]
    pub light: bool,

    /// API root, e.g. https://example.com/api; overrides settings.conf
    #[arg(long)]
    pub api_base: Option<String>,

    /// Sections to show (repeatable); see --list-sections
    #[arg(short, long = "section", num_args = 1..)]
    pub sections: Vec<String>,

    /// Search text applied to searchable sections
    #[arg(long)]
    pub search: Option<String>,

    /// Page requested from paginated sections
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Store a session token before fetching
    #[arg(long, conflicts_with = "logout")]
    pub token: Option<String>,

    /// Forget the stored session token
    #[arg(long)]
    pub logout: bool,

    /// Print the available sections and exit
    #[arg(long)]
    pub list_sections: bool,
}

/// What: Determine the log level from the flags.
///
/// Details:
/// - `--verbose` wins over `--log-level`
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// Dark-mode override requested on the command line.
#[must_use]
pub const fn theme_override(args: &Args) -> Option<bool> {
    if args.dark {
        Some(true)
    } else if args.light {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_overrides() {
        let args = Args::try_parse_from([
            "lisan", "--locale", "en", "-s", "faq", "news", "--page", "2", "--dark", "-v",
        ])
        .expect("parse");
        assert_eq!(args.sections, vec!["faq".to_string(), "news".to_string()]);
        assert_eq!(args.page, Some(2));
        assert_eq!(theme_override(&args), Some(true));
        assert_eq!(determine_log_level(&args), "debug");
    }

    #[test]
    fn dark_and_light_conflict() {
        assert!(Args::try_parse_from(["lisan", "--dark", "--light"]).is_err());
        assert!(Args::try_parse_from(["lisan", "--token", "t", "--logout"]).is_err());
    }
}
