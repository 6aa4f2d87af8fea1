//! Command-line interface definitions.
//!
//! Arguments can be given as flags; the API key can also come from the
//! environment so it never has to appear in shell history.

use clap::Parser;
use std::path::PathBuf;

/// Score recent news about a topic and print a Buy / Hold / Sell call.
///
/// # Examples
///
/// ```sh
/// # Dry run: fallback article list, canned sentiment, no API quota spent
/// news_sentiment "dow jones"
///
/// # Live search and classification
/// RAPIDAPI_KEY=... news_sentiment --live "nvidia"
///
/// # Full report as JSON with a custom selector/exclusion file
/// news_sentiment --live --json -c sentiment.yaml "tesla"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search news for
    #[arg(default_value = "dow jones")]
    pub topic: String,

    /// Use live news search and live sentiment classification (spends API quota)
    #[arg(short, long)]
    pub live: bool,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the full report as JSON instead of the one-line assessment
    #[arg(long)]
    pub json: bool,

    /// RapidAPI key used for news search and sentiment classification
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
    pub rapidapi_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_sentiment"]);

        assert_eq!(cli.topic, "dow jones");
        assert!(!cli.live);
        assert!(!cli.json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_live_with_topic() {
        let cli = Cli::parse_from([
            "news_sentiment",
            "--live",
            "--rapidapi-key",
            "abc123",
            "--config",
            "./sentiment.yaml",
            "nvidia earnings",
        ]);

        assert_eq!(cli.topic, "nvidia earnings");
        assert!(cli.live);
        assert_eq!(cli.rapidapi_key.as_deref(), Some("abc123"));
        assert_eq!(cli.config, Some(PathBuf::from("./sentiment.yaml")));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_sentiment", "-l", "-c", "/tmp/c.yaml", "--json", "tesla"]);

        assert!(cli.live);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert_eq!(cli.topic, "tesla");
    }
}
