pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_PAGE_TIMEOUT_MS;

#[derive(Parser)]
#[command(name = "prowl4ai")]
#[command(about = "Headless-browser web crawler with Markdown output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a URL and print the result
    Crawl {
        /// Page load timeout in milliseconds
        #[arg(long, value_name = "ms", default_value_t = DEFAULT_PAGE_TIMEOUT_MS)]
        timeout: u64,

        /// Run the browser headless
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        headless: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,

        /// URL to crawl
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full crawl result as a JSON object
    Json,
    /// Just the extracted Markdown
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["prowl4ai", "crawl", "https://example.com"]).unwrap();
        let Commands::Crawl {
            timeout,
            headless,
            output,
            url,
        } = cli.command;
        assert_eq!(timeout, DEFAULT_PAGE_TIMEOUT_MS);
        assert!(headless);
        assert_eq!(output, OutputFormat::Json);
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn test_crawl_flags_parse() {
        let cli = Cli::try_parse_from([
            "prowl4ai",
            "crawl",
            "--timeout",
            "5000",
            "--headless",
            "false",
            "--output",
            "markdown",
            "https://example.com",
        ])
        .unwrap();
        let Commands::Crawl {
            timeout,
            headless,
            output,
            ..
        } = cli.command;
        assert_eq!(timeout, 5000);
        assert!(!headless);
        assert_eq!(output, OutputFormat::Markdown);
    }

    #[test]
    fn test_crawl_requires_url() {
        assert!(Cli::try_parse_from(["prowl4ai", "crawl"]).is_err());
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        let parsed = Cli::try_parse_from([
            "prowl4ai",
            "crawl",
            "--output",
            "yaml",
            "https://example.com",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["prowl4ai", "serve"]).is_err());
    }
}
