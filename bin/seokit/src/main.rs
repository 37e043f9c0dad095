//! Seokit CLI
//!
//! Serves and prints sitemap.xml, robots.txt and head tags for a site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Seokit.
#[derive(Parser)]
#[command(
    name = "seokit",
    version,
    about = "SEO head tags, sitemap and robots.txt for your site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "seokit.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory holding `<collection>.json` files for sitemap sources
    #[arg(long, default_value = "data")]
    data_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve sitemap.xml and robots.txt over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Print the sitemap
    Sitemap,
    /// Print robots.txt
    Robots,
    /// Print the head tags of a page
    Head {
        /// URL of the page being rendered
        #[arg(long)]
        url: String,
        /// Entity whose overrides apply, as type:id
        #[arg(long)]
        entity: Option<String>,
        /// JSON file of override records
        #[arg(long, requires = "entity")]
        overrides: Option<std::path::PathBuf>,
    },
    /// Validate configuration and sitemap sources
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    seokit::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { host, port } => {
            seokit::cmd::serve::run(&cli.config, &cli.data_dir, &host, port).await?;
        }
        Commands::Sitemap => {
            seokit::cmd::sitemap::run(&cli.config, &cli.data_dir)?;
        }
        Commands::Robots => {
            seokit::cmd::robots::run(&cli.config)?;
        }
        Commands::Head {
            url,
            entity,
            overrides,
        } => {
            seokit::cmd::head::run(&cli.config, &url, entity.as_deref(), overrides.as_deref())?;
        }
        Commands::Check { strict } => {
            seokit::cmd::check::run(&cli.config, &cli.data_dir, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_serve_command_parsing() {
        let args = ["seokit", "serve", "--port", "8080"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("seokit.toml"));
        assert_eq!(cli.data_dir, std::path::PathBuf::from("data"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8080);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_head_command_parsing() {
        let args = [
            "seokit",
            "head",
            "--url",
            "https://example.com/post/1",
            "--entity",
            "post:1",
            "--overrides",
            "overrides.json",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Head {
                url,
                entity,
                overrides,
            } => {
                assert_eq!(url, "https://example.com/post/1");
                assert_eq!(entity.as_deref(), Some("post:1"));
                assert_eq!(overrides, Some(std::path::PathBuf::from("overrides.json")));
            }
            _ => panic!("Expected Head command"),
        }
    }

    #[test]
    fn test_cli_overrides_requires_entity() {
        let args = ["seokit", "head", "--url", "/", "--overrides", "o.json"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["seokit", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["seokit", "-vvv", "sitemap"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
        assert!(matches!(cli.command, Commands::Sitemap));
    }

    #[test]
    fn test_cli_custom_config_and_data_dir() {
        let args = [
            "seokit",
            "--config",
            "site.toml",
            "--data-dir",
            "fixtures",
            "robots",
        ];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
        assert_eq!(cli.data_dir, std::path::PathBuf::from("fixtures"));
    }
}
