use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 🤖 Desktop automation by template matching
#[derive(Debug, Parser)]
#[command(name = "desktop-autoclick", version = env!("AUTOCLICK_VERSION"))]
pub struct Args {
    /// Enable debug output (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a workflow file
    Run {
        workflow: PathBuf,
        /// Directory with template images, overrides the file's template_dir
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Log pointer actions instead of performing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Look for one template on screen and print where it is
    Locate {
        template: PathBuf,
        #[arg(long)]
        threshold: f32,
        #[arg(long, default_value_t = 3)]
        attempts: u32,
        /// Seconds between attempts
        #[arg(long, default_value_t = 1.0)]
        interval: f64,
        /// Match against a saved screenshot instead of the live display
        #[arg(long)]
        screen: Option<PathBuf>,
        /// Click the match
        #[arg(long, conflicts_with = "screen")]
        click: bool,
    },
    /// Save the primary display to a PNG file
    Screenshot {
        #[arg(long, short, default_value = "cli-screenshot.png")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let args = Args::parse_from([
            "desktop-autoclick",
            "--debug",
            "run",
            "workflows/daily.toml",
            "--dry-run",
        ]);
        assert!(args.debug);
        match args.command {
            Command::Run {
                workflow,
                templates,
                dry_run,
            } => {
                assert_eq!(workflow, PathBuf::from("workflows/daily.toml"));
                assert!(templates.is_none());
                assert!(dry_run);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locate_requires_threshold() {
        assert!(Args::try_parse_from(["desktop-autoclick", "locate", "Home.png"]).is_err());

        let args = Args::try_parse_from([
            "desktop-autoclick",
            "locate",
            "Home.png",
            "--threshold",
            "0.7",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Locate { attempts: 3, interval, click: false, .. } if interval == 1.0
        ));
    }

    #[test]
    fn test_screenshot_default_output() {
        let args = Args::parse_from(["desktop-autoclick", "screenshot"]);
        assert!(matches!(
            args.command,
            Command::Screenshot { output } if output == PathBuf::from("cli-screenshot.png")
        ));
    }
}
