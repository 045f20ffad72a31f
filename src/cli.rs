use crate::commands::{self, GenerateParams};
use crate::log_debug;
use crate::logger::LogDestination;
use crate::session::Lane;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use std::path::PathBuf;

const LOG_FILE: &str = "study-circle-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Study Circle: notes, flashcards, quizzes and resources for any topic",
    long_about = "Study Circle turns a topic and an optional course plan into study notes, flashcards, a short quiz and curated learning resources.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path, or `-` for stderr
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path (use - for stderr)"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, waiting messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

impl Cli {
    /// Where `--log` output goes, or `None` when logging is off
    pub fn log_destination(&self) -> Option<LogDestination> {
        self.log
            .then(|| LogDestination::parse(self.log_file.as_deref().unwrap_or(LOG_FILE)))
    }
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate study material for a topic
    #[command(
        about = "Generate notes, flashcards, a quiz and resources",
        long_about = "Generate notes, flashcards, a quiz and resources for a topic. All sections are generated concurrently; a failing section does not stop the others."
    )]
    Generate {
        /// Topic or question to study
        query: String,

        /// Course plan file (.txt or .md)
        #[arg(long = "course-plan", conflicts_with = "plan_text")]
        course_plan: Option<PathBuf>,

        /// Course plan text, e.g. pasted from a PDF
        #[arg(long = "plan-text")]
        plan_text: Option<String>,

        /// Only print these sections (notes, flashcards, quiz, resources)
        #[arg(long = "only", value_delimiter = ',')]
        only: Vec<Lane>,

        /// Take the quiz interactively once it is ready
        #[arg(long)]
        quiz: bool,
    },

    /// Configure Study Circle settings
    #[command(about = "Configure Study Circle settings")]
    Config {
        /// Set the Gemini API key
        #[arg(long)]
        api_key: Option<String>,

        /// Set the model name
        #[arg(long)]
        model: Option<String>,

        /// Set the API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Set the course plan length limit in characters
        #[arg(long = "max-plan-chars")]
        max_plan_chars: Option<usize>,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if let Some(destination) = cli.log_destination() {
        crate::logger::enable_logging(&destination)?;

        if let Ok(config) = crate::config::Config::load() {
            crate::logger::set_verbose_logging(config.verbose_logging);
            if config.verbose_logging {
                log_debug!("Verbose logging enabled - will show HTTP requests");
            }
        }
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command).await
    } else {
        let _ = Cli::parse_from(["study-circle", "--help"]);
        Ok(())
    }
}

/// Handle the command based on parsed arguments
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            query,
            course_plan,
            plan_text,
            only,
            quiz,
        } => {
            log_debug!(
                "Handling 'generate' command: query={:?}, course_plan={:?}, only={:?}, quiz={}",
                query,
                course_plan,
                only,
                quiz
            );
            commands::handle_generate_command(GenerateParams {
                query,
                course_plan_file: course_plan,
                course_plan_text: plan_text,
                only,
                interactive_quiz: quiz,
            })
            .await
        }
        Commands::Config {
            api_key,
            model,
            base_url,
            max_plan_chars,
        } => {
            log_debug!(
                "Handling 'config' command: model={:?}, base_url={:?}, max_plan_chars={:?}",
                model,
                base_url,
                max_plan_chars
            );
            commands::handle_config_command(api_key, model, base_url, max_plan_chars)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(args: &[&str]) -> Option<LogDestination> {
        Cli::try_parse_from(args)
            .expect("arguments parse")
            .log_destination()
    }

    #[test]
    fn test_log_destination_from_flags() {
        assert_eq!(destination(&["study-circle", "generate", "mitosis"]), None);
        assert_eq!(
            destination(&["study-circle", "--log", "generate", "mitosis"]),
            Some(LogDestination::File(LOG_FILE.into()))
        );
        assert_eq!(
            destination(&["study-circle", "generate", "mitosis", "--log", "--log-file", "-"]),
            Some(LogDestination::Stderr)
        );
    }

    #[test]
    fn test_only_accepts_lane_names() {
        let cli = Cli::try_parse_from(["study-circle", "generate", "x", "--only", "notes,quiz"])
            .expect("lanes parse");
        let Some(Commands::Generate { only, .. }) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(only, vec![Lane::Notes, Lane::Quiz]);
        assert!(Cli::try_parse_from(["study-circle", "generate", "x", "--only", "bogus"]).is_err());
    }
}
