//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Vitrine site build pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: vitrine.toml)
    #[arg(short = 'C', long, default_value = "vitrine.toml")]
    pub config: PathBuf,

    /// Build environment: "dev" or "prod".
    ///
    /// Overrides the VITRINE_ENV environment variable. Anything other
    /// than "dev" selects production mode.
    #[arg(short, long)]
    pub env: Option<String>,

    /// Minify the html output
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Build task names accepted by `vitrine build`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "lowercase")]
pub enum Task {
    /// Compile the main stylesheet
    Css,
    /// Copy the image tree
    Images,
    /// Lint the JavaScript sources
    Lint,
    /// Lint, bundle and (in prod) minify JavaScript
    Javascript,
    /// Render front-matter/markdown/template pages
    Pages,
}

impl Task {
    /// The default task set: everything except the standalone lint task.
    pub const DEFAULT: &[Task] = &[Task::Css, Task::Images, Task::Javascript, Task::Pages];
}

/// Shared build arguments for Build, Serve and Deploy commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clear output directory completely before building
    #[arg(long)]
    pub clean: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run build tasks (all of css, images, javascript, pages by default)
    Build {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Tasks to run; empty means the default set
        #[arg(value_enum)]
        tasks: Vec<Task>,
    },

    /// Lint the JavaScript sources without bundling
    Lint,

    /// Delete the output directory
    Clean,

    /// Build, then serve the site. Rebuild on change automatically
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port to listen on (default: 4000)
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Build, then push the output tree to the hosting branch
    Deploy {
        #[command(flatten)]
        build_args: BuildArgs,

        /// force push the hosting branch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        force: Option<bool>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_deploy(&self) -> bool {
        matches!(self.command, Commands::Deploy { .. })
    }

    /// The build flags shared by Build/Serve/Deploy, if the command has them.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args, .. }
            | Commands::Serve { build_args, .. }
            | Commands::Deploy { build_args, .. } => Some(build_args),
            Commands::Lint | Commands::Clean => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_tasks_empty() {
        let cli = Cli::parse_from(["vitrine", "build"]);
        match cli.command {
            Commands::Build { tasks, .. } => assert!(tasks.is_empty()),
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_build_named_tasks() {
        let cli = Cli::parse_from(["vitrine", "build", "css", "pages"]);
        match cli.command {
            Commands::Build { tasks, .. } => {
                assert_eq!(tasks, vec![Task::Css, Task::Pages]);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_serve_port_short_flag() {
        let cli = Cli::parse_from(["vitrine", "serve", "-p", "8080"]);
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(8080)),
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_env_flag() {
        let cli = Cli::parse_from(["vitrine", "--env", "dev", "build"]);
        assert_eq!(cli.env.as_deref(), Some("dev"));
    }

    #[test]
    fn test_deploy_force() {
        let cli = Cli::parse_from(["vitrine", "deploy", "--force"]);
        match cli.command {
            Commands::Deploy { force, .. } => assert_eq!(force, Some(true)),
            _ => panic!("expected deploy command"),
        }
    }
}
