use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rinth::models::{project::ProjectType, version::VersionType};

#[derive(Parser)]
#[command(verbatim_doc_comment)]
///          _       __  __
///    _____(_)___  / /_/ /_
///   / ___/ / __ \/ __/ __ \
///  / /  / / / / / /_/ / / /
/// /_/  /_/_/ /_/\__/_/ /_/
/// Modrinth CLI client
pub struct Cli {
    /// TOML file with the client settings
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    /// Token sent with every request, overrides the config file
    #[arg(long, short = 't', global = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for projects
    Search {
        query: Option<String>,
        #[arg(long, short = 'p')]
        project_type: Option<ProjectType>,
        /// Category facets, e.g. `fabric`
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Game version facets, e.g. `1.20.1`
        #[arg(long = "game-version")]
        game_versions: Vec<String>,
        #[arg(long, default_value = "relevance")]
        index: rinth::Index,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = rinth::search::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Show a project
    Project { id_or_slug: String },
    /// List the versions of a project
    Versions {
        id_or_slug: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Download the latest matching version of a project
    Download {
        id_or_slug: String,
        /// Exact version number instead of the latest one
        #[arg(long, short = 'v')]
        version: Option<String>,
        /// Also download the dependencies
        #[arg(long, short = 'r')]
        recursive: bool,
        #[arg(long, short = 'd', default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a user, or the owner of the token when no user is given
    User { id_or_username: Option<String> },
    /// List the categories of a project type by header
    Categories {
        #[arg(long, short = 'p', default_value = "mod")]
        project_type: ProjectType,
    },
}

#[derive(clap::Args)]
pub struct FilterArgs {
    #[arg(long = "loader")]
    pub loaders: Vec<String>,
    #[arg(long = "game-version")]
    pub game_versions: Vec<String>,
    #[arg(long = "version-type")]
    pub version_types: Vec<VersionType>,
    #[arg(long)]
    pub featured: Option<bool>,
}
