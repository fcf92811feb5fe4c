use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::common::{CacheArgs, GitLabArgs, RenderArgs};

#[derive(Parser)]
#[command(
    name = "gomodgraph",
    about = "Visualize how the Go modules on your GitLab instance depend on each other",
    long_about = "gomodgraph downloads the go.mod file of every project on a GitLab instance, \
                  caches them locally and draws the dependency graph between the modules it \
                  found. Edges pointing at an outdated release of a module are highlighted. \
                  Rendering needs Graphviz.",
    version
)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, env = "GOMODGRAPH_VERBOSE")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, env = "GOMODGRAPH_QUIET")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download all go.mod files into the local cache
    ///
    /// Lists every project the token can see and stores the go.mod file of
    /// each one together with its latest tag. Other commands reuse the cache
    /// until it is refreshed.
    #[command(
        long_about = "Populate the manifest cache from GitLab. Every visible project is checked \
                      for a go.mod file on its default branch; projects without one are counted \
                      and skipped. The most recently updated tag of each project is recorded as \
                      the module's latest version. Use --refresh to start from an empty cache."
    )]
    Fetch {
        #[command(flatten)]
        gitlab: GitLabArgs,

        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Render the dependency graph to a file
    ///
    /// Renders the whole graph, or the neighborhood of one module, as SVG,
    /// PNG or Graphviz DOT. An empty cache is populated first.
    #[command(
        long_about = "Build the dependency graph from the manifest cache and write one image. \
                      Without --mod the overview of all modules is drawn; with --mod only the \
                      module, its direct dependencies and its direct dependents are shown. The \
                      module may be given with or without the GitLab host prefix."
    )]
    Render {
        #[command(flatten)]
        gitlab: GitLabArgs,

        #[command(flatten)]
        cache: CacheArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Center the graph on this module
        #[arg(short, long = "mod", value_name = "MODULE", env = "GOMODGRAPH_MODULE")]
        module: Option<String>,

        /// Image format
        #[arg(
            short,
            long,
            value_enum,
            default_value = crate::constants::output::DEFAULT_FORMAT,
            env = "GOMODGRAPH_FORMAT"
        )]
        format: ImageFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, env = "GOMODGRAPH_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Serve the browsable dependency graph over HTTP
    ///
    /// Every module in the rendered SVG links to its own neighborhood view,
    /// so the graph can be explored by clicking through it.
    #[command(
        long_about = "Build the dependency graph from the manifest cache and serve it on \
                      localhost. GET / returns the overview, GET /?mod=<module> the neighborhood \
                      of one module and adding &png returns a PNG instead of an SVG. The graph is \
                      built once at startup; restart with --refresh to pick up new manifests."
    )]
    Serve {
        #[command(flatten)]
        gitlab: GitLabArgs,

        #[command(flatten)]
        cache: CacheArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Module linked in the startup message
        #[arg(long = "mod", value_name = "MODULE", env = "GOMODGRAPH_HOME_MODULE")]
        home_module: Option<String>,

        /// Port to listen on, 0 picks a free one
        #[arg(
            short,
            long,
            default_value_t = crate::constants::server::DEFAULT_PORT,
            env = "GOMODGRAPH_PORT"
        )]
        port: u16,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Svg,
    Png,
    Dot,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Dot => "dot",
        };
        f.write_str(name)
    }
}
