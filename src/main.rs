use anyhow::Result;
use clap::Parser;
use pkgcat::catalog::Query;
use std::path::PathBuf;

/// pkgcat - Package Catalog
///
/// Index a tree of versioned integration packages and answer filtered
/// queries against it.
///
/// Examples:
///   pkgcat search --kibana 7.6.0     # Newest packages compatible with Kibana 7.6.0
///   pkgcat validate --root ./pkgs    # Check every manifest in ./pkgs
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGCAT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package tree root (defaults to ./packages; also via PKGCAT_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "PKGCAT_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search the catalog and print matching packages as JSON
    Search(SearchArgs),

    /// Validate every package manifest in the tree
    Validate,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Only packages compatible with this Kibana version
    #[arg(long, value_name = "VERSION")]
    pub kibana: Option<String>,

    /// Only packages in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only packages with this name
    #[arg(long = "package", value_name = "NAME")]
    pub package: Option<String>,

    /// Return every matching version, not just the newest
    #[arg(long)]
    pub all: bool,

    /// Include internal packages
    #[arg(long)]
    pub internal: bool,

    /// Fail if any package in the tree could not be loaded
    #[arg(long)]
    pub strict: bool,
}

impl SearchArgs {
    fn query(&self) -> Query {
        Query {
            kibana_version: self.kibana.clone(),
            category: self.category.clone(),
            package_name: self.package.clone(),
            all: self.all,
            internal: self.internal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = pkgcat::runtime::RealRuntime;

    match cli.command {
        Commands::Search(args) => {
            let query = args.query();
            tokio::task::spawn_blocking(move || {
                pkgcat::commands::search(runtime, cli.root, &query, args.strict)
            })
            .await??
        }
        Commands::Validate => {
            tokio::task::spawn_blocking(move || pkgcat::commands::validate(runtime, cli.root))
                .await??
        }
    }
    Ok(())
}
