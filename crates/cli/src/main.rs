//! CLI for the pymod Python module introspection tool.
//!
//! Pipeline: resolve root -> load module tree(s) -> query/render -> print.

use clap::{Parser, Subcommand};
use pymod_analyzer::reporter::{self, Styles};
use pymod_analyzer::sink::{self, json_stream::JsonStreamSink};
use pymod_analyzer::{query, ModuleNode};
use pymod_core::{ModuleKind, ModulePath, PymodError};
use pymod_provider::{mover, scaffold, toolchain};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pymod", version, about = "Python module introspection and management")]
struct Cli {
    /// Project root containing the Python sources.
    #[arg(long, env = "PYMOD_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a new module (package by default).
    Add {
        /// Dotted path of the module to create.
        module: String,

        /// Create a file module instead of a package.
        #[arg(short, long)]
        file: bool,

        /// File submodules to create inside the new package.
        #[arg(short, long, num_args = 1..)]
        contains: Vec<String>,
    },

    /// Move a module and rewrite imports that reference it.
    Mv {
        /// Dotted path of the module to move.
        module: String,

        /// New dotted path.
        to: String,
    },

    /// Search definitions by name.
    Find {
        /// Case-insensitive name fragment to search for.
        query: String,

        /// Module to search; all top-level modules when omitted.
        module: Option<String>,

        /// Match functions (and methods).
        #[arg(short, long)]
        functions: bool,

        /// Match classes.
        #[arg(short, long)]
        classes: bool,

        /// Match module variables.
        #[arg(short, long)]
        variables: bool,

        /// Emit NDJSON rows instead of the colored report.
        #[arg(long)]
        json: bool,
    },

    /// Print a module tree.
    View {
        /// Module to print; all top-level modules when omitted.
        module: Option<String>,

        /// Also print reconstructed definition signatures.
        #[arg(short, long)]
        code: bool,

        /// Emit NDJSON rows instead of the colored tree.
        #[arg(long)]
        json: bool,
    },

    /// Report on the local Python toolchain and project metadata.
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_path();

    match cli.command {
        Commands::Add {
            module,
            file,
            contains,
        } => run_add(root, &module, file, &contains)?,
        Commands::Mv { module, to } => run_mv(root, &module, &to)?,
        Commands::Find {
            query,
            module,
            functions,
            classes,
            variables,
            json,
        } => {
            let selector = query::Selector {
                functions,
                classes,
                variables,
            };
            run_find(root, &query, module.as_deref(), selector, json)?;
        }
        Commands::View { module, code, json } => run_view(root, module.as_deref(), code, json)?,
        Commands::Check => run_check(root)?,
    }

    Ok(())
}

fn run_add(
    root: &Path,
    module: &str,
    file: bool,
    contains: &[String],
) -> Result<(), PymodError> {
    if file && !contains.is_empty() {
        return Err(PymodError::Unsupported(
            "file modules cannot contain submodules".into(),
        ));
    }

    let module = ModulePath::new(module)?;
    let kind = if file {
        ModuleKind::File
    } else {
        ModuleKind::Package
    };

    let path = scaffold::create_module(root, &module, kind)?;
    println!("created {module} ({})", path.display());

    for child in contains {
        let child_path = scaffold::add_submodule(root, &module, kind, child, ModuleKind::File)?;
        println!("created {module}.{child} ({})", child_path.display());
    }

    Ok(())
}

fn run_mv(root: &Path, module: &str, to: &str) -> Result<(), PymodError> {
    let from = ModulePath::new(module)?;
    let to = ModulePath::new(to)?;
    let kind = mover::move_module(root, &from, &to)?;
    println!("moved {from} -> {to} ({})", kind.as_str());
    Ok(())
}

fn run_find(
    root: &Path,
    search: &str,
    module: Option<&str>,
    selector: query::Selector,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let trees = load_trees(root, module)?;
    let styles = Styles::colored();

    if json {
        let mut sink = JsonStreamSink::stdout();
        for tree in &trees {
            let matches = query::find(tree, search, selector);
            sink.write_definitions(&sink::rows_for_matches(&matches))?;
        }
        let written = sink.finish()?;
        tracing::info!(rows = written, "ndjson find results written");
        return Ok(());
    }

    for tree in &trees {
        let matches = query::find(tree, search, selector);
        print!(
            "{}",
            reporter::render_matches(search, tree.path.as_str(), &matches, &styles)
        );
    }

    Ok(())
}

fn run_view(
    root: &Path,
    module: Option<&str>,
    code: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let trees = load_trees(root, module)?;

    if json {
        let mut sink = JsonStreamSink::stdout();
        for tree in &trees {
            sink.write_tree(&sink::collect_rows(tree))?;
        }
        let written = sink.finish()?;
        tracing::info!(rows = written, "ndjson tree written");
        return Ok(());
    }

    let styles = Styles::colored();
    for tree in &trees {
        print!("{}", reporter::render_tree(tree, code, &styles));
    }

    Ok(())
}

fn run_check(root: &Path) -> Result<(), PymodError> {
    let tools = [toolchain::probe_python(), toolchain::probe_poetry()];
    let project = toolchain::read_pyproject(root)?;

    print!(
        "{}",
        reporter::render_check(&tools, project.as_ref(), &Styles::colored())
    );
    Ok(())
}

/// Resolves the trees a command operates on: the named module, or every
/// top-level module under the root.
fn load_trees(root: &Path, module: Option<&str>) -> Result<Vec<ModuleNode>, PymodError> {
    match module {
        Some(module) => {
            let path = ModulePath::new(module)?;
            let kind = mover::detect_kind(root, &path)?;
            Ok(vec![ModuleNode::load(root, &path, kind)?])
        }
        None => {
            let trees = ModuleNode::load_top_level(root)?;
            if trees.is_empty() {
                tracing::warn!(root = %root.display(), "no Python modules found");
            }
            Ok(trees)
        }
    }
}
