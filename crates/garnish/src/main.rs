use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use garnish_decorator::{DecoratedTree, Decorator, Restorer};
use garnish_errors::Renderer;
use garnish_inputs::File;
use garnish_syntax::Registry;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
struct Options {
    /// Log filter, e.g. `garnish=debug`. Overrides `GARNISH_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decorate a file and print it back.
    Roundtrip {
        path: Utf8PathBuf,
        /// Overwrite the file instead of printing to stdout.
        #[arg(long)]
        write: bool,
    },
    /// Report files that do not survive a round trip unchanged.
    Check { paths: Vec<Utf8PathBuf> },
    /// Print the decorated tree.
    Dump { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let filter = match &options.log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_env("GARNISH_LOG")
            .unwrap_or_else(|_| EnvFilter::new("garnish=warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let registry = Registry::standard();
    match options.command {
        Command::Roundtrip { path, write } => {
            let file = read(&path)?;
            let tree = decorate(&registry, &file)?;
            let restorer = Restorer::new(&registry);
            if write {
                let text = restorer.print(&tree)?;
                std::fs::write(&path, text).with_context(|| format!("failed to write `{path}`"))?;
            } else {
                restorer.fprint(&mut std::io::stdout().lock(), &tree)?;
            }
        }
        Command::Check { paths } => {
            let mut changed = 0;
            for path in &paths {
                let file = read(path)?;
                let tree = decorate(&registry, &file)?;
                let text = Restorer::new(&registry).print(&tree)?;
                if text != file.text() {
                    tracing::info!(%path, "round trip changes the file");
                    println!("{path}");
                    changed += 1;
                }
            }
            if changed > 0 {
                bail!("{changed} of {} files changed", paths.len());
            }
        }
        Command::Dump { path } => {
            let file = read(&path)?;
            print!("{}", decorate(&registry, &file)?);
        }
    }
    Ok(())
}

fn read(path: &Utf8Path) -> anyhow::Result<File> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(path, text))
}

fn decorate(registry: &Registry, file: &File) -> anyhow::Result<DecoratedTree> {
    let tree = match garnish_parse::parse(file.text()).into_result() {
        Ok(tree) => tree,
        Err(diagnostics) => {
            let renderer = Renderer::styled();
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, file.path().as_str(), file.text()));
            }
            bail!("`{}` has {} syntax errors", file.path(), diagnostics.len());
        }
    };

    Decorator::new(registry, file)
        .decorate(&tree)
        .with_context(|| format!("failed to decorate `{}`", file.path()))
}
