use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockfs_core_store::ResolverConfig;
use stockfs_repl::{Backend, ContextConfig, EditMode};

/// stockfs - Interactive inventory shell
#[derive(Parser, Debug)]
#[command(name = "stockfs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding products.json (default: the platform data directory)
    #[arg(long, value_name = "DIR", conflicts_with = "memory")]
    data_dir: Option<PathBuf>,

    /// Keep products in memory only
    #[arg(long)]
    memory: bool,

    /// Image reference written for products saved without one
    #[arg(long, value_name = "REF")]
    default_image: Option<String>,

    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn context_config(&self) -> ContextConfig {
        let backend = if self.memory {
            Backend::Memory
        } else {
            match self.data_dir.clone().or_else(default_data_dir) {
                Some(path) => Backend::Local { path },
                None => {
                    tracing::warn!("no data directory available; products will not be saved");
                    Backend::Memory
                }
            }
        };

        let mut resolver = ResolverConfig::default();
        if let Some(image) = &self.default_image {
            resolver.default_image_ref = image.clone();
        }

        ContextConfig { backend, resolver }
    }

    fn edit_mode(&self) -> EditMode {
        if self.vi {
            EditMode::Vi
        } else if self.emacs {
            EditMode::Emacs
        } else {
            EditMode::detect()
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("stockfs"))
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = stockfs_repl::run(args.context_config(), args.edit_mode()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
