use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbdir::listing::{Directory, ListRequest, ThumbnailResponse};
use thumbdir::sort::SortKey;
use thumbdir::{config, output};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that can emit JSON.
#[derive(clap::Args, Clone)]
struct FormatArgs {
    /// Print JSON instead of the human-readable view
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "thumbdir")]
#[command(about = "Directory listings with cached image thumbnails")]
#[command(long_about = "\
Directory listings with cached image thumbnails

Lists the files in a directory, reports image dimensions, and keeps a
generated thumbnail for every image in a cache subdirectory.

Directory layout:

  photos/
  ├── thumbdir.toml        # Optional config (never listed)
  ├── beach.jpg            # Listed, thumbnail generated on demand
  ├── tn_logo.jpg          # Hand-made thumbnail for logo.png (never listed)
  ├── logo.png
  ├── notes.txt            # Listed, no thumbnail
  ├── .hidden              # Never listed
  └── thumbs/              # Generated cache
      └── tn_beach.jpg

Thumbnails are made with an external converter (ImageMagick's `convert`
by default) and fall back to a built-in resampler for GIF, JPEG and PNG.

Set RUST_LOG=debug to trace cache hits and generation.
Run 'thumbdir gen-config' to generate a documented thumbdir.toml.")]
#[command(version)]
struct Cli {
    /// Directory to serve
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List eligible files in columns, with extension counts
    List {
        /// Only list files with this extension
        #[arg(long)]
        ext: Option<String>,
        /// Re-sort: na, nd, da, dd, ea, ed (name/date/extension, asc/desc)
        #[arg(long)]
        sort: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Show one image with its neighbors
    Show {
        name: String,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Resolve (and if needed generate) the thumbnail for a file
    Thumb {
        name: String,
        /// Copy the thumbnail (or placeholder) to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a stock thumbdir.toml with all options documented
    GenConfig,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::List { ext, sort, format } => {
            let dir = Directory::open_with_config_file(&cli.dir)?;
            let sort = sort.as_deref().and_then(|code| {
                let key = SortKey::from_code(code);
                if key.is_none() {
                    tracing::warn!(code, "unknown sort code, keeping default order");
                }
                key
            });
            let listing = dir.list(&ListRequest {
                extension: ext,
                sort,
            });
            if format.json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                output::print_listing(&listing, &dir.config().listing.date_format);
            }
        }
        Command::Show { name, format } => {
            let dir = Directory::open_with_config_file(&cli.dir)?;
            let record = dir.detail(&name)?;
            if format.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                output::print_detail(&record, &dir.config().listing.date_format);
            }
        }
        Command::Thumb { name, out } => {
            let dir = Directory::open_with_config_file(&cli.dir)?;
            let response = dir.thumbnail(&name)?;
            if let Some(out) = out {
                match &response {
                    ThumbnailResponse::File { path, .. } => {
                        std::fs::copy(path, &out)?;
                    }
                    ThumbnailResponse::Placeholder(bytes) => std::fs::write(&out, bytes)?,
                }
            }
            output::print_thumbnail(&name, &response);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
