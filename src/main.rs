use autoindex::config::{self, Overrides, StyleMode};
use autoindex::walk::WriteMode;
use autoindex::{logging, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Resource overrides shared by `build` and `check`.
#[derive(clap::Args, Clone)]
struct ResourceArgs {
    /// Directory to index
    dirpath: PathBuf,

    /// Page template (placeholders: root, items, icons, style)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Stylesheet template (placeholder: icons)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Directory of <tag>.svg / <tag>.png icons
    #[arg(long)]
    icons_dir: Option<PathBuf>,

    /// JSON map of category -> [extensions]
    #[arg(long)]
    ext_map: Option<PathBuf>,

    /// Embed the stylesheet in every page instead of writing index-style.css
    #[arg(long)]
    internal_style: bool,
}

impl ResourceArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            template: self.template.clone(),
            style: self.style.clone(),
            icons_dir: self.icons_dir.clone(),
            ext_map: self.ext_map.clone(),
            style_mode: self.internal_style.then_some(StyleMode::Inline),
        }
    }
}

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if env!("ON_RELEASE_TAG") == "true" {
        env!("CARGO_PKG_VERSION")
    } else if hash.is_empty() {
        "dev@unknown"
    } else {
        // Leaked once at startup
        Box::leak(format!("dev@{hash}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "autoindex")]
#[command(about = "Write a static index.html listing into every directory of a tree")]
#[command(long_about = "\
Write a static index.html listing into every directory of a tree

Every directory gets an index.html listing its world-readable entries,
directories first. In the default linked style mode, one index-style.css
at the tree root holds the styles and icons for the whole tree.

  site/
  ├── index.html          # lists a.txt, docs/
  ├── index-style.css     # shared stylesheet (linked mode)
  ├── a.txt
  ├── secret/             # not world-readable: hidden from site/index.html,
  │   ├── index.html      #   but still indexed itself
  │   └── b.txt
  └── docs/
      ├── .noindex        # no docs/index.html ...
      └── api/
          └── index.html  # ... but subdirectories are still indexed

Ignored everywhere: .git, .gitignore, __pycache__, Thumbs.db, Desktop.ini,
.DS_Store, *.pyc, *.swp, *.swo, and the generated files themselves.

Run 'autoindex gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// TOML config file (overridden by command-line flags)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write index pages (and the shared stylesheet) for a tree
    Build(ResourceArgs),
    /// Render everything without writing; report what would be written
    Check(ResourceArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Command::Build(args) => run(cli.config, &args, WriteMode::Write),
        Command::Check(args) => run(cli.config, &args, WriteMode::DryRun),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(
    config_path: Option<PathBuf>,
    args: &ResourceArgs,
    write_mode: WriteMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(config_path.as_deref())?.with_overrides(args.overrides());
    let summary = autoindex::generate(&args.dirpath, &config, write_mode)?;
    output::print_summary(&summary, &args.dirpath);
    Ok(())
}
