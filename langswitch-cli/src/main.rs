use std::path::PathBuf;

use clap::{Parser, Subcommand};
use langswitch::LocalizationManager;
use langswitch_cli::{OptionOverrides, Selection, apply_selection, load_options, view};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing language files (defaults to `Lang` next to the executable)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Language file extension
    #[arg(short, long, global = true)]
    extension: Option<String>,

    /// TOML file with manager options
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log language loading details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Language selection shared by commands that read strings.
#[derive(clap::Args, Debug)]
struct SelectArgs {
    /// Use a discovered language by file name (without extension)
    #[arg(short, long, conflicts_with = "file")]
    language: Option<String>,

    /// Load an arbitrary language file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl SelectArgs {
    fn selection(&self) -> Selection {
        match (&self.file, &self.language) {
            (Some(file), _) => Selection::File(file.clone()),
            (None, Some(language)) => Selection::Language(language.clone()),
            (None, None) => Selection::Locale,
        }
    }
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the languages found in the language directory.
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve one or more keys in the selected language.
    Get {
        /// Keys to resolve
        #[arg(required = true)]
        keys: Vec<String>,

        #[command(flatten)]
        select: SelectArgs,

        /// Render missing keys as diagnostic placeholders
        #[arg(long)]
        diagnostic: bool,
    },

    /// Print every entry of the selected language.
    Show {
        #[command(flatten)]
        select: SelectArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the built-in strings as a template for translators.
    ExportBuiltin,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "langswitch=debug"
    } else {
        "langswitch=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let diagnostic_mode = match &args.commands {
        Commands::Get { diagnostic, .. } if *diagnostic => Some(true),
        _ => None,
    };
    let options = load_options(
        args.config.as_deref(),
        OptionOverrides {
            language_dir: args.dir,
            extension: args.extension,
            diagnostic_mode,
        },
    )?;
    let manager = LocalizationManager::new(options);

    match args.commands {
        Commands::List { json } => {
            manager.discover_languages();
            manager.match_current_locale();
            view::print_languages(&manager, json)
        }
        Commands::Get { keys, select, .. } => {
            apply_selection(&manager, &select.selection())?;
            view::print_values(&manager, &keys);
            Ok(())
        }
        Commands::Show { select, json } => {
            apply_selection(&manager, &select.selection())?;
            view::print_table(&manager, json)
        }
        Commands::ExportBuiltin => {
            let path = manager
                .save_builtin_localization()
                .map_err(|e| e.to_string())?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
