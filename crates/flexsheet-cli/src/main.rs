mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "flexsheet",
    version,
    about = "Read, summarise and sign flexforce timesheet PDFs"
)]
struct Cli {
    /// Log extraction details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the consultant, period, project and timesheet rows from a PDF
    Parse {
        /// Path to the timesheet PDF
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the parsed document to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Text extraction backend: pdftotext (default) or lopdf
        #[arg(long, default_value = "pdftotext")]
        backend: String,

        /// Company line for the document (default: from config or built-in)
        #[arg(long)]
        company: Option<String>,
    },
    /// Show hours per activity and project code
    Summary {
        /// Path to the timesheet PDF
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Text extraction backend: pdftotext (default) or lopdf
        #[arg(long, default_value = "pdftotext")]
        backend: String,
    },
    /// Stamp the customer signature and write the signed PDF and Excel export
    Sign {
        /// Path to the timesheet PDF
        input_file: PathBuf,

        /// Signature image (PNG or JPEG); overrides the config file
        #[arg(short, long, value_name = "IMAGE")]
        signature: Option<PathBuf>,

        /// Manager name printed next to the date
        #[arg(short, long)]
        manager: Option<String>,

        /// Folder for the signed PDF and the Excel file
        #[arg(long, value_name = "DIR")]
        output_folder: Option<PathBuf>,

        /// JSON settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Text extraction backend: pdftotext (default) or lopdf
        #[arg(long, default_value = "pdftotext")]
        backend: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
            backend,
            company,
        } => commands::parse::run(input_file, &output, out, &backend, company),
        Commands::Summary {
            input_file,
            output,
            backend,
        } => commands::summary::run(input_file, &output, &backend),
        Commands::Sign {
            input_file,
            signature,
            manager,
            output_folder,
            config,
            backend,
        } => commands::sign::run(commands::sign::SignArgs {
            input_file,
            signature,
            manager,
            output_folder,
            config,
            backend,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
