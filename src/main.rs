//! cnvmerge: merge copy-number intervals and average their signal columns.
//!
//! Usage: cnvmerge <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;
use std::process;

use cnv_merge::commands::{BreakpointMergeCommand, RunMergeCommand};
use cnv_merge::config::{default_signal_columns, OutputOptions, NAN_TOKEN};
use cnv_merge::output::AtomicOutput;
use cnv_merge::table::TableError;

#[derive(Parser)]
#[command(name = "cnvmerge")]
#[command(version)]
#[command(about = "Merge consecutive copy-number intervals and average their signal columns", long_about = None)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Print merge statistics to stderr
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the rows between consecutive breakpoint indices
    Breakpoints {
        /// Headerless TSV input: chr, start, z_score, CN, ...
        #[arg(short = 't', long = "temp_file", alias = "temp-file")]
        temp_file: PathBuf,

        /// File holding a comma-separated list of breakpoint row indices
        #[arg(short = 'i', long = "indices_file", alias = "indices-file")]
        indices_file: PathBuf,

        /// Output TSV path
        #[arg(short = 'o', long = "output_file", alias = "output-file")]
        output_file: PathBuf,

        /// Write a header line (chr, start, end, z_score, CN)
        #[arg(long)]
        header: bool,

        /// Token written for an average with no values
        #[arg(long = "na-rep", default_value = NAN_TOKEN)]
        na_rep: String,
    },

    /// Merge runs of consecutive positions within each chromosome
    Runs {
        /// Headered TSV input with Chr, Position and signal columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output TSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Signal columns to average (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Do not write the header line
        #[arg(long)]
        no_header: bool,

        /// Token written for an average with no values
        #[arg(long = "na-rep", default_value = "")]
        na_rep: String,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Breakpoints {
            temp_file,
            indices_file,
            output_file,
            header,
            na_rep,
        } => run_breakpoints(temp_file, indices_file, output_file, header, na_rep, cli.stats),

        Commands::Runs {
            input,
            output,
            columns,
            no_header,
            na_rep,
        } => run_runs(input, output, columns, no_header, na_rep, cli.stats),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_breakpoints(
    temp_file: PathBuf,
    indices_file: PathBuf,
    output_file: PathBuf,
    header: bool,
    na_rep: String,
    stats: bool,
) -> Result<(), TableError> {
    let cmd = BreakpointMergeCommand::new().with_output(
        OutputOptions::headerless_nan()
            .with_header(header)
            .with_na_rep(na_rep),
    );

    let mut out = AtomicOutput::create(&output_file)?;
    let result = cmd.run(&temp_file, &indices_file, out.file_mut())?;
    out.commit()?;
    log::info!("Processed file saved at: {}", output_file.display());

    if stats {
        eprintln!("Breakpoint merge stats: {}", result);
    }

    Ok(())
}

fn run_runs(
    input: PathBuf,
    output: PathBuf,
    columns: Option<Vec<String>>,
    no_header: bool,
    na_rep: String,
    stats: bool,
) -> Result<(), TableError> {
    let columns = columns.unwrap_or_else(default_signal_columns);
    if columns.is_empty() {
        return Err(TableError::InvalidFormat(
            "At least one signal column is required".to_string(),
        ));
    }

    let cmd = RunMergeCommand::new()
        .with_signal_columns(columns)
        .with_output(
            OutputOptions::default()
                .with_header(!no_header)
                .with_na_rep(na_rep),
        );

    let mut out = AtomicOutput::create(&output)?;
    let result = cmd.run(&input, out.file_mut())?;
    out.commit()?;
    log::info!("Processed file saved at: {}", output.display());

    if stats {
        eprintln!("Run merge stats: {}", result);
    }

    Ok(())
}
