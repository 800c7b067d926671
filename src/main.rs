use std::path::PathBuf;
use clap::Parser;

mod archive;
mod commands;
mod computers;
mod errors;
mod utils;

/// Upgrades a SharpHound export so that the legacy local group keys and the
/// `highvalue` flag of every computer are filled in.
#[derive(clap::Parser)]
#[clap(version)]
struct Cli {
    /// Path to input SharpHound zip file
    #[clap(short, long)]
    input: PathBuf,

    /// Path to output SharpHound zip file (defaults to <input>_Compatible.zip)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Log per-computer details
    #[clap(short, long)]
    verbose: bool,

    /// Also write a detailed log file into this directory
    #[clap(long)]
    log_directory: Option<PathBuf>,
}


fn setup_logging(verbose: bool, log_directory: Option<&PathBuf>) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let spec = if verbose { "warn,bh_compat=debug" } else { "warn,bh_compat=info" };
    let spec = flexi_logger::LogSpecification::parse(spec)?;
    let logger = flexi_logger::Logger::with(spec)
        .format_for_stderr(flexi_logger::colored_default_format)
        .set_palette("b1;3;2;4;6".to_string());
    let logger = match log_directory {
        Some(directory) => logger
            .log_to_file(
                flexi_logger::FileSpec::default()
                    .directory(directory)
                    .basename("bh-compat")
                    .use_timestamp(false),
            )
            .duplicate_to_stderr(flexi_logger::Duplicate::All)
            .format_for_files(flexi_logger::detailed_format),
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(cli.verbose, cli.log_directory.as_ref())?;

    commands::fix_archive::fix_archive(cli.input, cli.output)?;
    Ok(())
}
