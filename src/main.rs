use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::error;

use fqshuffle::{parse_size, ShuffleConfig, Shuffler, TempFileCount};

mod cli;
use cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here as non-error output
            let failed = err.use_stderr();
            let _ = err.print();
            process::exit(if failed { 1 } else { 0 });
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.reads.is_empty() || cli.mates.is_empty() {
        error!("required parameter are --reads and --mates");
        eprintln!("{}", Cli::command().render_usage());
        process::exit(1);
    }
    if cli.reads.len() != cli.mates.len() {
        error!("Number of first and second read files are different");
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ShuffleConfig {
        reads: cli.reads,
        mates: cli.mates,
        block_size: parse_size(&cli.shuffle_block_size)?,
        temp_files: TempFileCount::parse(&cli.num_temp_files),
        temp_dir: cli.temp_directory,
        outdir: cli.outdir,
        seed: cli.seed.unwrap_or_default(),
    };
    Shuffler::new(config).run()?;
    Ok(())
}
