mod cli;
mod commands;
mod error;
mod util;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);
    tracing::debug!(?opts, "parsed options");

    match opts.cmd {
        Commands::Pack(args) => commands::pack(args)?,
        Commands::Extract(args) => commands::extract(args)?,
        Commands::List(args) => commands::list(args)?,
        Commands::Info(args) => commands::info(args)?,
    };

    Ok(())
}
