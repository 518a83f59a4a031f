use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "asar",
    about = "Create, list and extract asar archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(
        name = "p",
        visible_alias = "pack",
        about = "Pack a directory into a new archive"
    )]
    Pack(PackArgs),

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract files from an archive"
    )]
    Extract(ExtractArgs),

    #[structopt(name = "l", visible_alias = "list", about = "List files of an archive")]
    List(ListArgs),

    #[structopt(name = "i", visible_alias = "info", about = "Show archive frame and totals")]
    Info(InfoArgs),
}

#[derive(Debug, StructOpt)]
pub struct PackArgs {
    #[structopt(
        name = "source",
        parse(from_os_str),
        help = "Directory to pack; its name becomes the top-level entry"
    )]
    pub source: PathBuf,

    #[structopt(name = "archive", parse(from_os_str), help = "Path of the archive to write")]
    pub archive: PathBuf,

    #[structopt(short, long, help = "Overwrite an existing archive")]
    pub force: bool,

    #[structopt(short, long, help = "Suppress output")]
    pub quiet: bool,
}

#[derive(Debug, StructOpt)]
pub struct ExtractArgs {
    #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,

    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "Output directory [default: current directory]"
    )]
    pub output: Option<PathBuf>,

    #[structopt(
        long,
        help = "Extract only this entry (e.g. app/dist/bundle.js), directly into the output directory"
    )]
    pub file: Option<String>,

    #[structopt(
        long,
        parse(from_os_str),
        help = "Directory holding unpacked entries [default: the archive's directory]"
    )]
    pub unpacked_dir: Option<PathBuf>,

    #[structopt(short, long, help = "Suppress output")]
    pub quiet: bool,
}

#[derive(Debug, StructOpt)]
pub struct ListArgs {
    #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,

    #[structopt(short, long, help = "Print the raw JSON header instead of a table")]
    pub json: bool,
}

#[derive(Debug, StructOpt)]
pub struct InfoArgs {
    #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,
}
