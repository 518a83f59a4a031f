use asar_format::AsarReader;

use crate::cli::ListArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

pub fn run(args: ListArgs) -> Result<()> {
    let reader = AsarReader::open(&args.archive).map_err(|source| Error::OpenArchive {
        path: args.archive.clone(),
        source,
    })?;

    if args.json {
        let document: serde_json::Value = serde_json::from_slice(reader.header_document())
            .map_err(|source| Error::Json { source })?;
        let pretty =
            serde_json::to_string_pretty(&document).map_err(|source| Error::Json { source })?;
        println!("{}", pretty);
        return Ok(());
    }

    println!("{:>12}  {:>11}  {:>8}  Path", "Offset", "Size", "Flags");
    println!("{:-<12}  {:-<11}  {:-<8}  {:-<8}", "", "", "", "");

    for (path, record) in reader.entries() {
        if record.unpacked {
            println!(
                "{:>12}  {:>11}  {:>8}  {}",
                "-",
                format_size(record.size),
                "unpacked",
                path
            );
        } else {
            println!(
                "{:>12}  {:>11}  {:>8}  {}",
                record.offset,
                format_size(record.size),
                "",
                path
            );
        }
    }

    Ok(())
}
