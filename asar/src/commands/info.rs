use asar_format::AsarReader;

use crate::cli::InfoArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

pub fn run(args: InfoArgs) -> Result<()> {
    let reader = AsarReader::open(&args.archive).map_err(|source| Error::OpenArchive {
        path: args.archive.clone(),
        source,
    })?;

    let header = reader.header();
    let unpacked = reader.entries().filter(|(_, r)| r.unpacked).count();
    let packed_bytes: u64 = reader
        .entries()
        .filter(|(_, r)| !r.unpacked)
        .map(|(_, r)| r.size)
        .sum();

    println!("Archive:        {}", args.archive.display());
    println!("Magic:          {}", header.magic);
    println!("Total size:     {}", header.total_size);
    println!("Header size:    {}", header.header_size);
    println!("Document size:  {}", header.document_size);
    println!("Content start:  {}", reader.content_start());
    println!(
        "Content:        {} ({} bytes)",
        format_size(reader.content_len() as u64),
        reader.content_len()
    );
    println!("Entries:        {}", reader.metadata().len());
    println!(
        "  packed:       {} ({})",
        reader.metadata().len() - unpacked,
        format_size(packed_bytes)
    );
    println!("  unpacked:     {}", unpacked);

    Ok(())
}
