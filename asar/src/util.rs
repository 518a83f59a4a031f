/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    use humansize::{file_size_opts as options, FileSize};

    bytes
        .file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", bytes))
}
