//! End-to-end tests: pack directories, then extract them again.

use std::fs;
use std::path::{Path, PathBuf};

use asar_format::{AsarPath, AsarReader, Error, FileRecord, FormatError};
use tempfile::TempDir;

/// Helper to create `<tmp>/app` holding `a.txt` and `sub/b.txt`
fn create_app_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app");
    fs::create_dir_all(app.join("sub")).unwrap();
    fs::write(app.join("a.txt"), b"hello").unwrap();
    fs::write(app.join("sub").join("b.txt"), b"bye").unwrap();
    (temp_dir, app)
}

/// Frames an arbitrary header document the way the packer does
fn raw_archive(document: &str, content: &[u8]) -> Vec<u8> {
    let doc = document.as_bytes();
    let header_size = (doc.len() + 3) & !3;

    let mut out = vec![];
    for field in [4u32, header_size as u32 + 4, header_size as u32, doc.len() as u32] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(doc);
    out.resize(16 + header_size, 0);
    out.extend_from_slice(content);
    out
}

fn path(s: &str) -> AsarPath {
    AsarPath::new(s).unwrap()
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_concrete_scenario() {
    let (temp_dir, app) = create_app_dir();

    let bytes = asar_format::pack(&app).unwrap();
    let reader = AsarReader::from_bytes(bytes.clone()).unwrap();

    let entries: Vec<_> = reader
        .entries()
        .map(|(p, r)| (p.as_str().to_string(), *r))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("app/a.txt".to_string(), FileRecord::new(0, 5)),
            ("app/sub/b.txt".to_string(), FileRecord::new(5, 3)),
        ]
    );

    let document = r#"{"files":{"app":{"files":{"a.txt":{"offset":"0","size":5},"sub":{"files":{"b.txt":{"offset":"5","size":3}}}}}}}"#;
    assert_eq!(reader.header().document_size as usize, document.len());
    assert_eq!(reader.header_document(), document.as_bytes());
    assert_eq!(&bytes[reader.content_start()..], b"hellobye");

    let out = temp_dir.path().join("out");
    let stats = asar_format::unpack(bytes, &out, None).unwrap();
    assert_eq!(stats.files_extracted, 2);
    assert_eq!(stats.bytes_written, 8);
    assert_eq!(fs::read(out.join("app").join("a.txt")).unwrap(), b"hello");
    assert_eq!(
        fs::read(out.join("app").join("sub").join("b.txt")).unwrap(),
        b"bye"
    );
}

#[test]
fn test_round_trip_identity() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("bundle");
    let files: Vec<(PathBuf, Vec<u8>)> = vec![
        (PathBuf::from("index.js"), b"console.log(1)\n".to_vec()),
        (PathBuf::from(".hidden"), b"dot".to_vec()),
        (PathBuf::from("empty.txt"), vec![]),
        (
            PathBuf::from("deep").join("er").join("blob.bin"),
            (0..=255u8).cycle().take(4099).collect(),
        ),
        (PathBuf::from("deep").join("x.json"), b"{}".to_vec()),
    ];
    for (rel, data) in files.iter() {
        let full = src.join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, data).unwrap();
    }
    fs::create_dir_all(src.join("nothing-here")).unwrap();

    #[cfg(unix)]
    std::os::unix::fs::symlink(src.join("index.js"), src.join("link.js")).unwrap();

    let archive = temp_dir.path().join("bundle.asar");
    asar_format::pack_to_file(&src, &archive).unwrap();

    let out = temp_dir.path().join("out");
    let stats = asar_format::unpack_file(&archive, &out, None).unwrap();
    assert_eq!(stats.files_extracted, files.len() as u64);

    for (rel, data) in files.iter() {
        let extracted = out.join("bundle").join(rel);
        assert_eq!(&fs::read(&extracted).unwrap(), data, "{}", rel.display());
    }

    assert!(!out.join("bundle").join("link.js").exists());
    assert!(!out.join("bundle").join("nothing-here").exists());
}

#[test]
fn test_single_file_extraction() {
    let (temp_dir, app) = create_app_dir();
    let bytes = asar_format::pack(&app).unwrap();

    let out = temp_dir.path().join("single");
    let stats = asar_format::unpack(bytes, &out, Some("app/sub/b.txt")).unwrap();

    assert_eq!(stats.files_extracted, 1);
    assert_eq!(list_dir(&out), vec!["b.txt".to_string()]);
    assert_eq!(fs::read(out.join("b.txt")).unwrap(), b"bye");
    assert!(!out.join("sub").exists());
}

#[test]
fn test_single_file_missing() {
    let (temp_dir, app) = create_app_dir();
    let bytes = asar_format::pack(&app).unwrap();

    let out = temp_dir.path().join("x");
    let stats = asar_format::unpack(bytes, &out, Some("app/c.txt")).unwrap();
    assert_eq!(stats.files_extracted, 0);
    assert_eq!(stats.bytes_written, 0);
    assert!(!out.exists());
}

#[test]
fn test_unpacked_entry_extracted_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = raw_archive(
        r#"{"files":{"app":{"files":{"ext.bin":{"size":8,"unpacked":true}}}}}"#,
        b"",
    );
    let archive = temp_dir.path().join("app.asar");
    fs::write(&archive, &bytes).unwrap();

    let sibling = temp_dir.path().join("app").join("ext.bin");
    fs::create_dir_all(sibling.parent().unwrap()).unwrap();
    fs::write(&sibling, b"external").unwrap();

    // extracting next to the archive targets the unpacked file itself
    let stats = asar_format::unpack_file(&archive, temp_dir.path(), None).unwrap();
    assert_eq!(stats.files_extracted, 1);
    assert_eq!(fs::read(&sibling).unwrap(), b"external");

    let stats =
        asar_format::unpack_file(&archive, temp_dir.path().join("app"), Some("app/ext.bin"))
            .unwrap();
    assert_eq!(stats.files_extracted, 1);
    assert_eq!(fs::read(&sibling).unwrap(), b"external");
}

#[test]
fn test_unpacked_entry_reads_sibling() {
    let temp_dir = TempDir::new().unwrap();

    // offset 0 / size 5 would be in range, but the entry is marked unpacked
    let bytes = raw_archive(
        r#"{"files":{"app":{"files":{"ext.bin":{"offset":"0","size":5,"unpacked":true},"a.txt":{"offset":"0","size":5}}}}}"#,
        b"hello",
    );
    let archive = temp_dir.path().join("app.asar");
    fs::write(&archive, &bytes).unwrap();

    fs::create_dir_all(temp_dir.path().join("app")).unwrap();
    fs::write(temp_dir.path().join("app").join("ext.bin"), b"external").unwrap();

    let out = temp_dir.path().join("out");
    asar_format::unpack_file(&archive, &out, None).unwrap();

    assert_eq!(
        fs::read(out.join("app").join("ext.bin")).unwrap(),
        b"external"
    );
    assert_eq!(fs::read(out.join("app").join("a.txt")).unwrap(), b"hello");

    let single = temp_dir.path().join("single");
    asar_format::unpack_file(&archive, &single, Some("app/ext.bin")).unwrap();
    assert_eq!(fs::read(single.join("ext.bin")).unwrap(), b"external");
}

#[test]
fn test_unpacked_entry_missing_sibling() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = raw_archive(
        r#"{"files":{"app":{"files":{"gone.bin":{"size":3,"unpacked":true}}}}}"#,
        b"",
    );
    let archive = temp_dir.path().join("app.asar");
    fs::write(&archive, &bytes).unwrap();

    let err = asar_format::unpack_file(&archive, temp_dir.path().join("out"), None).unwrap_err();
    match err {
        Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unpacked_dir_override() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = raw_archive(
        r#"{"files":{"app":{"files":{"ext.bin":{"size":3,"unpacked":true}}}}}"#,
        b"",
    );

    let side = temp_dir.path().join("side");
    fs::create_dir_all(side.join("app")).unwrap();
    fs::write(side.join("app").join("ext.bin"), b"abc").unwrap();

    let reader = AsarReader::from_bytes(bytes).unwrap().with_unpacked_dir(&side);
    assert_eq!(&*reader.read_file(&path("app/ext.bin")).unwrap(), b"abc");
}

#[test]
fn test_truncated_frames_write_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let err = asar_format::unpack(&[4u8, 0, 0, 0, 12, 0][..], &out, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Format(FormatError::Truncated { needed: 16, actual: 6 })
    ));
    assert!(!out.exists());

    let mut bytes = raw_archive(r#"{"files":{"a":{"offset":"0","size":1}}}"#, b"x");
    bytes.truncate(24);
    let err = asar_format::unpack(bytes, &out, None).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::Truncated { .. })));
    assert!(!out.exists());
}

#[test]
fn test_invalid_header_json() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let err = asar_format::unpack(raw_archive("{\"files\":", b""), &out, None).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::Json(_))));

    let err = asar_format::unpack(
        raw_archive(r#"{"files":{"a":{"offset":"zero","size":1}}}"#, b"x"),
        &out,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::InvalidOffset { .. })));
    assert!(!out.exists());
}

#[test]
fn test_content_out_of_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let bytes = raw_archive(r#"{"files":{"a":{"offset":"2","size":10}}}"#, b"0123");
    let err = asar_format::unpack(bytes, &out, None).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::OutOfBounds { .. })));
    assert!(!out.join("a").exists());
}

#[test]
fn test_path_traversal_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let bytes = raw_archive(
        r#"{"files":{"..":{"files":{"evil.txt":{"offset":"0","size":4}}}}}"#,
        b"evil",
    );
    let err = asar_format::unpack(bytes, &out, None).unwrap_err();
    assert!(matches!(err, Error::PathSafety { .. }));
    assert!(!temp_dir.path().join("evil.txt").exists());

    let bytes = raw_archive(
        r#"{"files":{"app":{"files":{"..":{"files":{"..":{"files":{"evil.txt":{"offset":"0","size":4}}}}}}}}}"#,
        b"evil",
    );
    let err = asar_format::unpack(bytes, &out, None).unwrap_err();
    assert!(matches!(err, Error::PathSafety { .. }));
    assert!(!temp_dir.path().join("evil.txt").exists());
}

#[test]
fn test_layout_invariants() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("many");
    for i in 0..23usize {
        let dir = src.join(format!("d{}", i % 4));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("f{}.dat", i)), vec![i as u8; i * 7 + 1]).unwrap();
    }

    let bytes = asar_format::pack(&src).unwrap();
    let reader = AsarReader::from_bytes(bytes).unwrap();
    let header = reader.header();

    assert_eq!(header.header_size % 4, 0);
    assert!(header.header_size >= header.document_size);
    assert_eq!(header.total_size, header.header_size + 4);
    assert_eq!(reader.content_start() % 4, 0);
    assert_eq!(reader.content_start(), 16 + header.header_size as usize);

    let mut records: Vec<FileRecord> = reader.entries().map(|(_, r)| *r).collect();
    records.sort_by_key(|r| r.offset);
    assert_eq!(records.len(), 23);

    let mut expected_offset = 0;
    for record in records.iter() {
        assert!(!record.unpacked);
        assert_eq!(record.offset, expected_offset);
        expected_offset = record.end().unwrap();
    }
    assert_eq!(expected_offset, reader.content_len() as u64);
}

#[test]
fn test_pack_keeps_name_of_dotted_source() {
    let (_temp_dir, app) = create_app_dir();
    let bytes = asar_format::pack(app.join("sub").join("..")).unwrap();

    let reader = AsarReader::from_bytes(bytes).unwrap();
    let paths: Vec<_> = reader.entries().map(|(p, _)| p.as_str().to_string()).collect();
    assert_eq!(paths, vec!["app/a.txt", "app/sub/b.txt"]);
}

#[test]
fn test_header_names_with_separators_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = raw_archive(
        r#"{"files":{"a":{"files":{"b":{"offset":"0","size":1}}},"a/b":{"offset":"1","size":1}}}"#,
        b"xy",
    );

    let out = temp_dir.path().join("out");
    let err = asar_format::unpack(bytes, &out, None).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::Shape { .. })));
    assert!(!out.exists());
}

#[test]
fn test_pack_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    let err = asar_format::pack(temp_dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
