use archive_core::archive::enrich::ParseOptions;
use archive_core::archive::rename::{FileMover, LocalFileMover};
use archive_core::domain::{Document, DocumentError, DownloadStatus, TaggingStatus};
use archive_core::parser::NameParser;
use archive_core::{Archive, ArchiveConfig, ArchiveError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Helper: generate a unique inbox folder so runs don't collide
fn test_inbox(root: &Path, name: &str) -> io::Result<PathBuf> {
    let dir = root.join(format!("inbox_{}_{}", name, Uuid::new_v4()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn write_scan(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, b"%PDF-1.4")?;
    Ok(path)
}

fn add_untagged(archive: &Archive, path: &Path) -> Document {
    archive.add(
        path,
        Some(8),
        DownloadStatus::Local,
        TaggingStatus::Untagged,
        ParseOptions::empty(),
    )
}

struct FailingMover;

impl FileMover for FailingMover {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn move_file(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
    }
}

/// Pretends every move succeeds without touching the filesystem
struct InMemoryMover;

impl FileMover for InMemoryMover {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn move_file(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn add_stored(archive: &Archive, path: &str, status: TaggingStatus) -> Document {
    archive.add(path, None, DownloadStatus::Local, status, ParseOptions::empty())
}

#[test]
fn stored_target_in_same_partition_is_rejected() {
    let archive = Archive::new(&ArchiveConfig::default());
    add_stored(
        &archive,
        "/srv/archive/2018/2018-05-12--table__bill.pdf",
        TaggingStatus::Untagged,
    );
    let document = add_stored(
        &archive,
        "/inbox/2018-05-12--table__bill.pdf",
        TaggingStatus::Untagged,
    );

    let result = archive.rename(&document, Path::new("/srv/archive"), &InMemoryMover);
    match result {
        Err(ArchiveError::RenameTargetExists(path)) => {
            assert_eq!(path, Path::new("/srv/archive/2018/2018-05-12--table__bill.pdf"));
        }
        other => panic!("expected RenameTargetExists, got {other:?}"),
    }

    assert_eq!(archive.len(TaggingStatus::Untagged), 2);
    assert_eq!(archive.len(TaggingStatus::Tagged), 0);
    assert_eq!(archive.tags().count("bill"), 2);
    assert!(archive.document(document.path()).is_some());
}

#[test]
fn stored_target_in_other_partition_is_rejected() {
    let archive = Archive::new(&ArchiveConfig::default());
    let archived = add_stored(
        &archive,
        "/srv/archive/2018/2018-05-12--table__bill.pdf",
        TaggingStatus::Tagged,
    );
    let document = add_stored(
        &archive,
        "/inbox/2018-05-12--table__bill.pdf",
        TaggingStatus::Untagged,
    );

    let result = archive.rename(&document, Path::new("/srv/archive"), &InMemoryMover);
    match result {
        Err(ArchiveError::RenameTargetExists(path)) => assert_eq!(path, archived.path()),
        other => panic!("expected RenameTargetExists, got {other:?}"),
    }

    assert_eq!(archive.len(TaggingStatus::Untagged), 1);
    assert_eq!(archive.len(TaggingStatus::Tagged), 1);
    assert_eq!(archive.tags().count("bill"), 2);
    assert_eq!(
        archive.document(archived.path()).map(|stored| stored.tagging_status),
        Some(TaggingStatus::Tagged)
    );
}

#[test]
fn configured_root_receives_renamed_documents() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let root = TempDir::new()?;
    let config = ArchiveConfig {
        archive_root: root.path().to_path_buf(),
        ..ArchiveConfig::default()
    };
    let archive = Archive::new(&config);
    assert_eq!(archive.archive_root(), root.path());

    let scan = write_scan(&test_inbox(inbox.path(), "root")?, "2020-02-29--leap__bill.pdf")?;
    let document = add_untagged(&archive, &scan);

    let renamed = archive.rename_into_root(&document, &LocalFileMover)?;

    let expected = root.path().join("2020").join("2020-02-29--leap__bill.pdf");
    assert_eq!(renamed.path(), expected);
    assert!(expected.exists());
    Ok(())
}

#[test]
fn renaming_moves_file_into_year_folder() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let root = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());

    let scan = write_scan(&test_inbox(inbox.path(), "move")?, "2018-05-12 scan.pdf")?;
    let document = add_untagged(&archive, &scan);
    let mut document = archive.set_tags(["ikea", "bill"], &document)?;
    document.set_specification("Kitchen Table");
    let document = archive.update(document);

    let renamed = archive.rename(&document, root.path(), &LocalFileMover)?;

    let expected = root
        .path()
        .join("2018")
        .join("2018-05-12--kitchen-table__bill_ikea.pdf");
    assert_eq!(renamed.path(), expected);
    assert!(expected.exists());
    assert!(!scan.exists());

    assert_eq!(archive.document(&scan), None);
    assert_eq!(archive.document(&expected).as_ref(), Some(&renamed));
    assert_eq!(archive.tags().count("bill"), 1);
    Ok(())
}

#[test]
fn specification_is_slugified_before_renaming() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let root = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());

    let scan = write_scan(&test_inbox(inbox.path(), "slug")?, "scan.pdf")?;
    let mut document = add_untagged(&archive, &scan);
    document.date = chrono::NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
    document.set_specification("Grüße aus Ovelgönne!");
    document.tags.insert("letter".to_string());
    let document = archive.update(document);

    let renamed = archive.rename(&document, root.path(), &LocalFileMover)?;

    assert_eq!(
        renamed.filename(),
        "2019-03-01--gruesse-aus-ovelgoenne__letter.pdf"
    );
    Ok(())
}

#[test]
fn missing_parts_are_reported() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let root = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());

    let scan = write_scan(&test_inbox(inbox.path(), "missing")?, "scan.pdf")?;
    let document = add_untagged(&archive, &scan);
    let result = archive.rename(&document, root.path(), &LocalFileMover);
    assert!(matches!(
        result,
        Err(ArchiveError::Document(DocumentError::MissingTags))
    ));

    let mut document = archive.add_tag("bill", &document)?;
    document.set_specification("");
    let document = archive.update(document);
    let result = archive.rename(&document, root.path(), &LocalFileMover);
    assert!(matches!(
        result,
        Err(ArchiveError::Document(DocumentError::MissingSpecification))
    ));

    assert!(scan.exists());
    Ok(())
}

#[test]
fn existing_target_is_not_overwritten() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let root = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());

    fs::create_dir_all(root.path().join("2018"))?;
    let occupied = write_scan(&root.path().join("2018"), "2018-05-12--table__bill.pdf")?;

    let scan = write_scan(inbox.path(), "2018-05-12--table__bill.pdf")?;
    let document = add_untagged(&archive, &scan);

    let result = archive.rename(&document, root.path(), &LocalFileMover);
    match result {
        Err(ArchiveError::RenameTargetExists(path)) => assert_eq!(path, occupied),
        other => panic!("expected RenameTargetExists, got {other:?}"),
    }
    assert!(scan.exists());
    Ok(())
}

#[test]
fn move_failures_are_wrapped() -> Result<(), ArchiveError> {
    let inbox = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());

    let scan = write_scan(inbox.path(), "2018-05-12--table__bill.pdf")?;
    let document = add_untagged(&archive, &scan);

    let result = archive.rename(&document, Path::new("/srv/archive"), &FailingMover);
    match result {
        Err(ArchiveError::RenameIoFailure { path, source }) => {
            assert_eq!(path, Path::new("/srv/archive/2018/2018-05-12--table__bill.pdf"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected RenameIoFailure, got {other:?}"),
    }

    // the stored document keeps its old path
    assert!(archive.document(&scan).is_some());
    Ok(())
}

#[test]
fn canonical_names_survive_a_round_trip() -> Result<(), ArchiveError> {
    let root = TempDir::new()?;
    let archive = Archive::new(&ArchiveConfig::default());
    let parser = NameParser::default();

    for filename in [
        "2010-05-12--example-description__tag1_tag2_tag4.pdf",
        "2018-01-07--tom-tailor-shirt__bill_clothes.pdf",
        "1999-12-31--party__invitation.pdf",
    ] {
        let inbox = TempDir::new()?;
        let scan = write_scan(inbox.path(), filename)?;
        let document = add_untagged(&archive, &scan);

        let renamed = archive.rename(&document, root.path(), &LocalFileMover)?;

        assert_eq!(renamed.filename(), filename);
        assert_eq!(parser.parse(renamed.path()), parser.parse(&scan));
    }
    Ok(())
}
