use epub_validator_core::{screen_filename, FailureReport, UploadError};

#[test]
fn accepts_epub_in_any_case() {
    assert_eq!(screen_filename(Some("book.epub")), Ok("book.epub"));
    assert_eq!(screen_filename(Some("BOOK.EPUB")), Ok("BOOK.EPUB"));
    assert_eq!(screen_filename(Some("my.novel.Epub")), Ok("my.novel.Epub"));
    assert_eq!(screen_filename(Some(".epub")), Ok(".epub"));
}

#[test]
fn rejects_missing_and_empty_names() {
    assert_eq!(screen_filename(None), Err(UploadError::MissingFile));
    assert_eq!(screen_filename(Some("")), Err(UploadError::EmptyFilename));
}

#[test]
fn rejects_other_extensions() {
    for name in ["book.txt", "epub", "book.epub.zip", "book.", "book.epub3"] {
        assert!(
            matches!(screen_filename(Some(name)), Err(UploadError::InvalidExtension(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn rejection_texts() {
    let err = screen_filename(Some("book.txt")).unwrap_err();
    assert_eq!(err.category(), "Invalid file type");
    assert_eq!(err.detail(), "Solo se permiten archivos .epub");

    let report = FailureReport::new(err.category(), err.detail());
    assert_eq!(report.errors, vec!["Solo se permiten archivos .epub".to_string()]);
}
