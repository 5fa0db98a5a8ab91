use anyhow::Result;
use careerflow::client::detect_mime;
use careerflow::{DataUri, FileAttachment};

#[test]
fn encoding_round_trips_bytes_exactly() -> Result<()> {
    let bytes: Vec<u8> = (0..=255u8).chain([0, 0, 255]).collect();
    let uri = DataUri::encode("application/pdf", &bytes);
    let text = uri.to_string();
    assert!(text.starts_with("data:application/pdf;base64,"));

    let parsed: DataUri = text.parse()?;
    assert_eq!(parsed, uri);
    assert_eq!(parsed.decode()?, bytes);
    Ok(())
}

#[test]
fn malformed_uris_are_rejected() {
    assert!(DataUri::parse("application/pdf;base64,AAAA").is_err());
    assert!(DataUri::parse("data:application/pdf,AAAA").is_err());
    assert!(DataUri::parse("data:pdf;base64,AAAA").is_err());
    let bad_payload = DataUri::parse("data:text/plain;base64,***").unwrap();
    assert!(bad_payload.decode().is_err());
}

#[test]
fn mime_is_sniffed_before_extension() {
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    assert_eq!(detect_mime("photo.txt", &png), "image/png");
    assert_eq!(detect_mime("resume.bin", b"%PDF-1.4"), "application/pdf");
    assert_eq!(
        detect_mime("resume.docx", b"PK\x03\x04"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(detect_mime("blob", b"plain words"), "application/octet-stream");
}

#[test]
fn allowed_types_support_wildcards() {
    let jpeg = DataUri::encode("image/jpeg", b"\xFF\xD8\xFF");
    assert!(jpeg.ensure_allowed(&["application/pdf", "image/*"]).is_ok());
    assert!(jpeg.ensure_allowed(&["application/pdf"]).is_err());
}

#[tokio::test]
async fn files_are_read_and_encoded() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.md");
    tokio::fs::write(&path, "# Goals\n").await?;

    let attachment = FileAttachment::read(&path).await?;
    assert_eq!(attachment.file_name(), "notes.md");
    assert_eq!(attachment.size(), 8);
    assert_eq!(attachment.data_uri().mime_type(), "text/markdown");
    assert_eq!(attachment.into_data_uri().decode()?, b"# Goals\n");
    Ok(())
}
