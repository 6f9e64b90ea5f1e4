// ── Content assembly ──────────────────────────────────────────────────────────
//
// Turns a file on disk into a `RenderableDocument`.  The bytes are embedded
// as base64, verbatim: the editor page decodes them (UTF-8, or UTF-16 when a
// byte-order mark is present), so nothing is transcoded or lost here.  The
// same decoding decides here whether the file is text at all.

use std::{
    borrow::Cow,
    fs::File,
    io::Read,
    path::Path,
};

use base64::{prelude::BASE64_STANDARD, Engine as _};
use encoding_rs::{Encoding, UTF_8};

use super::{RenderableDocument, VIRTUAL_HOST_NAME};
use crate::{
    error::{PreviewError, Result},
    theme::Theme,
};

/// Read `path` and build the document that displays it.
///
/// Fails with `FileUnreadable` when the file cannot be read, `Oversized` when
/// it holds `max_bytes` or more, and `NotText` when its bytes do not decode.
pub(crate) fn assemble(
    path: &Path,
    language_id: &'static str,
    wrap_enabled: bool,
    theme: Theme,
    max_bytes: u64,
) -> Result<RenderableDocument> {
    let bytes = read_bounded(path, max_bytes)?;

    if decode_text(&bytes).is_none() {
        return Err(PreviewError::NotText {
            path: path.to_owned(),
        });
    }

    Ok(RenderableDocument {
        language_id,
        wrap_enabled,
        theme,
        encoded_source: BASE64_STANDARD.encode(&bytes),
        virtual_host: VIRTUAL_HOST_NAME,
    })
}

/// Read at most `max_bytes` of `path`.  Reaching the limit is `Oversized`,
/// whatever size the file reported when it was stat'ed: it may have grown
/// since, or be a special file that reports no length.
pub(crate) fn read_bounded(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let unreadable = |source| PreviewError::FileUnreadable {
        path: path.to_owned(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let mut bytes = Vec::new();
    file.take(max_bytes)
        .read_to_end(&mut bytes)
        .map_err(unreadable)?;

    if bytes.len() as u64 >= max_bytes {
        return Err(PreviewError::Oversized {
            path: path.to_owned(),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// The text of `bytes`, as the editor page will show it: a byte-order mark
/// selects UTF-8 or UTF-16 LE/BE, anything else must be UTF-8.  `None` for
/// malformed input and for content with NUL characters.
pub(crate) fn decode_text(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let text = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])?;
    if text.contains('\0') {
        return None;
    }
    Some(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    const LIMIT: u64 = 3000;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(bytes).expect("write");
        file
    }

    fn decode(doc: &RenderableDocument) -> Vec<u8> {
        BASE64_STANDARD
            .decode(&doc.encoded_source)
            .expect("valid base64")
    }

    // ── assemble ─────────────────────────────────────────────────────────────

    #[test]
    fn carries_parameters() {
        let file = write_temp(b"print(\"hi\")\n");
        let doc = assemble(file.path(), "python", false, Theme::Dark, LIMIT).expect("assemble");
        assert_eq!(doc.language_id, "python");
        assert!(!doc.wrap_enabled);
        assert_eq!(doc.theme, Theme::Dark);
        assert_eq!(doc.virtual_host, VIRTUAL_HOST_NAME);
        assert_eq!(decode(&doc), b"print(\"hi\")\n");
    }

    #[test]
    fn script_breakout_is_neutralised() {
        let payload = b"`</script><script>alert(1)</script><!-- ${x} \"'";
        let file = write_temp(payload);
        let doc = assemble(file.path(), "html", true, Theme::Light, LIMIT).expect("assemble");
        assert!(!doc.encoded_source.contains('<'));
        assert!(!doc.encoded_source.contains('"'));
        assert_eq!(decode(&doc), payload);
    }

    #[test]
    fn empty_file_is_text() {
        let file = write_temp(b"");
        let doc = assemble(file.path(), "plaintext", true, Theme::Light, LIMIT).expect("assemble");
        assert_eq!(doc.encoded_source, "");
    }

    #[test]
    fn utf16_with_bom_is_embedded_verbatim() {
        let file = write_temp(b"\xFF\xFEh\x00i\x00");
        let doc = assemble(file.path(), "plaintext", true, Theme::Light, LIMIT).expect("assemble");
        assert_eq!(decode(&doc), b"\xFF\xFEh\x00i\x00");
    }

    #[test]
    fn binary_is_rejected() {
        let file = write_temp(b"MZ\x90\x00\x03\x00");
        let err = assemble(file.path(), "plaintext", true, Theme::Light, LIMIT).unwrap_err();
        assert!(matches!(err, PreviewError::NotText { .. }));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err =
            assemble(&dir.path().join("gone.py"), "python", true, Theme::Light, LIMIT).unwrap_err();
        assert!(matches!(err, PreviewError::FileUnreadable { .. }));
        assert!(!err.is_fatal());
    }

    // ── read_bounded ─────────────────────────────────────────────────────────

    #[test]
    fn content_at_limit_is_oversized() {
        let file = write_temp(&[b'x'; 100]);
        assert_eq!(read_bounded(file.path(), 101).expect("read").len(), 100);

        let err = read_bounded(file.path(), 100).unwrap_err();
        assert!(matches!(err, PreviewError::Oversized { limit: 100, .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn file_grown_after_stat_is_not_embedded() {
        let mut file = write_temp(b"x = 1\n");
        let stat_len = file.as_file().metadata().expect("stat").len();
        assert!(stat_len < 64);

        file.write_all(&[b'#'; 128]).expect("grow");
        let err = assemble(file.path(), "python", true, Theme::Light, 64).unwrap_err();
        assert!(matches!(err, PreviewError::Oversized { .. }));
    }

    /// procfs files report a length of zero but have content.
    #[cfg(target_os = "linux")]
    #[test]
    fn file_reporting_zero_length_is_still_bounded() {
        let path = Path::new("/proc/self/maps");
        assert_eq!(std::fs::metadata(path).expect("stat").len(), 0);
        let err = assemble(path, "plaintext", true, Theme::Light, 16).unwrap_err();
        assert!(matches!(err, PreviewError::Oversized { limit: 16, .. }));
    }

    // ── decode_text ──────────────────────────────────────────────────────────

    #[test]
    fn decodes_utf8_and_bom_marked_text() {
        assert_eq!(decode_text(b"plain").as_deref(), Some("plain"));
        assert_eq!(decode_text(b"\xEF\xBB\xBFbom").as_deref(), Some("bom"));
        assert_eq!(decode_text(b"\xFF\xFEh\x00i\x00").as_deref(), Some("hi"));
        assert_eq!(decode_text(b"\xFE\xFF\x00h\x00i").as_deref(), Some("hi"));
    }

    #[test]
    fn rejects_malformed_and_nul_content() {
        assert_eq!(decode_text(b"caf\xE9"), None);
        assert_eq!(decode_text(b"\x00\x01\x02"), None);
        // Odd trailing byte after a UTF-16 mark.
        assert_eq!(decode_text(b"\xFF\xFEh\x00i"), None);
    }

    proptest! {
        /// Any NUL-free text survives the round trip and the payload stays
        /// within the base64 alphabet.
        #[test]
        fn encoding_is_lossless_and_inert(text in "[^\\x00]{0,256}") {
            let file = write_temp(text.as_bytes());
            let doc = assemble(file.path(), "plaintext", true, Theme::Light, 1 << 20).expect("assemble");
            prop_assert!(doc
                .encoded_source
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='));
            prop_assert_eq!(decode(&doc), text.as_bytes());
        }
    }
}
