//! Loading review documents for upload.
//!
//! All three providers accept the PDF inline as standard base64.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};

use crate::error::ProviderError;

/// A document read from disk and encoded for inline upload.
#[derive(Debug, Clone)]
pub struct EncodedDocument {
    /// File name including extension, as sent to providers that want one.
    pub file_name: String,

    /// Standard base64 of the file contents.
    pub base64: String,
}

impl EncodedDocument {
    /// `data:` URL form used by the OpenAI Responses API.
    #[must_use]
    pub fn data_url(&self, media_type: &str) -> String {
        format!("data:{media_type};base64,{}", self.base64)
    }
}

/// Read and encode the document at `path`.
pub fn encode_document(path: &Path) -> Result<EncodedDocument, ProviderError> {
    let bytes = std::fs::read(path).map_err(|source| ProviderError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(EncodedDocument {
        file_name,
        base64: general_purpose::STANDARD.encode(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_encode_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let doc = encode_document(&path).unwrap();
        assert_eq!(doc.file_name, "paper.pdf");
        assert_eq!(doc.base64, "JVBERi0xLjQ=");
        assert_eq!(
            doc.data_url("application/pdf"),
            "data:application/pdf;base64,JVBERi0xLjQ="
        );
    }

    #[test]
    fn test_encode_missing_document() {
        let err = encode_document(Path::new("/nonexistent/paper.pdf")).unwrap_err();
        assert!(matches!(err, ProviderError::Document { .. }));
        assert!(err.to_string().contains("/nonexistent/paper.pdf"));
    }
}
