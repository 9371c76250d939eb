pub mod chunker;
mod docx;
mod pdf;
mod txt;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("Text decoding failed: {0}")]
    Encoding(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Txt,
}

impl FileKind {
    /// Resolve from a bare extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "txt" => Some(FileKind::Txt),
            _ => None,
        }
    }

    /// Resolve from the extension of a filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Txt => "txt",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page (PDF) or the whole body (DOCX/TXT) of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number. Always 1 for DOCX and TXT.
    pub page_number: usize,
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub kind: FileKind,
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// All page text joined by newlines. A single page comes back unchanged.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total byte length of page text.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.len()).sum()
    }

    /// True when nothing but whitespace was extracted.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Extract text from file bytes, dispatching on the file kind.
pub fn extract(bytes: &[u8], filename: &str, kind: FileKind) -> Result<ExtractedDocument, ExtractionError> {
    let pages = match kind {
        FileKind::Pdf => pdf::extract_pdf(bytes)?,
        FileKind::Docx => docx::extract_docx(bytes)?,
        FileKind::Txt => txt::extract_txt(bytes)?,
    };

    let doc = ExtractedDocument {
        filename: filename.to_string(),
        kind,
        pages,
    };
    tracing::info!(
        "Extracted {} page(s), {} bytes of text from {} ({})",
        doc.pages.len(),
        doc.total_chars(),
        filename,
        kind
    );
    Ok(doc)
}

/// Extract text from file bytes based on the filename's extension.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let kind = FileKind::from_filename(filename).ok_or_else(|| {
        let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        ExtractionError::UnsupportedType(ext.to_lowercase())
    })?;
    extract(bytes, filename, kind)
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components are dropped, anything but letters, digits and `._-` becomes `_`
/// and leading dots are stripped so the result can never be hidden or
/// traverse directories.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Document title: the filename without its final extension.
pub fn title_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_kind_from_filename() {
        assert_eq!(FileKind::from_filename("report.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_filename("notes.docx"), Some(FileKind::Docx));
        assert_eq!(FileKind::from_filename("a.b.txt"), Some(FileKind::Txt));
        assert_eq!(FileKind::from_filename("image.png"), None);
        assert_eq!(FileKind::from_filename("README"), None);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = extract_text(b"data", "virus.exe").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref e) if e == "exe"));
    }

    #[test]
    fn full_text_separates_pages() {
        let doc = ExtractedDocument {
            filename: "x.pdf".into(),
            kind: FileKind::Pdf,
            pages: vec![
                PageContent { page_number: 1, text: "one".into() },
                PageContent { page_number: 2, text: String::new() },
                PageContent { page_number: 3, text: "three".into() },
            ],
        };
        assert_eq!(doc.full_text(), "one\n\nthree");
        assert!(!doc.is_blank());
    }

    #[test]
    fn sanitize_drops_paths_and_odd_chars() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\My Manual (v2).pdf"), "My_Manual__v2_.pdf");
        assert_eq!(sanitize_filename(".hidden.txt"), "hidden.txt");
    }

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_filename("évian.txt"), "évian.txt");
        assert_eq!(title_from_filename(&sanitize_filename("日本.txt")), "日本");
        assert_eq!(sanitize_filename("résumé?.docx"), "résumé_.docx");
    }

    #[test]
    fn single_page_text_is_unchanged() {
        let doc = extract_text("a".repeat(3000).as_bytes(), "len.txt").unwrap();
        assert_eq!(doc.full_text().chars().count(), 3000);
    }

    #[test]
    fn title_strips_last_extension() {
        assert_eq!(title_from_filename("pa32_poh.pdf"), "pa32_poh");
        assert_eq!(title_from_filename("archive.tar.txt"), "archive.tar");
        assert_eq!(title_from_filename("noext"), "noext");
    }
}
