use std::panic::{catch_unwind, AssertUnwindSafe};

use super::{ExtractionError, PageContent};

/// Extract per-page text from a PDF.
///
/// pdf-extract handles font encodings best but can fail or panic on unusual
/// files; lopdf is the fallback. Pages that fail in the fallback contribute
/// empty text instead of aborting the document.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let primary = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match primary {
        Ok(Ok(pages)) => {
            tracing::info!("PDF text extraction via pdf-extract succeeded ({} pages)", pages.len());
            Ok(pages
                .into_iter()
                .enumerate()
                .map(|(i, text)| PageContent {
                    page_number: i + 1,
                    text,
                })
                .collect())
        }
        Ok(Err(e)) => {
            tracing::warn!("pdf-extract failed ({}), trying lopdf fallback", e);
            extract_pdf_via_lopdf(bytes)
        }
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            tracing::warn!("pdf-extract panicked ({}), trying lopdf fallback", msg);
            extract_pdf_via_lopdf(bytes)
        }
    }
}

fn extract_pdf_via_lopdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(format!("Failed to load PDF: {e}")))?;

    let pages: Vec<PageContent> = doc
        .get_pages()
        .keys()
        .map(|&page_num| {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Page {} could not be extracted: {}", page_num, e);
                    String::new()
                }
            };
            PageContent {
                page_number: page_num as usize,
                text,
            }
        })
        .collect();

    tracing::info!("PDF text extraction via lopdf finished ({} pages)", pages.len());
    Ok(pages)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
