use std::io::{Cursor, Read};

use super::{ExtractionError, PageContent};

pub fn extract_docx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("Invalid DOCX archive: {e}")))?;

    let mut doc_xml = archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractionError::DocxError("No document.xml found in DOCX".to_string()))?;

    let mut xml = String::new();
    doc_xml
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::DocxError(format!("Failed to read document.xml: {e}")))?;

    Ok(vec![PageContent {
        page_number: 1,
        text: paragraphs_from_xml(&xml),
    }])
}

/// Walk WordprocessingML and join `<w:p>` paragraphs with newlines.
///
/// Only text inside `<w:t>` runs is kept; `<w:tab/>` and `<w:br/>` become a
/// tab and a newline. Tag names are matched exactly so `w:pPr`, `w:tbl` and
/// friends are skipped.
fn paragraphs_from_xml(xml: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text {
            paragraph.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let is_end = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("");

        match (name, is_end, self_closing) {
            ("w:p", false, false) => {
                in_paragraph = true;
                paragraph.clear();
            }
            ("w:p", false, true) => paragraphs.push(String::new()),
            ("w:p", true, _) => {
                paragraphs.push(std::mem::take(&mut paragraph));
                in_paragraph = false;
            }
            ("w:t", false, false) => in_text = true,
            ("w:t", true, _) => in_text = false,
            ("w:tab", false, _) if in_paragraph => paragraph.push('\t'),
            ("w:br" | "w:cr", false, _) if in_paragraph => paragraph.push('\n'),
            _ => {}
        }
    }

    paragraphs.join("\n")
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| Some((entity_char(&tail[1..semi])?, semi))) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve the name between `&` and `;`: the five XML entities or a numeric
/// reference (`#8217`, `#x2019`).
fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::FileOptions::default();
            zip.start_file("word/document.xml", options).unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Engine</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Max </w:t></w:r><w:r><w:t>RPM 2700</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml), "Engine\nMax RPM 2700");
    }

    #[test]
    fn tabs_breaks_and_entities() {
        let xml = "<w:p><w:r><w:t>A&amp;B</w:t><w:tab/><w:t>&lt;C&gt;</w:t><w:br/><w:t>D</w:t></w:r></w:p><w:p/>";
        assert_eq!(paragraphs_from_xml(xml), "A&B\t<C>\nD\n");
    }

    #[test]
    fn numeric_references_are_decoded() {
        assert_eq!(decode_entities("pilot&#8217;s"), "pilot\u{2019}s");
        assert_eq!(decode_entities("pilot&#x2019;s &#X41;"), "pilot\u{2019}s A");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("AT&T &bogus; &#xZZ;"), "AT&T &bogus; &#xZZ;");
    }

    #[test]
    fn text_outside_runs_is_ignored() {
        let xml = "<w:p><w:r><w:instrText>PAGE</w:instrText><w:t>kept</w:t></w:r></w:p>";
        assert_eq!(paragraphs_from_xml(xml), "kept");
    }

    #[test]
    fn extract_from_archive() {
        let bytes = build_docx("<w:document><w:body><w:p><w:r><w:t>Fuel capacity 84 gallons</w:t></w:r></w:p></w:body></w:document>");
        let pages = extract_docx(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "Fuel capacity 84 gallons");
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let err = extract_docx(b"plain text pretending").unwrap_err();
        assert!(matches!(err, ExtractionError::DocxError(_)));
    }

    #[test]
    fn missing_document_xml_is_an_error() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("other.xml", zip::write::FileOptions::default()).unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_docx(&buf.into_inner()).unwrap_err();
        assert!(err.to_string().contains("document.xml"));
    }
}
