use super::{ExtractionError, PageContent};

pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // UTF-8 first; Latin-1 maps every byte to a char so it never fails.
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::warn!("TXT is not valid UTF-8 ({}), decoding as Latin-1", e);
            decode_latin1(bytes)
        }
    };

    Ok(vec![PageContent {
        page_number: 1,
        text,
    }])
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        let pages = extract_txt(content).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Hello, world!"));
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Ünïcödé text with émojis 🎉".as_bytes();
        let pages = extract_txt(content).unwrap();
        assert_eq!(pages[0].text, "Ünïcödé text with émojis 🎉");
    }

    #[test]
    fn falls_back_to_latin1() {
        // "café" in Latin-1: 0xE9 is not valid UTF-8 on its own.
        let content = [b'c', b'a', b'f', 0xE9];
        let pages = extract_txt(&content).unwrap();
        assert_eq!(pages[0].text, "café");
    }

    #[test]
    fn extract_empty_text() {
        let pages = extract_txt(b"").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
    }

    #[test]
    fn keeps_whitespace_for_caller() {
        let pages = extract_txt(b"  \n  Hello  \n  ").unwrap();
        assert_eq!(pages[0].text.trim(), "Hello");
    }
}
