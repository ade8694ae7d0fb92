//! DOCX text extraction: the format is a zip archive whose main part,
//! `word/document.xml`, holds paragraphs (`<w:p>`) of text runs (`<w:t>`).
//! Paragraph text is concatenated in document order, joined by newlines.
//! No fallback — an unreadable archive fails the document.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

pub fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ExtractError::Extraction(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Extraction(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            // Self-closing <w:p/> is an empty paragraph; keep it so the
            // output preserves document order.
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Ok(Event::Text(t)) if in_text_run => {
                let run = t
                    .unescape()
                    .map_err(|e| ExtractError::Extraction(format!("malformed document.xml: {e}")))?;
                current.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Extraction(format!(
                    "malformed document.xml: {e}"
                )))
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_concatenated_in_document_order() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
            <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t xml:space="preserve"> half</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(
            paragraphs_from_xml(xml).unwrap(),
            "First paragraph\nSecond half"
        );
    }

    #[test]
    fn test_empty_paragraphs_preserved() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>b</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "a\n\nb");
    }

    #[test]
    fn test_zero_paragraph_document_yields_empty_text() {
        let xml = r#"<w:document><w:body/></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "");
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>C&amp;D &lt;tags&gt;</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "C&D <tags>");
    }

    #[test]
    fn test_non_run_text_ignored() {
        // Whitespace between elements must not leak into paragraph text.
        let xml = "<w:document><w:body>\n  <w:p><w:r><w:t>only this</w:t></w:r></w:p>\n</w:body></w:document>";
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "only this");
    }
}
