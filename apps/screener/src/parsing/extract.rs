//! Plain-text extraction for the supported upload formats.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use super::ParseError;

const DOCX_BODY: &str = "word/document.xml";

/// Extracts text from `bytes` according to the (lowercase) file extension.
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String, ParseError> {
    match extension {
        "pdf" => extract_pdf(bytes),
        "docx" => extract_docx(bytes),
        "txt" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Err(ParseError::UnsupportedExtension(other.to_string())),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?;
    Ok(clean_lines(&text))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ParseError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| ParseError::Docx(format!("{DOCX_BODY}: {e}")))?
        .read_to_string(&mut xml)?;
    document_xml_to_text(&xml)
}

/// Collects `w:t` runs; paragraph ends and `w:br` become newlines, `w:tab` a tab.
fn document_xml_to_text(xml: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::Docx(e.to_string()))?;

        match event {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text_run => {
                let text = e.unescape().map_err(|e| ParseError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Trims each line and collapses runs of blank lines left behind by PDF layout.
fn clean_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Ada Lovelace</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: Rust, </w:t></w:r><w:r><w:t>R&amp;D</w:t></w:r></w:p>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn docx_bytes(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_document_xml_paragraphs_and_entities() {
        let text = document_xml_to_text(DOCUMENT_XML).unwrap();
        assert_eq!(text, "Ada Lovelace\nSkills: Rust, R&D\nName\tValue\n");
    }

    #[test]
    fn test_extract_docx_from_zip() {
        let text = extract_text(&docx_bytes(DOCUMENT_XML), "docx").unwrap();
        assert!(text.starts_with("Ada Lovelace\n"));
    }

    #[test]
    fn test_docx_without_body_fails() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(
            extract_text(&bytes, "docx"),
            Err(ParseError::Docx(_))
        ));
    }

    #[test]
    fn test_not_a_zip_fails() {
        assert!(matches!(
            extract_text(b"plain text", "docx"),
            Err(ParseError::Docx(_))
        ));
    }

    #[test]
    fn test_txt_is_lossy_utf8() {
        let text = extract_text(b"caf\xc3\xa9 \xff", "txt").unwrap();
        assert!(text.starts_with("café "));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            extract_text(b"", "rtf"),
            Err(ParseError::UnsupportedExtension(ext)) if ext == "rtf"
        ));
    }

    #[test]
    fn test_clean_lines_collapses_blank_runs() {
        assert_eq!(clean_lines("  a \n\n\n  b\n\n"), "a\n\nb");
    }
}
