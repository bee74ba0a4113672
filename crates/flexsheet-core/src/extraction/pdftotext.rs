use crate::error::FlexsheetError;
use crate::extraction::{PdfExtractor, TextFragment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// Words on the same line closer than this many line-heights belong to one run.
const WORD_GAP_FACTOR: f32 = 0.6;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout` restricted to the first page and turns every
/// run of closely spaced words into a [`TextFragment`] in PDF user space.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_first_page(&self, pdf_bytes: &[u8]) -> Result<Vec<TextFragment>, FlexsheetError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| FlexsheetError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| FlexsheetError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .args(["-bbox-layout", "-f", "1", "-l", "1"])
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FlexsheetError::PdftotextNotFound
                } else {
                    FlexsheetError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(FlexsheetError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let fragments = parse_bbox_xml(&xml)?;
        tracing::debug!(count = fragments.len(), "pdftotext produced fragments");
        Ok(fragments)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

/// Parse `pdftotext -bbox-layout` XHTML into fragments for the first `<page>`.
///
/// pdftotext measures y from the top of the page; fragments are flipped into
/// PDF user space using the page height so that larger y means higher up.
fn parse_bbox_xml(xml: &str) -> Result<Vec<TextFragment>, FlexsheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut out = Vec::new();
    let mut page_height: Option<f32> = None;
    let mut line_words: Vec<Word> = Vec::new();
    let mut current_word: Option<Word> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FlexsheetError::Extraction(format!("invalid pdftotext XML: {e}")))?;

        match event {
            Event::Start(tag) => match tag.name().as_ref() {
                b"page" => {
                    if page_height.is_some() {
                        // first page only
                        break;
                    }
                    page_height = attr_f32(&tag, "height");
                }
                b"line" => line_words.clear(),
                b"word" => current_word = parse_word_bbox(&tag),
                _ => {}
            },
            Event::Text(text) => {
                if let Some(word) = current_word.as_mut() {
                    let decoded = text.unescape().map_err(|e| {
                        FlexsheetError::Extraction(format!("invalid pdftotext XML: {e}"))
                    })?;
                    word.text.push_str(decoded.trim());
                }
            }
            Event::End(tag) => match tag.name().as_ref() {
                b"word" => {
                    if let Some(word) = current_word.take() {
                        if !word.text.is_empty() {
                            line_words.push(word);
                        }
                    }
                }
                b"line" => {
                    if let Some(height) = page_height {
                        out.extend(words_to_fragments(&line_words, height));
                    }
                    line_words.clear();
                }
                b"page" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Join the words of one line into runs, splitting where the horizontal gap is wide.
fn words_to_fragments(words: &[Word], page_height: f32) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut run: Option<Word> = None;

    for word in words {
        run = Some(match run.take() {
            Some(mut current) => {
                let line_height = (current.y_max - current.y_min).max(word.y_max - word.y_min);
                if word.x_min - current.x_max <= line_height * WORD_GAP_FACTOR {
                    current.text.push(' ');
                    current.text.push_str(&word.text);
                    current.x_max = current.x_max.max(word.x_max);
                    current.y_min = current.y_min.min(word.y_min);
                    current.y_max = current.y_max.max(word.y_max);
                    current
                } else {
                    fragments.push(word_to_fragment(current, page_height));
                    word.clone()
                }
            }
            None => word.clone(),
        });
    }

    if let Some(current) = run {
        fragments.push(word_to_fragment(current, page_height));
    }

    fragments
}

fn word_to_fragment(word: Word, page_height: f32) -> TextFragment {
    TextFragment::at(
        word.text,
        word.x_min,
        page_height - word.y_max,
        word.x_max - word.x_min,
        word.y_max - word.y_min,
    )
}

fn parse_word_bbox(tag: &BytesStart<'_>) -> Option<Word> {
    Some(Word {
        text: String::new(),
        x_min: attr_f32(tag, "xMin")?,
        y_min: attr_f32(tag, "yMin")?,
        x_max: attr_f32(tag, "xMax")?,
        y_max: attr_f32(tag, "yMax")?,
    })
}

fn attr_f32(tag: &BytesStart<'_>, name: &str) -> Option<f32> {
    let attr = tag.try_get_attribute(name).ok()??;
    attr.unescape_value().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="Test"/>
</head>
<body>
<doc>
  <page width="600.000000" height="800.000000">
    <flow>
      <block xMin="40.0" yMin="100.0" xMax="300.0" yMax="110.0">
        <line xMin="40.0" yMin="100.0" xMax="300.0" yMax="110.0">
          <word xMin="40.0" yMin="100.0" xMax="64.0" yMax="110.0">Name</word>
          <word xMin="66.0" yMin="100.0" xMax="72.0" yMax="110.0">&amp;</word>
          <word xMin="74.0" yMin="100.0" xMax="86.0" yMax="110.0">PO</word>
          <word xMin="88.0" yMin="100.0" xMax="104.0" yMax="110.0">No.</word>
          <word xMin="200.0" yMin="100.0" xMax="240.0" yMax="110.0">Doe,</word>
          <word xMin="242.0" yMin="100.0" xMax="270.0" yMax="110.0">Jane</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="600.000000" height="800.000000">
    <flow>
      <block xMin="40.0" yMin="100.0" xMax="80.0" yMax="110.0">
        <line xMin="40.0" yMin="100.0" xMax="80.0" yMax="110.0">
          <word xMin="40.0" yMin="100.0" xMax="80.0" yMax="110.0">Ignored</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_bbox_xml_splits_runs_on_wide_gaps() {
        let fragments = parse_bbox_xml(SAMPLE).unwrap();
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Name & PO No.", "Doe, Jane"]);
    }

    #[test]
    fn test_parse_bbox_xml_flips_y_axis() {
        let fragments = parse_bbox_xml(SAMPLE).unwrap();
        let label = &fragments[0];
        assert_eq!(label.x(), 40.0);
        assert_eq!(label.y(), 690.0);
        assert_eq!(label.width, 64.0);
        assert_eq!(label.height, 10.0);
    }

    #[test]
    fn test_parse_bbox_xml_reads_first_page_only() {
        let fragments = parse_bbox_xml(SAMPLE).unwrap();
        assert!(fragments.iter().all(|f| f.text != "Ignored"));
    }

    #[test]
    fn test_parse_bbox_xml_empty_document() {
        assert!(parse_bbox_xml("<doc></doc>").unwrap().is_empty());
    }
}
