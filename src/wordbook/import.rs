//! Wordbook XML import.
//!
//! Expected format:
//! ```xml
//! <wordbook>
//!     <item>
//!         <word>example</word>
//!         <trans><![CDATA[translation text]]></trans>
//!         <tags>category</tags>
//!     </item>
//! </wordbook>
//! ```
//!
//! Malformed XML fails the whole import; an individual item missing a
//! required element is skipped and counted, never aborting the rest.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::words::WordStore;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid root element: expected 'wordbook', got '{0}'")]
    InvalidRoot(String),

    #[error("No word items found in XML file")]
    NoItems,

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// One valid `<item>` from a wordbook file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordbookItem {
    pub word: String,
    pub translation: String,
    pub category: String,
}

/// Parse result: valid items plus the count of skipped invalid ones
#[derive(Debug, Clone)]
pub struct ParsedWordbook {
    pub items: Vec<WordbookItem>,
    pub invalid_items: usize,
}

/// Import statistics as reported by the upload API
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ImportStats {
    pub total_processed: usize,
    pub added: usize,
    pub skipped_duplicates: usize,
    pub errors: usize,
}

#[derive(Default)]
struct ItemFields {
    word: String,
    translation: String,
    category: String,
}

impl ItemFields {
    fn append(&mut self, element: &str, text: &str) {
        let target = match element {
            "word" => &mut self.word,
            "trans" => &mut self.translation,
            "tags" => &mut self.category,
            _ => return,
        };
        if !target.is_empty() {
            target.push('\n');
        }
        target.push_str(text);
    }

    fn into_item(self) -> Option<WordbookItem> {
        let word = self.word.trim().to_string();
        let translation = clean_text(&self.translation);
        let category = self.category.trim().to_string();
        if word.is_empty() || translation.is_empty() || category.is_empty() {
            return None;
        }
        Some(WordbookItem {
            word,
            translation,
            category,
        })
    }
}

/// Normalize translation text: collapse runs of spaces and tabs, strip
/// indentation after line breaks (CDATA blocks often arrive indented).
fn clean_text(text: &str) -> String {
    let spaces = Regex::new(r"[ \t]+").unwrap();
    let indented = Regex::new(r"\n\s+").unwrap();
    let collapsed = spaces.replace_all(text, " ");
    indented.replace_all(&collapsed, "\n").trim().to_string()
}

/// Parse wordbook XML from a string.
pub fn parse_wordbook(content: &str) -> Result<ParsedWordbook, ImportError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut saw_root = false;
    let mut items = Vec::new();
    let mut invalid_items = 0usize;
    let mut current: Option<ItemFields> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if !saw_root {
                    if name != "wordbook" {
                        return Err(ImportError::InvalidRoot(name));
                    }
                    saw_root = true;
                } else if name == "item" {
                    current = Some(ItemFields::default());
                    current_element.clear();
                } else {
                    current_element = name;
                }
            }
            Event::Text(ref e) => {
                if let Some(item) = current.as_mut() {
                    let text = e.unescape()?.to_string();
                    item.append(&current_element, &text);
                }
            }
            Event::CData(e) => {
                if let Some(item) = current.as_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    item.append(&current_element, &text);
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    match current.take().and_then(ItemFields::into_item) {
                        Some(item) => items.push(item),
                        None => invalid_items += 1,
                    }
                } else {
                    current_element.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ImportError::InvalidRoot("(none)".to_string()));
    }
    if items.is_empty() && invalid_items == 0 {
        return Err(ImportError::NoItems);
    }

    Ok(ParsedWordbook {
        items,
        invalid_items,
    })
}

/// Import parsed items into the word store, skipping (word, category)
/// duplicates. Per-item storage failures are logged and counted, never
/// fatal to the rest of the batch.
pub fn import_items(store: &WordStore, parsed: &ParsedWordbook) -> ImportStats {
    let mut stats = ImportStats {
        total_processed: parsed.items.len(),
        added: 0,
        skipped_duplicates: 0,
        errors: parsed.invalid_items,
    };

    for item in &parsed.items {
        match store.import_word(&item.word, &item.translation, &item.category) {
            Ok(true) => stats.added += 1,
            Ok(false) => stats.skipped_duplicates += 1,
            Err(e) => {
                log::warn!("Failed to import word \"{}\": {}", item.word, e);
                stats.errors += 1;
            }
        }
    }

    stats
}

/// Parse and import a wordbook from a string in one call.
pub fn import_str(store: &WordStore, content: &str) -> Result<ImportStats, ImportError> {
    let parsed = parse_wordbook(content)?;
    Ok(import_items(store, &parsed))
}

/// Parse and import a wordbook file (CLI path).
pub fn import_file(store: &WordStore, path: &Path) -> Result<ImportStats, ImportError> {
    let content = std::fs::read_to_string(path)?;
    import_str(store, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<wordbook>
        <item>
            <word>apple</word>
            <trans><![CDATA[a round fruit
                with red or green skin]]></trans>
            <tags>Fruit</tags>
        </item>
        <item>
            <word>vector</word>
            <trans><![CDATA[a quantity with direction]]></trans>
            <tags>Math</tags>
        </item>
    </wordbook>"#;

    #[test]
    fn test_parse_valid_wordbook() {
        let parsed = parse_wordbook(SAMPLE).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.invalid_items, 0);
        assert_eq!(parsed.items[0].word, "apple");
        assert_eq!(parsed.items[0].category, "Fruit");
        // CDATA indentation is cleaned up
        assert_eq!(
            parsed.items[0].translation,
            "a round fruit\nwith red or green skin"
        );
    }

    #[test]
    fn test_items_missing_fields_are_skipped() {
        let xml = r#"<wordbook>
            <item><word>kept</word><trans>ok</trans><tags>C</tags></item>
            <item><trans>no word</trans><tags>C</tags></item>
            <item><word>no-trans</word><tags>C</tags></item>
            <item><word>also kept</word><trans>ok</trans><tags>C</tags></item>
        </wordbook>"#;

        let parsed = parse_wordbook(xml).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.invalid_items, 2);
        assert_eq!(parsed.items[1].word, "also kept");
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = parse_wordbook("<notebook><item/></notebook>").unwrap_err();
        assert!(matches!(err, ImportError::InvalidRoot(_)));
    }

    #[test]
    fn test_empty_wordbook_rejected() {
        let err = parse_wordbook("<wordbook></wordbook>").unwrap_err();
        assert!(matches!(err, ImportError::NoItems));
    }

    #[test]
    fn test_import_counts_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let store = WordStore::new(dir.path().to_path_buf()).unwrap();

        let stats = import_str(&store, SAMPLE).unwrap();
        assert_eq!(
            stats,
            ImportStats {
                total_processed: 2,
                added: 2,
                skipped_duplicates: 0,
                errors: 0,
            }
        );

        // Re-importing the same file only skips
        let stats = import_str(&store, SAMPLE).unwrap();
        assert_eq!(stats.added, 0);
        assert_eq!(stats.skipped_duplicates, 2);
    }

    #[test]
    fn test_import_stats_reflect_only_valid_items() {
        let dir = tempfile::tempdir().unwrap();
        let store = WordStore::new(dir.path().to_path_buf()).unwrap();

        let xml = r#"<wordbook>
            <item><word>kept</word><trans>ok</trans><tags>C</tags></item>
            <item><word>broken</word><tags>C</tags></item>
        </wordbook>"#;

        let stats = import_str(&store, xml).unwrap();
        assert_eq!(stats.total_processed, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.errors, 1);
    }
}
