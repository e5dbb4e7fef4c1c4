//! Translation tables and the XML resource format they are loaded from.
//!
//! A language file has a single root element; every direct child becomes one entry whose
//! key is the child's tag name and whose value is the child's text content:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Root>
//!   <LanguageName>Français</LanguageName>
//!   <SelectLanguage>Choisir la langue : </SelectLanguage>
//! </Root>
//! ```
//!
//! Deeper elements are not keys; their text is folded into the enclosing child's value.
//! Whitespace-only text nodes are insignificant and dropped, so the writer emits
//! whitespace-only values as CDATA sections to keep them intact.
//!
//! Files must be UTF-8, or UTF-16 with a byte order mark when read from disk. The
//! `encoding` attribute of the XML declaration is not consulted: a file declaring
//! `encoding="iso-8859-1"` without a BOM is read as UTF-8 and rejected if any byte is not
//! valid UTF-8.

use std::{
    collections::{BTreeMap, HashMap},
    io::{BufRead, Write},
    sync::Arc,
};

use lazy_static::lazy_static;
use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::{error::Error, language::BUILTIN_LANGUAGE_NAME, traits::Parser};

/// Key holding a language's human readable display name.
pub const LANGUAGE_NAME_KEY: &str = "LanguageName";

/// Root element name used when writing tables.
pub const ROOT_ELEMENT: &str = "Root";

lazy_static! {
    static ref BUILTIN_TABLE: Arc<TranslationTable> = Arc::new(TranslationTable::from_iter([
        (LANGUAGE_NAME_KEY.to_string(), BUILTIN_LANGUAGE_NAME.to_string()),
        ("SelectLanguage".to_string(), "ǝƃɐnƃuɐ˥ ʇɔǝlǝS: ".to_string()),
        (
            "UpdateLanguagesToolTip".to_string(),
            "sǝƃɐnƃuɐl ǝlqɐlᴉɐʌɐ ǝʇɐpd∩".to_string(),
        ),
    ]));
}

/// An immutable key → string mapping holding one language's strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    /// The process-wide built-in table, shared by every caller.
    pub fn builtin() -> Arc<TranslationTable> {
        Arc::clone(&BUILTIN_TABLE)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted by key.
    pub fn sorted(&self) -> BTreeMap<&str, &str> {
        self.iter().collect()
    }

    /// Value of the `LanguageName` entry, if present.
    pub fn language_name(&self) -> Option<&str> {
        self.get(LANGUAGE_NAME_KEY)
    }
}

impl From<HashMap<String, String>> for TranslationTable {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, String)> for TranslationTable {
    /// Later pairs overwrite earlier pairs with the same key.
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Parser for TranslationTable {
    /// Parse from any reader. Duplicate keys resolve to the last occurrence.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut entries = HashMap::new();
        walk_entries(reader, |key, value| {
            entries.insert(key, value);
        })?;
        Ok(Self { entries })
    }

    /// Write to any writer (file, memory, etc.). Keys are written in sorted order.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

        for (key, value) in self.sorted() {
            if !is_valid_element_name(key) {
                return Err(Error::invalid_resource(format!(
                    "key `{}` is not a valid element name",
                    key
                )));
            }
            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::Start(BytesStart::new(key)))?;
            if !value.is_empty() && value.bytes().all(|b| b.is_ascii_whitespace()) {
                xml_writer.write_event(Event::CData(BytesCData::new(value)))?;
            } else {
                xml_writer.write_event(Event::Text(BytesText::new(value)))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new(key)))?;
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

/// Reads a single field's text content without building a table.
///
/// The whole document is still validated, so a file that is malformed after the field is
/// rejected just like [`TranslationTable::from_reader`] would reject it. Returns an empty
/// string when the field is absent; the first occurrence wins.
pub fn peek_field<R: BufRead>(reader: R, field: &str) -> Result<String, Error> {
    let mut found = None;
    walk_entries(reader, |key, value| {
        if found.is_none() && key == field {
            found = Some(value);
        }
    })?;
    Ok(found.unwrap_or_default())
}

/// Streams the direct children of the root element as `(key, value)` pairs.
fn walk_entries<R: BufRead>(
    reader: R,
    mut on_entry: impl FnMut(String, String),
) -> Result<(), Error> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().check_end_names = true;

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<(String, String)> = None;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                match depth {
                    0 => enter_root(&mut seen_root)?,
                    1 => current = Some((element_name(e)?, String::new())),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => match depth {
                0 => enter_root(&mut seen_root)?,
                1 => on_entry(element_name(e)?, String::new()),
                _ => {}
            },
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::invalid_resource("unmatched end tag"))?;
                if depth == 1 {
                    if let Some((key, value)) = current.take() {
                        on_entry(key, value);
                    }
                }
            }
            Event::Text(e) => {
                if e.iter().all(u8::is_ascii_whitespace) {
                    // insignificant
                } else if depth == 0 {
                    return Err(Error::invalid_resource("text outside the root element"));
                } else if let Some((_, value)) = current.as_mut() {
                    value.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if depth == 0 {
                    return Err(Error::invalid_resource("CDATA outside the root element"));
                }
                if let Some((_, value)) = current.as_mut() {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| Error::invalid_resource(e.to_string()))?;
                    value.push_str(text);
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(Error::invalid_resource("unexpected end of document"));
                }
                if !seen_root {
                    return Err(Error::invalid_resource("document has no root element"));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn enter_root(seen_root: &mut bool) -> Result<(), Error> {
    if *seen_root {
        return Err(Error::invalid_resource("multiple root elements"));
    }
    *seen_root = true;
    Ok(())
}

fn element_name(e: &BytesStart) -> Result<String, Error> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|e| Error::invalid_resource(e.to_string()))
}

fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start_ok = |c: char| c.is_alphabetic() || c == '_' || c == ':';
    start_ok(first)
        && !name.to_ascii_lowercase().starts_with("xml")
        && chars.all(|c| start_ok(c) || c.is_alphanumeric() || matches!(c, '-' | '.'))
}
