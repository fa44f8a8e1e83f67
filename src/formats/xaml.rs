//! Support for XAML `ResourceDictionary` localization documents.
//!
//! Only flat `<system:String>` entries are supported. Merged dictionaries
//! (`<ResourceDictionary.MergedDictionaries>`) are not.
//! Provides parsing, serialization, and the skeleton document used when a
//! backing file is missing or empty.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser, types::Translation};

/// Default namespace of the root element.
pub const XMLNS: &str = "https://github.com/avaloniaui";
/// XAML language namespace (`x:` prefix).
pub const XMLNS_X: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
/// CLR namespace mapping for `system:String` entries.
pub const XMLNS_SYSTEM: &str = "clr-namespace:System;assembly=mscorlib";

/// A parsed `ResourceDictionary` document.
///
/// `has_root` distinguishes a dictionary that was actually present in the
/// input from an empty or whitespace-only document; callers substitute the
/// skeleton when it is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Format {
    /// Entries in document order.
    pub entries: Vec<StringEntry>,
    /// Whether a `ResourceDictionary` root element was present in the input.
    pub has_root: bool,
}

impl Format {
    /// The minimal valid document: a `ResourceDictionary` root carrying the
    /// required namespace declarations and no entries.
    pub fn skeleton() -> Self {
        Format {
            entries: Vec::new(),
            has_root: true,
        }
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut entries = Vec::new();
        let mut has_root = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"ResourceDictionary" => {
                    has_root = true;
                }
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"ResourceDictionary" => {
                    has_root = true;
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"system:String" => {
                    let entry = parse_string_entry(e, &mut xml_reader)?;
                    entries.push(entry);
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"system:String" => {
                    let (key, explicit_preserve) = parse_entry_attributes(e)?;
                    entries.push(StringEntry {
                        key,
                        text: String::new(),
                        preserve_space: explicit_preserve,
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format { entries, has_root })
    }

    /// Write to any writer (file, memory, etc.).
    ///
    /// The output is deterministic: XML declaration, one entry per line,
    /// four-space indentation.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let mut root = BytesStart::new("ResourceDictionary");
        root.push_attribute(("xmlns", XMLNS));
        root.push_attribute(("xmlns:x", XMLNS_X));
        root.push_attribute(("xmlns:system", XMLNS_SYSTEM));
        xml_writer.write_event(Event::Start(root))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for entry in &self.entries {
            xml_writer.write_event(Event::Text(BytesText::new("    ")))?;
            let mut elem = BytesStart::new("system:String");
            elem.push_attribute(("x:Key", entry.key.as_str()));
            if entry.preserve_space {
                elem.push_attribute(("xml:space", "preserve"));
            }
            xml_writer.write_event(Event::Start(elem))?;
            xml_writer.write_event(Event::Text(BytesText::new(&entry.text)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("system:String")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("ResourceDictionary")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

/// One `<system:String>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringEntry {
    pub key: String,
    pub text: String,
    pub preserve_space: bool,
}

impl StringEntry {
    pub fn from_translation(key: &str, translation: &Translation) -> Self {
        StringEntry {
            key: key.to_string(),
            text: translation.text.clone(),
            preserve_space: translation.preserve_space,
        }
    }

    pub fn to_translation(&self) -> Translation {
        Translation {
            text: self.text.clone(),
            preserve_space: self.preserve_space,
        }
    }
}

fn parse_entry_attributes(e: &BytesStart<'_>) -> Result<(String, bool), Error> {
    let mut key = None;
    let mut explicit_preserve = false;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        match attr.key.as_ref() {
            b"x:Key" => key = Some(attr.unescape_value()?.to_string()),
            b"xml:space" => {
                explicit_preserve = attr.unescape_value()?.as_ref() == "preserve";
            }
            _ => {}
        }
    }
    let key = key.ok_or_else(|| {
        Error::InvalidDocument("system:String tag missing 'x:Key'".to_string())
    })?;
    Ok((key, explicit_preserve))
}

fn parse_string_entry<R: BufRead>(
    e: &BytesStart<'_>,
    xml_reader: &mut Reader<R>,
) -> Result<StringEntry, Error> {
    let (key, explicit_preserve) = parse_entry_attributes(e)?;

    let mut buf = Vec::new();
    let mut text = String::new();
    // Collect text until the closing tag. Character references (e.g. &#10;)
    // are decoded to their literal characters here. Entries are flat, so a
    // nested element is a malformed document, not markup to skip.
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => text.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let chunk = std::str::from_utf8(raw.as_ref())
                    .map_err(|e| Error::DataMismatch(e.to_string()))?;
                text.push_str(chunk);
            }
            Ok(Event::Start(_)) | Ok(Event::Empty(_)) => {
                return Err(Error::InvalidDocument(format!(
                    "nested element inside system:String '{}'",
                    key
                )));
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(Error::InvalidDocument(
                    "unexpected EOF inside system:String".to_string(),
                ));
            }
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    // Without an explicit marker, incidental formatting whitespace is
    // trimmed; a remaining newline means the text itself is multiline and
    // must be preserved verbatim from here on.
    let (text, preserve_space) = if explicit_preserve {
        (text, true)
    } else {
        let trimmed = text.trim().to_string();
        let preserve_space = trimmed.contains('\n');
        (trimmed, preserve_space)
    };

    Ok(StringEntry {
        key,
        text,
        preserve_space,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    #[test]
    fn test_parse_basic_dictionary() {
        let xml = indoc! {r#"
            <ResourceDictionary xmlns="https://github.com/avaloniaui"
                                xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
                                xmlns:system="clr-namespace:System;assembly=mscorlib">
                <system:String x:Key="MainWindow.Title">My App</system:String>
                <system:String x:Key="MainWindow.Empty"></system:String>
                <system:String x:Key="MainWindow.SelfClosed"/>
            </ResourceDictionary>
        "#};
        let format = Format::from_str(xml).unwrap();
        assert!(format.has_root);
        assert_eq!(format.entries.len(), 3);
        let title = &format.entries[0];
        assert_eq!(title.key, "MainWindow.Title");
        assert_eq!(title.text, "My App");
        assert!(!title.preserve_space);
        assert_eq!(format.entries[1].text, "");
        assert_eq!(format.entries[2].text, "");
    }

    #[test]
    fn test_parse_explicit_preserve_space() {
        let xml = "<ResourceDictionary>\
                   <system:String x:Key=\"padded\" xml:space=\"preserve\">  two  spaces  </system:String>\
                   </ResourceDictionary>";
        let format = Format::from_str(xml).unwrap();
        let entry = &format.entries[0];
        assert!(entry.preserve_space);
        assert_eq!(entry.text, "  two  spaces  ");
    }

    #[test]
    fn test_parse_decodes_newline_references() {
        let xml = "<ResourceDictionary>\
                   <system:String x:Key=\"multi\">a&#10;b</system:String>\
                   </ResourceDictionary>";
        let format = Format::from_str(xml).unwrap();
        let entry = &format.entries[0];
        assert_eq!(entry.text, "a\nb");
        // A literal newline in the text implies preservation even without
        // the xml:space attribute.
        assert!(entry.preserve_space);
    }

    #[test]
    fn test_parse_trims_formatting_whitespace() {
        let xml = indoc! {r#"
            <ResourceDictionary>
                <system:String x:Key="wrapped">
                    Hello
                </system:String>
            </ResourceDictionary>
        "#};
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.entries[0].text, "Hello");
        assert!(!format.entries[0].preserve_space);
    }

    #[test]
    fn test_missing_key_attribute() {
        let xml = "<ResourceDictionary><system:String>No key</system:String></ResourceDictionary>";
        let result = Format::from_str(xml);
        assert!(result.is_err());
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("missing 'x:Key'"));
    }

    #[test]
    fn test_empty_input_has_no_root() {
        let format = Format::from_str("").unwrap();
        assert!(!format.has_root);
        assert!(format.entries.is_empty());

        let format = Format::from_str("   \n  ").unwrap();
        assert!(!format.has_root);
    }

    #[test]
    fn test_skeleton_round_trip() {
        let skeleton = Format::skeleton();
        let mut out = Vec::new();
        skeleton.to_writer(&mut out).unwrap();
        let out_str = String::from_utf8(out).unwrap();
        assert!(out_str.contains("xmlns=\"https://github.com/avaloniaui\""));
        assert!(out_str.contains("xmlns:x="));
        assert!(out_str.contains("xmlns:system="));

        let reparsed = Format::from_str(&out_str).unwrap();
        assert!(reparsed.has_root);
        assert!(reparsed.entries.is_empty());
    }

    #[test]
    fn test_round_trip_serialization() {
        let format = Format {
            entries: vec![
                StringEntry {
                    key: "greet".to_string(),
                    text: "Hi".to_string(),
                    preserve_space: false,
                },
                StringEntry {
                    key: "motd".to_string(),
                    text: "line one\nline two".to_string(),
                    preserve_space: true,
                },
                StringEntry {
                    key: "padded".to_string(),
                    text: " lead and trail ".to_string(),
                    preserve_space: true,
                },
            ],
            has_root: true,
        };
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let out_str = String::from_utf8(out).unwrap();
        let reparsed = Format::from_str(&out_str).unwrap();
        assert_eq!(format, reparsed);
    }

    #[test]
    fn test_writer_escapes_markup() {
        let format = Format {
            entries: vec![StringEntry {
                key: "entities".to_string(),
                text: "Use <tag> & value".to_string(),
                preserve_space: false,
            }],
            has_root: true,
        };
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let out_str = String::from_utf8(out).unwrap();
        assert!(out_str.contains("Use &lt;tag&gt; &amp; value"));

        let reparsed = Format::from_str(&out_str).unwrap();
        assert_eq!(reparsed.entries[0].text, "Use <tag> & value");
    }

    #[test]
    fn test_nested_element_inside_entry_is_error() {
        let xml = "<ResourceDictionary>\
                   <system:String x:Key=\"a\">x<b>y</b>z</system:String>\
                   </ResourceDictionary>";
        let result = Format::from_str(xml);
        assert!(result.is_err());
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("nested element"));

        let xml = "<ResourceDictionary>\
                   <system:String x:Key=\"a\">x<br/>y</system:String>\
                   </ResourceDictionary>";
        assert!(Format::from_str(xml).is_err());
    }

    #[test]
    fn test_cdata_text_is_captured() {
        let xml = "<ResourceDictionary>\
                   <system:String x:Key=\"c\"><![CDATA[a < b & c]]></system:String>\
                   </ResourceDictionary>";
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.entries[0].text, "a < b & c");
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let xml = "<ResourceDictionary><system:String x:Key=\"a\">x</wrong></ResourceDictionary>";
        assert!(Format::from_str(xml).is_err());
    }
}
