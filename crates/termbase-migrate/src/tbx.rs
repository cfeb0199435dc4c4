//! Minimal TBX (TermBase eXchange) store.
//!
//! Only what a bilingual glossary file needs: one `termEntry` per term with
//! a source and a target `langSet`, and the term context kept in the entry
//! `id`. Files written here can be opened again and appended to.

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, MigrateResult};

const DOCTYPE: &str =
    r#"martif PUBLIC "ISO 12200:1999A//DTD MARTIF core (DXFcdV04)//EN" "TBXcdv04.dtd""#;
const PRODUCER: &str = "termbase";

/// One term of a TBX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbxEntry {
    pub context: String,
    pub source: String,
    pub target: String,
}

/// A TBX file of a single source/target language pair.
#[derive(Debug)]
pub struct TbxStore {
    path: PathBuf,
    source_language: String,
    target_language: String,
    entries: Vec<TbxEntry>,
}

impl TbxStore {
    /// Write an empty TBX file, replacing whatever is at `path`.
    pub fn create_new_file(
        path: impl AsRef<Path>,
        source_language: &str,
        target_language: &str,
    ) -> MigrateResult<()> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            entries: Vec::new(),
        };
        store.save()
    }

    /// Open an existing TBX file holding `target_language` translations.
    pub fn open(path: impl AsRef<Path>, target_language: &str) -> MigrateResult<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)?;
        let (source_language, entries) = parse(&path, &content)?;
        Ok(Self {
            path,
            source_language,
            target_language: target_language.to_string(),
            entries,
        })
    }

    #[must_use]
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    #[must_use]
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    #[must_use]
    pub fn entries(&self) -> &[TbxEntry] {
        &self.entries
    }

    /// Append a term. Nothing is written until [`TbxStore::save`].
    pub fn new_unit(&mut self, context: &str, source: &str, target: &str) {
        self.entries.push(TbxEntry {
            context: context.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    /// Write the store back to its file.
    pub fn save(&self) -> MigrateResult<()> {
        let content = self.render()?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn render(&self) -> MigrateResult<Vec<u8>> {
        let mut out = TbxWriter::new(&self.path);

        out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        out.emit(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
        out.emit(Event::Start(BytesStart::new("martif").with_attributes([
            ("type", "TBX"),
            ("xml:lang", self.source_language.as_str()),
        ])))?;

        out.open("martifHeader")?;
        out.open("fileDesc")?;
        out.open("sourceDesc")?;
        out.text_element("p", PRODUCER)?;
        out.close("sourceDesc")?;
        out.close("fileDesc")?;
        out.close("martifHeader")?;

        out.open("text")?;
        out.open("body")?;
        for entry in &self.entries {
            let mut term_entry = BytesStart::new("termEntry");
            if !entry.context.is_empty() {
                term_entry.push_attribute(("id", entry.context.as_str()));
            }
            out.emit(Event::Start(term_entry))?;
            for (language, text) in [
                (self.source_language.as_str(), entry.source.as_str()),
                (self.target_language.as_str(), entry.target.as_str()),
            ] {
                out.emit(Event::Start(
                    BytesStart::new("langSet").with_attributes([("xml:lang", language)]),
                ))?;
                out.open("tig")?;
                out.text_element("term", text)?;
                out.close("tig")?;
                out.close("langSet")?;
            }
            out.close("termEntry")?;
        }
        out.close("body")?;
        out.close("text")?;
        out.close("martif")?;

        Ok(out.finish())
    }
}

/// Event writer that reports failures against the file being written.
struct TbxWriter<'p> {
    writer: Writer<Vec<u8>>,
    path: &'p Path,
}

impl<'p> TbxWriter<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            path,
        }
    }

    fn emit(&mut self, event: Event<'_>) -> MigrateResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| MigrateError::tbx(self.path, e))
    }

    fn open(&mut self, name: &str) -> MigrateResult<()> {
        self.emit(Event::Start(BytesStart::new(name)))
    }

    fn close(&mut self, name: &str) -> MigrateResult<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    /// Write `<name>text</name>`.
    ///
    /// Carriage returns are written as `&#13;` so XML readers keep them
    /// instead of normalizing line endings to LF.
    fn text_element(&mut self, name: &str, text: &str) -> MigrateResult<()> {
        self.open(name)?;
        let escaped = escape(text).replace('\r', "&#13;");
        self.emit(Event::Text(BytesText::from_escaped(escaped)))?;
        self.close(name)
    }

    fn finish(self) -> Vec<u8> {
        let mut content = self.writer.into_inner();
        content.push(b'\n');
        content
    }
}

fn attribute(path: &Path, element: &BytesStart<'_>, name: &str) -> MigrateResult<Option<String>> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| MigrateError::tbx(path, e))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|e| MigrateError::tbx(path, e))?;
    Ok(Some(value.into_owned()))
}

/// Parse a TBX document into its source language and entries.
///
/// The first `langSet` of an entry holds the source text, the second one
/// the target text.
fn parse(path: &Path, content: &str) -> MigrateResult<(String, Vec<TbxEntry>)> {
    let mut reader = Reader::from_str(content);

    let mut source_language = None;
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;
    let mut term_text: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| MigrateError::tbx(path, e))? {
            Event::Start(e) => match e.name().as_ref() {
                b"martif" => source_language = attribute(path, &e, "xml:lang")?,
                b"termEntry" => {
                    let context = attribute(path, &e, "id")?.unwrap_or_default();
                    current = Some((context, Vec::new()));
                }
                b"term" => term_text = Some(String::new()),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"term" => {
                if let Some((_, terms)) = current.as_mut() {
                    terms.push(String::new());
                }
            }
            Event::Text(e) => {
                if let Some(text) = term_text.as_mut() {
                    text.push_str(&e.unescape().map_err(|e| MigrateError::tbx(path, e))?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = term_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"term" => {
                    if let (Some(text), Some((_, terms))) = (term_text.take(), current.as_mut()) {
                        terms.push(text);
                    }
                }
                b"termEntry" => {
                    let Some((context, mut terms)) = current.take() else {
                        return Err(MigrateError::tbx(path, "unbalanced termEntry"));
                    };
                    if terms.is_empty() {
                        return Err(MigrateError::tbx(path, "termEntry without terms"));
                    }
                    let source = terms.remove(0);
                    let target = if terms.is_empty() {
                        String::new()
                    } else {
                        terms.remove(0)
                    };
                    entries.push(TbxEntry {
                        context,
                        source,
                        target,
                    });
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let source_language =
        source_language.ok_or_else(|| MigrateError::tbx(path, "missing martif element"))?;
    Ok((source_language, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_new_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fr.tbx");

        TbxStore::create_new_file(&path, "en", "fr").unwrap();
        let store = TbxStore::open(&path, "fr").unwrap();

        assert!(store.entries().is_empty());
        assert_eq!(store.source_language(), "en");
        assert_eq!(store.target_language(), "fr");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(content.contains("<!DOCTYPE martif PUBLIC"));
        assert!(content.contains(r#"<martif type="TBX" xml:lang="en">"#));
    }

    #[test]
    fn test_saved_entries_can_be_reopened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fr.tbx");
        TbxStore::create_new_file(&path, "en", "fr").unwrap();

        let mut store = TbxStore::open(&path, "fr").unwrap();
        store.new_unit("", "cat", "chat");
        store.new_unit("2", "cat", "matou");
        store.new_unit("", "", "vide");
        store.save().unwrap();

        let reopened = TbxStore::open(&path, "fr").unwrap();
        assert_eq!(reopened.entries(), store.entries());
    }

    #[test]
    fn test_context_is_entry_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("de.tbx");
        TbxStore::create_new_file(&path, "en", "de").unwrap();

        let mut store = TbxStore::open(&path, "de").unwrap();
        store.new_unit("", "cat", "Katze");
        store.new_unit("3", "cat", "Kater");
        store.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"<termEntry id="3">"#));
        assert!(content.contains("<termEntry>"));
        assert!(content.contains(r#"<langSet xml:lang="de">"#));
        assert!(content.contains("<term>Katze</term>"));
    }

    #[test]
    fn test_markup_and_whitespace_survive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cs.tbx");
        TbxStore::create_new_file(&path, "en", "cs").unwrap();

        let mut store = TbxStore::open(&path, "cs").unwrap();
        store.new_unit("a\"b", " <b>bold</b> & co ", "tučně\n");
        store.save().unwrap();

        let reopened = TbxStore::open(&path, "cs").unwrap();
        assert_eq!(
            reopened.entries(),
            &[TbxEntry {
                context: "a\"b".to_string(),
                source: " <b>bold</b> & co ".to_string(),
                target: "tučně\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_carriage_returns_written_as_character_references() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fr.tbx");
        TbxStore::create_new_file(&path, "en", "fr").unwrap();

        let mut store = TbxStore::open(&path, "fr").unwrap();
        store.new_unit("", "line1\r\nline2", "ligne1\rligne2");
        store.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\r'));
        assert!(content.contains("<term>line1&#13;\nline2</term>"));
        assert!(content.contains("<term>ligne1&#13;ligne2</term>"));

        let reopened = TbxStore::open(&path, "fr").unwrap();
        assert_eq!(reopened.entries()[0].source, "line1\r\nline2");
        assert_eq!(reopened.entries()[0].target, "ligne1\rligne2");
    }

    #[test]
    fn test_source_language_file_uses_same_language_twice() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.tbx");
        TbxStore::create_new_file(&path, "en", "en").unwrap();

        let mut store = TbxStore::open(&path, "en").unwrap();
        store.new_unit("", "colour", "color");
        store.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches(r#"<langSet xml:lang="en">"#).count(), 2);
        let reopened = TbxStore::open(&path, "en").unwrap();
        assert_eq!(reopened.entries()[0].target, "color");
    }

    #[test]
    fn test_open_rejects_non_tbx() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.tbx");
        std::fs::write(&path, "<glossary></glossary>").unwrap();

        let err = TbxStore::open(&path, "fr").unwrap_err();
        assert!(matches!(err, MigrateError::Tbx { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = TbxStore::open(dir.path().join("missing.tbx"), "fr").unwrap_err();
        assert!(matches!(err, MigrateError::Io(_)));
    }
}
