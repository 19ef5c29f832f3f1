//! NAF serialization
//!
//! Writes the text, terms, and srl layers plus a header naming the producing
//! processor once per layer. Predicate and role spans point at term ids.

use super::traits::{DocumentSink, SinkResult};
use crate::config::{ConverterConfig, ProcessorInfo};
use crate::document::{Document, Predicate, TokenId};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// NAF schema version written on the root element
pub const NAF_VERSION: &str = "v3";

/// Layers this converter produces, in header order
const LAYERS: [&str; 3] = ["text", "terms", "srl"];

type NafWriter = Writer<Vec<u8>>;

/// Stable public id for a document name
pub fn public_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("sonar2naf:{}", name).as_bytes())
}

/// Render a document as a NAF XML string
pub fn render_naf(
    document: &Document,
    processor: &ProcessorInfo,
    timestamp: DateTime<Utc>,
) -> SinkResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("NAF");
    root.push_attribute(("xml:lang", document.language()));
    root.push_attribute(("version", NAF_VERSION));
    writer.write_event(Event::Start(root))?;

    write_header(&mut writer, document, processor, timestamp)?;

    writer.write_event(Event::Start(BytesStart::new("raw")))?;
    writer.write_event(Event::Text(BytesText::new(document.raw())))?;
    writer.write_event(Event::End(BytesEnd::new("raw")))?;

    write_text_layer(&mut writer, document)?;
    write_term_layer(&mut writer, document)?;
    write_srl_layer(&mut writer, document.predicates())?;

    writer.write_event(Event::End(BytesEnd::new("NAF")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

fn write_header(
    writer: &mut NafWriter,
    document: &Document,
    processor: &ProcessorInfo,
    timestamp: DateTime<Utc>,
) -> SinkResult<()> {
    writer.write_event(Event::Start(BytesStart::new("nafHeader")))?;

    let mut file_desc = BytesStart::new("fileDesc");
    file_desc.push_attribute(("title", document.name()));
    writer.write_event(Event::Empty(file_desc))?;

    let id = public_id(document.name()).to_string();
    let mut public = BytesStart::new("public");
    public.push_attribute(("publicId", id.as_str()));
    writer.write_event(Event::Empty(public))?;

    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    for layer in LAYERS {
        let mut processors = BytesStart::new("linguisticProcessors");
        processors.push_attribute(("layer", layer));
        writer.write_event(Event::Start(processors))?;

        let mut lp = BytesStart::new("lp");
        lp.push_attribute(("name", processor.name.as_str()));
        lp.push_attribute(("version", processor.version.as_str()));
        lp.push_attribute(("timestamp", timestamp.as_str()));
        writer.write_event(Event::Empty(lp))?;

        writer.write_event(Event::End(BytesEnd::new("linguisticProcessors")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("nafHeader")))?;
    Ok(())
}

fn write_text_layer(writer: &mut NafWriter, document: &Document) -> SinkResult<()> {
    writer.write_event(Event::Start(BytesStart::new("text")))?;
    for token in document.tokens() {
        let id = token.id.to_string();
        let offset = token.offset.to_string();
        let length = token.length.to_string();
        let para = token.paragraph.to_string();
        let sent = token.sentence.to_string();

        let mut wf = BytesStart::new("wf");
        wf.push_attribute(("id", id.as_str()));
        wf.push_attribute(("offset", offset.as_str()));
        wf.push_attribute(("length", length.as_str()));
        wf.push_attribute(("para", para.as_str()));
        wf.push_attribute(("sent", sent.as_str()));
        writer.write_event(Event::Start(wf))?;
        writer.write_event(Event::Text(BytesText::new(&token.form)))?;
        writer.write_event(Event::End(BytesEnd::new("wf")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}

fn write_term_layer(writer: &mut NafWriter, document: &Document) -> SinkResult<()> {
    writer.write_event(Event::Start(BytesStart::new("terms")))?;
    for term in document.terms() {
        let id = term.id.to_string();
        let mut element = BytesStart::new("term");
        element.push_attribute(("id", id.as_str()));
        element.push_attribute(("type", term.term_type.as_str()));
        element.push_attribute(("lemma", term.lemma.as_str()));
        element.push_attribute(("pos", term.pos.as_str()));
        element.push_attribute(("morphofeat", term.morphofeat.as_str()));
        writer.write_event(Event::Start(element))?;

        writer.write_event(Event::Start(BytesStart::new("span")))?;
        let target_id = term.token.to_string();
        let mut target = BytesStart::new("target");
        target.push_attribute(("id", target_id.as_str()));
        writer.write_event(Event::Empty(target))?;
        writer.write_event(Event::End(BytesEnd::new("span")))?;

        writer.write_event(Event::End(BytesEnd::new("term")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("terms")))?;
    Ok(())
}

/// Span over term ids, marking the head target
fn write_term_span(
    writer: &mut NafWriter,
    span: &[TokenId],
    head: Option<TokenId>,
) -> SinkResult<()> {
    writer.write_event(Event::Start(BytesStart::new("span")))?;
    for &token in span {
        let id = token.term().to_string();
        let mut target = BytesStart::new("target");
        target.push_attribute(("id", id.as_str()));
        if head == Some(token) {
            target.push_attribute(("head", "yes"));
        }
        writer.write_event(Event::Empty(target))?;
    }
    writer.write_event(Event::End(BytesEnd::new("span")))?;
    Ok(())
}

fn write_srl_layer(writer: &mut NafWriter, predicates: &[Predicate]) -> SinkResult<()> {
    writer.write_event(Event::Start(BytesStart::new("srl")))?;
    for predicate in predicates {
        let id = predicate.id.to_string();
        let mut element = BytesStart::new("predicate");
        element.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Start(element))?;
        write_term_span(writer, &predicate.span, predicate.head)?;

        for role in &predicate.roles {
            let role_id = role.id.to_string();
            let mut element = BytesStart::new("role");
            element.push_attribute(("id", role_id.as_str()));
            element.push_attribute(("semRole", role.label.as_str()));
            writer.write_event(Event::Start(element))?;
            write_term_span(writer, &role.span, role.head)?;
            writer.write_event(Event::End(BytesEnd::new("role")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("predicate")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("srl")))?;
    Ok(())
}

/// Writes each document to `<dir>/<name>.<extension>`
pub struct NafDirectorySink {
    dir: PathBuf,
    extension: String,
    processor: ProcessorInfo,
}

impl NafDirectorySink {
    /// Create a sink writing into `dir`, creating it if needed
    pub fn new(dir: impl AsRef<Path>, config: &ConverterConfig) -> SinkResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            extension: config.output_extension.clone(),
            processor: config.processor.clone(),
        })
    }

    /// Path a document with this name is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }
}

impl DocumentSink for NafDirectorySink {
    fn store(&self, document: &Document) -> SinkResult<String> {
        let xml = render_naf(document, &self.processor, Utc::now())?;
        let path = self.path_for(document.name());
        let mut file = std::fs::File::create(&path)?;
        file.write_all(xml.as_bytes())?;
        debug!(document = document.name(), path = %path.display(), "NAF written");
        Ok(path.display().to_string())
    }
}
