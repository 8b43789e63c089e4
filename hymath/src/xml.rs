//! XML rendering of OpenMath trees.
//!
//! Role
//! - Convert a tree into an annotated `pretty::RcDoc` following the OpenMath XML
//!   encoding (`OMI`, `OMF`, `OMSTR`, `OMS`, `OMV`, `OMA`, `OMBIND`, `OME`).
//! - Render it with colors on terminals (TTY-aware) or as a plain string.
//!
//! Every child element sits on its own line, indented two spaces below its parent,
//! whatever the width. Attributes are not rendered. Byte arrays, and bindings or errors
//! missing their head or body, have no XML form here and are refused.
//!
//! ```
//! use hymath::arena::OmArena;
//!
//! let mut arena = OmArena::new();
//! let e = arena.simple_decode("arith1.plus(x,'a<b')").unwrap();
//! assert_eq!(
//!     arena.xml_string(e).unwrap(),
//!     "<OMA>\n  <OMS cd=\"arith1\" name=\"plus\"/>\n  <OMV name=\"x\"/>\n  <OMSTR>a&lt;b</OMSTR>\n</OMA>"
//! );
//! ```
use std::io::{self, Write};

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::arena::OmArena;
use crate::error::{OmError, OmResult};
use crate::node::{NodeId, NodeKind};

/// Styles used to annotate parts of the XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bracket, // <, >, />, </
    Tag,
    Attribute,
    /// Quoted attribute values.
    Value,
    Text, // element content
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Bracket => {
                s.set_dimmed(true);
            }
            Style::Tag => {
                s.set_fg(Some(Color::Blue)).set_bold(true);
            }
            Style::Attribute => {
                s.set_fg(Some(Color::Cyan));
            }
            Style::Value => {
                s.set_fg(Some(Color::Green));
            }
            Style::Text => {
                s.set_fg(Some(Color::Yellow));
            }
        }
        s
    }
}

type Doc = RcDoc<'static, Style>;

fn styled(style: Style, s: impl Into<String>) -> Doc {
    RcDoc::text(s.into()).annotate(style)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

fn open_tag(tag: &'static str, attributes: &[(&'static str, String)], empty: bool) -> Doc {
    let mut doc = styled(Style::Bracket, "<").append(styled(Style::Tag, tag));
    for (name, value) in attributes {
        doc = doc
            .append(RcDoc::space())
            .append(styled(Style::Attribute, *name))
            .append(styled(Style::Bracket, "="))
            .append(styled(Style::Value, format!("\"{value}\"")));
    }
    doc.append(styled(Style::Bracket, if empty { "/>" } else { ">" }))
}

fn close_tag(tag: &'static str) -> Doc {
    styled(Style::Bracket, "</")
        .append(styled(Style::Tag, tag))
        .append(styled(Style::Bracket, ">"))
}

fn empty_element(tag: &'static str, attributes: &[(&'static str, String)]) -> Doc {
    open_tag(tag, attributes, true)
}

fn text_element(tag: &'static str, text: String) -> Doc {
    open_tag(tag, &[], false)
        .append(styled(Style::Text, text))
        .append(close_tag(tag))
}

/// `<tag>` then each child on its own indented line, then `</tag>`.
fn block_element(tag: &'static str, children: Vec<Doc>) -> Doc {
    open_tag(tag, &[], false)
        .append(
            RcDoc::hardline()
                .append(RcDoc::intersperse(children, RcDoc::hardline()))
                .nest(2),
        )
        .append(RcDoc::hardline())
        .append(close_tag(tag))
}

impl OmArena {
    fn refuse_xml(&self, id: NodeId) -> OmError {
        OmError::OperationRefused(format!(
            "Cannot convert this to XML: {}",
            self.simple_encode(id)
        ))
    }

    fn xml_slot(&self, slot: Option<NodeId>, owner: NodeId) -> OmResult<Doc> {
        match slot {
            Some(id) => self.xml_doc(id),
            None => Err(self.refuse_xml(owner)),
        }
    }

    fn xml_docs(&self, ids: &[NodeId]) -> OmResult<Vec<Doc>> {
        ids.iter().map(|&id| self.xml_doc(id)).collect()
    }

    /// Build the annotated XML document for the tree rooted at `id`.
    pub fn xml_doc(&self, id: NodeId) -> OmResult<Doc> {
        let Some(kind) = self.kind(id) else {
            return Err(self.refuse_xml(id));
        };
        Ok(match kind {
            NodeKind::Integer(value) => text_element("OMI", value.to_string()),
            NodeKind::Float(value) => empty_element("OMF", &[("dec", value.to_string())]),
            NodeKind::String(value) => text_element("OMSTR", escape_text(value)),
            NodeKind::Symbol(symbol) => empty_element(
                "OMS",
                &[("cd", symbol.cd().to_owned()), ("name", symbol.name().to_owned())],
            ),
            NodeKind::Variable(name) => empty_element("OMV", &[("name", name.clone())]),
            NodeKind::Application(children) => block_element("OMA", self.xml_docs(children)?),
            NodeKind::Binding {
                symbol,
                variables,
                body,
            } => {
                let vars = open_tag("OMBVAR", &[], false)
                    .append(RcDoc::concat(self.xml_docs(variables)?))
                    .append(close_tag("OMBVAR"));
                block_element(
                    "OMBIND",
                    vec![
                        self.xml_slot(*symbol, id)?,
                        vars,
                        self.xml_slot(*body, id)?,
                    ],
                )
            }
            NodeKind::Error { symbol, children } => {
                let mut docs = vec![self.xml_slot(*symbol, id)?];
                docs.extend(self.xml_docs(children)?);
                block_element("OME", docs)
            }
            NodeKind::ByteArray(_) => return Err(self.refuse_xml(id)),
        })
    }

    /// XML text without colors.
    pub fn xml_string(&self, id: NodeId) -> OmResult<String> {
        let mut buf = String::new();
        // Writing into a String cannot fail.
        let _ = self.xml_doc(id)?.render_fmt(80, &mut buf);
        Ok(buf)
    }

    /// Render the XML of `id` to any termcolor writer at the given width.
    pub fn xml_render_to<W: WriteColor + Write>(
        &self,
        id: NodeId,
        width: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let doc = self.xml_doc(id).map_err(io::Error::other)?;
        render_to(&doc, width, out)
    }

    /// Print the XML of `id` to stdout, with colors when supported, at terminal width.
    pub fn xml_print(&self, id: NodeId) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.xml_render_to(id, terminal_width(), &mut stdout)?;
        writeln!(stdout)
    }
}

// Maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

fn render_to<W: WriteColor + Write>(doc: &Doc, width: usize, out: &mut W) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}
