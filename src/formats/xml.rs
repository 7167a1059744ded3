//! Minimal XML tree for read-modify-write of application config documents
//!
//! Built on quick-xml events. Text and attribute values are stored exactly as
//! they appear in the file (still escaped), and comments, processing
//! instructions and whitespace are kept as nodes, so writing back an
//! untouched document reproduces it and editing one leaf leaves every other
//! element and attribute alone.

use anyhow::{bail, Context, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Raw (escaped) character data
    Text(String),
    /// Declaration, comment, CDATA, processing instruction or doctype
    Other(Event<'static>),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    /// Raw (escaped) attribute values in document order
    attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    self_closing: bool,
}

/// One step of an element path: a tag name plus an optional attribute that
/// must match. The attribute is also set when the step creates an element.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub name: &'a str,
    pub attr: Option<(&'a str, &'a str)>,
}

impl<'a> Step<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self { name, attr: None }
    }

    pub const fn with(self, key: &'a str, value: &'a str) -> Self {
        Self {
            attr: Some((key, value)),
            ..self
        }
    }

    fn matches(&self, element: &Element) -> bool {
        element.name == self.name
            && self
                .attr
                .is_none_or(|(key, value)| element.attr(key).as_deref() == Some(value))
    }

    fn create(&self) -> Element {
        let mut element = Element::new(self.name);
        if let Some((key, value)) = self.attr {
            element.set_attr(key, value);
        }
        element
    }
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    fn from_start(start: &BytesStart<'_>, self_closing: bool) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .context("Element name is not UTF-8")?
            .to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.with_context(|| format!("Malformed attribute on <{name}>"))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .context("Attribute name is not UTF-8")?
                .to_string();
            let value = std::str::from_utf8(&attr.value)
                .context("Attribute value is not UTF-8")?
                .to_string();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    /// Unescaped attribute value
    pub fn attr(&self, key: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, raw)| unescape_lossy(raw))
    }

    pub fn set_attr(&mut self, key: &str, value: &str) {
        let raw = escape(value).into_owned();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = raw,
            None => self.attributes.push((key.to_string(), raw)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn find(&self, step: &Step<'_>) -> Option<&Element> {
        self.elements().find(|element| step.matches(element))
    }

    /// First matching child, created at the end of the child list if missing
    pub fn find_or_insert(&mut self, step: &Step<'_>) -> &mut Element {
        self.find_or_insert_with(|element| step.matches(element), || step.create())
    }

    /// First child satisfying `pred`, or the result of `create` appended
    pub fn find_or_insert_with(
        &mut self,
        pred: impl Fn(&Element) -> bool,
        create: impl FnOnce() -> Element,
    ) -> &mut Element {
        let found = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(element) if pred(element)));
        let idx = match found {
            Some(idx) => idx,
            None => self.append_child(create()),
        };
        match &mut self.children[idx] {
            Node::Element(element) => element,
            _ => unreachable!("child {idx} is not an element"),
        }
    }

    pub fn path(&self, steps: &[Step<'_>]) -> Option<&Element> {
        steps
            .iter()
            .try_fold(self, |element, step| element.find(step))
    }

    pub fn path_or_insert(&mut self, steps: &[Step<'_>]) -> &mut Element {
        let mut element = self;
        for step in steps {
            element = element.find_or_insert(step);
        }
        element
    }

    /// Concatenated, unescaped character data; `None` when there is none
    pub fn text(&self) -> Option<String> {
        let raw: String = self
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(raw) => Some(raw.as_str()),
                _ => None,
            })
            .collect();
        let text = unescape_lossy(&raw);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Replace all character data with `value`
    pub fn set_text(&mut self, value: &str) {
        let raw = escape(value).into_owned();
        if self.text_raw() == Some(raw.as_str()) {
            return;
        }
        self.children.retain(|node| !matches!(node, Node::Text(_)));
        self.children.push(Node::Text(raw));
        self.self_closing = false;
    }

    fn text_raw(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(raw)] => Some(raw),
            _ => None,
        }
    }

    /// Append an element, copying the indentation used by its siblings.
    /// Returns the index of the new child.
    fn append_child(&mut self, child: Element) -> usize {
        self.self_closing = false;
        let item_indent = self.children.windows(2).find_map(|pair| match pair {
            [Node::Text(ws), Node::Element(_)] if is_whitespace(ws) => Some(ws.clone()),
            _ => None,
        });
        let closing_ws = matches!(self.children.last(), Some(Node::Text(ws)) if is_whitespace(ws));

        match item_indent {
            Some(indent) if closing_ws => {
                let at = self.children.len() - 1;
                self.children.insert(at, Node::Element(child));
                self.children.insert(at, Node::Text(indent));
                at + 1
            }
            _ => {
                self.children.push(Node::Element(child));
                self.children.len() - 1
            }
        }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, raw) in &self.attributes {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Borrowed(raw.as_bytes()),
            });
        }
        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn is_whitespace(raw: &str) -> bool {
    raw.chars().all(char::is_whitespace)
}

fn unescape_lossy(raw: &str) -> String {
    unescape(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) => element.write(writer)?,
        Node::Text(raw) => writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?,
        Node::Other(event) => writer.write_event(event)?,
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    prolog: Vec<Node>,
    pub root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    /// Fresh document with an XML declaration and namespace declarations on
    /// the root
    pub fn new(root: &str, namespaces: &[(&str, &str)]) -> Self {
        let mut element = Element::new(root);
        for (key, value) in namespaces {
            element.set_attr(key, value);
        }
        Self {
            prolog: vec![
                Node::Other(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))),
                Node::Text("\n".to_string()),
            ],
            root: element,
            epilog: vec![Node::Text("\n".to_string())],
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(false);

        let mut tree = TreeBuilder::default();
        loop {
            let event = reader
                .read_event()
                .with_context(|| format!("XML parse error at byte {}", reader.buffer_position()))?;
            match event {
                Event::Start(start) => tree.stack.push(Element::from_start(&start, false)?),
                Event::Empty(start) => tree.attach(Node::Element(Element::from_start(&start, true)?))?,
                Event::End(_) => {
                    let element = tree.stack.pop().context("Unbalanced end tag")?;
                    tree.attach(Node::Element(element))?;
                }
                Event::Text(text) => {
                    let raw = std::str::from_utf8(&text).context("Text is not UTF-8")?;
                    tree.attach(Node::Text(raw.to_string()))?;
                }
                Event::Eof => break,
                other => tree.attach(Node::Other(other.into_owned()))?,
            }
        }

        if let Some(open) = tree.stack.last() {
            bail!("Unclosed element <{}>", open.name);
        }
        let root = tree.root.context("Document has no root element")?;
        Ok(Self {
            prolog: tree.prolog,
            root,
            epilog: tree.epilog,
        })
    }

    /// Parse a file; missing or malformed files yield `None`
    pub fn load(path: &Path) -> Option<Self> {
        let text = fs::read_to_string(path)
            .inspect_err(|e| debug!(path = %path.display(), error = %e, "XML file not readable"))
            .ok()?;
        Self::parse(&text)
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "Ignoring malformed XML file"))
            .ok()
    }

    /// Load the first readable source whose root element is `root`, or start a
    /// fresh document. Either way the root carries `namespaces` afterwards.
    pub fn load_or_new<P: AsRef<Path>>(
        sources: impl IntoIterator<Item = P>,
        root: &str,
        namespaces: &[(&str, &str)],
    ) -> Self {
        let loaded = sources
            .into_iter()
            .find(|path| path.as_ref().is_file())
            .and_then(|path| Self::load(path.as_ref()))
            .filter(|doc| {
                let matches = doc.root.name == root;
                if !matches {
                    warn!(expected = root, found = %doc.root.name, "Unexpected XML root element, starting fresh");
                }
                matches
            });

        match loaded {
            Some(mut doc) => {
                for (key, value) in namespaces {
                    if doc.root.attr(key).is_none() {
                        doc.root.set_attr(key, value);
                    }
                }
                doc
            }
            None => Self::new(root, namespaces),
        }
    }

    /// Text of the element at `steps` below the root
    pub fn get(&self, steps: &[Step<'_>]) -> Option<String> {
        self.root.path(steps)?.text()
    }

    /// Set the text of the element at `steps`, creating the path as needed
    pub fn set(&mut self, steps: &[Step<'_>], value: &str) {
        self.root.path_or_insert(steps).set_text(value);
    }

    pub fn to_text(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        self.root.write(&mut writer)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        String::from_utf8(writer.into_inner()).context("Serialized XML is not UTF-8")
    }

    /// Write the whole document, creating parent directories. Returns false
    /// when the file already had this content.
    pub fn save(&self, path: &Path) -> Result<bool> {
        super::write_if_changed(path, &self.to_text()?)
            .with_context(|| format!("Failed to save XML file {}", path.display()))
    }
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
    prolog: Vec<Node>,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) -> Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    bail!("Multiple root elements (second is <{}>)", element.name);
                }
                self.root = Some(element);
            }
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }
}
