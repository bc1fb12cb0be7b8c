//! Arena-based DOM built by html5ever.
//!
//! The whole parsed tree lives in one [`indextree::Arena`]. Nodes refer to each
//! other by [`NodeId`], so every structural question the renderers ask (who is
//! my previous sibling, what is my first child) is a read-only index lookup.
//! Strings are [`StrTendril`]s that share the source buffer where html5ever
//! allows it.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document};
use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

use crate::trace;

/// Attributes whose values HTML defines as space-separated token lists.
/// They are split at parse time so renderers see one token per entry.
const TOKEN_LIST_ATTRIBUTES: &[&str] = &[
    "class",
    "rel",
    "rev",
    "headers",
    "accept-charset",
    "accesskey",
    "dropzone",
];

/// Ordered attribute map. Insertion order is the order in the source HTML.
pub type Attributes = IndexMap<String, AttrValue>;

/// Token list of a multi-valued attribute.
pub type Tokens = SmallVec<[StrTendril; 4]>;

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes live here
    pub arena: Arena<NodeKind>,

    /// Invisible document node, parent of the root element
    pub document: NodeId,

    /// Root element (`<html>` for anything html5ever parses)
    pub root: NodeId,

    /// DOCTYPE name if present. Recorded, never rendered.
    pub doctype: Option<StrTendril>,
}

impl Document {
    /// Get the node stored at `id`.
    pub fn get(&self, id: NodeId) -> &NodeKind {
        self.arena[id].get()
    }

    /// Get the element data at `id`, if that node is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id) {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Iterate children of a node in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.child_element(self.root, "body")
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.child_element(self.root, "head")
    }

    fn child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&id| self.element(id).is_some_and(|elem| elem.tag() == tag))
    }

    /// True when neither neighbour of `id` touches it with whitespace.
    ///
    /// The previous sibling counts when it is text (or a comment) ending in
    /// whitespace, the next sibling when it starts with whitespace. Missing
    /// siblings and element siblings never count.
    pub fn is_outer_nospace(&self, id: NodeId) -> bool {
        let node = &self.arena[id];
        let before = node
            .previous_sibling()
            .is_some_and(|prev| self.ends_with_whitespace(prev));
        let after = node
            .next_sibling()
            .is_some_and(|next| self.starts_with_whitespace(next));
        !before && !after
    }

    /// True when the content of `id` does not start or end with whitespace.
    ///
    /// An element without children is trivially inner-nospace.
    pub fn is_inner_nospace(&self, id: NodeId) -> bool {
        let node = &self.arena[id];
        let first = node
            .first_child()
            .is_some_and(|first| self.starts_with_whitespace(first));
        let last = node
            .last_child()
            .is_some_and(|last| self.ends_with_whitespace(last));
        !first && !last
    }

    fn starts_with_whitespace(&self, id: NodeId) -> bool {
        self.get(id)
            .character_data()
            .and_then(|text| text.chars().next())
            .is_some_and(char::is_whitespace)
    }

    fn ends_with_whitespace(&self, id: NodeId) -> bool {
        self.get(id)
            .character_data()
            .and_then(|text| text.chars().next_back())
            .is_some_and(char::is_whitespace)
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

impl NodeKind {
    /// Raw string of a text or comment node.
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeKind::Text(text) | NodeKind::Comment(text) => Some(&**text),
            _ => None,
        }
    }
}

/// Element data (qualified name + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Qualified name as html5ever produced it
    pub name: QualName,

    /// Attributes in source order
    pub attrs: Attributes,
}

impl ElementData {
    /// Local tag name (`div`, `span`, ...).
    pub fn tag(&self) -> &str {
        &self.name.local
    }
}

/// An attribute value: either one string or a list of whitespace-split tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Plain value, kept verbatim
    Text(StrTendril),
    /// Token list (`class`, `rel`, ...), no empty tokens
    Tokens(Tokens),
}

impl AttrValue {
    /// Split `value` on ASCII whitespace into a token list.
    pub fn split(value: &StrTendril) -> Self {
        AttrValue::Tokens(split_tokens(value))
    }

    /// The value as tokens. A plain value is split on ASCII whitespace.
    pub fn tokens(&self) -> Tokens {
        match self {
            AttrValue::Text(text) => split_tokens(text),
            AttrValue::Tokens(tokens) => tokens.clone(),
        }
    }

    /// The value as one string; token lists are joined with single spaces.
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            AttrValue::Text(text) => Cow::Borrowed(&**text),
            AttrValue::Tokens(tokens) => match tokens.as_slice() {
                [single] => Cow::Borrowed(&**single),
                _ => Cow::Owned(
                    tokens
                        .iter()
                        .map(|token| &**token)
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
            },
        }
    }
}

/// Split `value` on ASCII whitespace. Tokens share the buffer of `value`.
pub fn split_tokens(value: &StrTendril) -> Tokens {
    let text: &str = value;
    let mut tokens = Tokens::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_ascii_whitespace() {
            if let Some(begin) = start.take() {
                tokens.push(value.subtendril(begin as u32, (idx - begin) as u32));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(begin) = start {
        tokens.push(value.subtendril(begin as u32, (text.len() - begin) as u32));
    }
    tokens
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(StrTendril::from(value))
    }
}

/// Parse HTML into an arena-based [`Document`].
///
/// html5ever recovers from every parse error, so this never fails. The result
/// always has an `<html>` root with `<head>` and `<body>` children.
pub fn parse(html: &str) -> Document {
    let sink = ArenaSink::new();
    let tendril = StrTendril::from(html);
    parse_document(sink, Default::default()).one(tendril)
}

/// Owned element name handed back to html5ever
#[derive(Debug, Clone)]
pub(crate) struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation filling the arena
struct ArenaSink {
    arena: RefCell<Arena<NodeKind>>,

    /// Document node (parent of `<html>`)
    document: NodeId,

    doctype: RefCell<Option<StrTendril>>,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeKind::Document);

        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }

    fn new_text(&self, text: StrTendril) -> NodeId {
        self.arena.borrow_mut().new_node(NodeKind::Text(text))
    }
}

/// Attribute key, keeping the namespace prefix (`xlink:href`).
fn attr_key(attr: &Attribute) -> String {
    match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", &**prefix, &*attr.name.local),
        None => attr.name.local.to_string(),
    }
}

fn attr_value(key: &str, value: StrTendril) -> AttrValue {
    if TOKEN_LIST_ATTRIBUTES.contains(&key) {
        AttrValue::split(&value)
    } else {
        AttrValue::Text(value)
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let arena = self.arena.into_inner();

        let root = self
            .document
            .children(&arena)
            .find(|&id| matches!(arena[id].get(), NodeKind::Element(_)))
            .unwrap_or(self.document);

        Document {
            arena,
            document: self.document,
            root,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        match arena[*target].get() {
            NodeKind::Element(elem) => OwnedElemName(elem.name.clone()),
            _ => OwnedElemName(QualName::new(
                None,
                Namespace::from("http://www.w3.org/1999/xhtml"),
                LocalName::from(""),
            )),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut attr_map = Attributes::with_capacity(attrs.len());
        for attr in attrs {
            let key = attr_key(&attr);
            if !attr_map.contains_key(&key) {
                let value = attr_value(&key, attr.value);
                attr_map.insert(key, value);
            }
        }

        trace!("create_element <{}> with {} attrs", &*name.local, attr_map.len());
        self.arena
            .borrow_mut()
            .new_node(NodeKind::Element(ElementData {
                name,
                attrs: attr_map,
            }))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(NodeKind::Comment(text))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.arena
            .borrow_mut()
            .new_node(NodeKind::Comment(StrTendril::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut *self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => {
                let mut arena = self.arena.borrow_mut();
                if let Some(last_child) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = arena[last_child].get_mut()
                {
                    existing.push_tendril(&text);
                    return;
                }
                let text_node = arena.new_node(NodeKind::Text(text));
                parent.append(text_node, &mut *arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                {
                    let mut arena = self.arena.borrow_mut();
                    if let Some(prev) = arena[*sibling].previous_sibling()
                        && let NodeKind::Text(existing) = arena[prev].get_mut()
                    {
                        existing.push_tendril(&text);
                        return;
                    }
                }
                self.new_text(text)
            }
        };
        sibling.insert_before(node, &mut *self.arena.borrow_mut());
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept as ordinary children
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = arena[*target].get_mut() {
            for attr in attrs {
                let key = attr_key(&attr);
                if !elem.attrs.contains_key(&key) {
                    let value = attr_value(&key, attr.value);
                    elem.attrs.insert(key, value);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut *self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&*arena).collect();
        for child in children {
            child.detach(&mut *arena);
            new_parent.append(child, &mut *arena);
        }
    }
}
