// Lightweight element tree for the site's markup.
// Lenient parser for trusted static pages: just enough HTML to query and
// mutate the attributes, classes and inline styles the behavior layer touches.
// Malformed input degrades to a best-effort tree, never an error.

/// Index of a node inside the document arena.
pub type NodeId = usize;

/// Tags that never carry children and have no closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags whose content is raw text up to the matching close tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One element: tag name, attributes in source order, child node ids.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<NodeId>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attribute value by name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets or replaces an attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|p| p == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let merged = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", &merged);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(existing) = self.attr("class") {
            let kept: Vec<&str> = existing.split_whitespace().filter(|p| *p != class).collect();
            let joined = kept.join(" ");
            self.set_attr("class", &joined);
        }
    }

    /// Value of one inline style property, if declared.
    pub fn style(&self, property: &str) -> Option<String> {
        let raw = self.attr("style")?;
        raw.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            if name.trim().eq_ignore_ascii_case(property) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }

    /// Sets an inline style property. An empty value removes the declaration,
    /// mirroring `el.style.x = ''`.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut decls: Vec<(String, String)> = self
            .attr("style")
            .map(|raw| {
                raw.split(';')
                    .filter_map(|decl| {
                        let (name, val) = decl.split_once(':')?;
                        Some((name.trim().to_string(), val.trim().to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        decls.retain(|(name, _)| !name.eq_ignore_ascii_case(property));
        if !value.is_empty() {
            decls.push((property.to_string(), value.to_string()));
        }
        if decls.is_empty() {
            self.remove_attr("style");
        } else {
            let joined = decls
                .iter()
                .map(|(n, v)| format!("{}:{}", n, v))
                .collect::<Vec<_>>()
                .join(";");
            self.set_attr("style", &joined);
        }
    }
}

/// The parsed page: an arena of nodes plus the top-level node ids.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Document {
    /// Parses trusted markup into a tree. Never fails; unknown or unbalanced
    /// constructs are absorbed leniently.
    pub fn parse(input: &str) -> Self {
        let mut doc = Document::default();
        let roots = Parser::new(input).run(&mut doc);
        doc.roots = roots;
        doc
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// All element ids, in document order.
    fn all_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|id| matches!(self.nodes[*id], Node::Element(_)))
    }

    /// First element with the given `id` attribute.
    pub fn by_id(&self, id_value: &str) -> Option<NodeId> {
        self.all_elements()
            .find(|id| self.element(*id).and_then(|el| el.attr("id")) == Some(id_value))
    }

    /// First element with the given tag name.
    pub fn by_tag(&self, tag: &str) -> Option<NodeId> {
        self.all_elements()
            .find(|id| self.element(*id).map(|el| el.tag == tag).unwrap_or(false))
    }

    /// Element ids matching a predicate, in document order.
    pub fn select<F: Fn(&Element) -> bool>(&self, pred: F) -> Vec<NodeId> {
        self.all_elements()
            .filter(|id| self.element(*id).map(&pred).unwrap_or(false))
            .collect()
    }

    /// Elements carrying the given attribute.
    pub fn with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.select(|el| el.attr(name).is_some())
    }

    /// Elements carrying the given class.
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.select(|el| el.has_class(class))
    }

    /// First descendant of `id` matching the predicate, depth-first.
    pub fn find_descendant<F: Fn(&Element) -> bool>(&self, id: NodeId, pred: F) -> Option<NodeId> {
        fn walk(doc: &Document, id: NodeId, pred: &dyn Fn(&Element) -> bool) -> Option<NodeId> {
            let el = doc.element(id)?;
            for child in &el.children {
                if let Some(child_el) = doc.element(*child) {
                    if pred(child_el) {
                        return Some(*child);
                    }
                    if let Some(found) = walk(doc, *child, pred) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(self, id, &pred)
    }

    /// Replaces the children of `id` with a single text node. Markup in the
    /// value is neutralized by escaping it at assignment, so it is never
    /// interpreted; `text_content` returns the stored, entity-encoded form.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let node = self.push(Node::Text(escape_html(text)));
        if let Some(el) = self.element_mut(id) {
            el.children = vec![node];
        }
    }

    /// Replaces the children of `id` with parsed markup (innerHTML semantics,
    /// trusted source).
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        let fragment = Document::parse(html);
        let mut adopted = Vec::new();
        for root in fragment.roots.clone() {
            adopted.push(self.adopt(&fragment, root));
        }
        if let Some(el) = self.element_mut(id) {
            el.children = adopted;
        }
    }

    /// Copies a node (and its subtree) from another document into this arena.
    fn adopt(&mut self, other: &Document, id: NodeId) -> NodeId {
        match &other.nodes[id] {
            Node::Text(text) => self.push(Node::Text(text.clone())),
            Node::Element(el) => {
                let children: Vec<NodeId> = el
                    .children
                    .iter()
                    .map(|child| self.adopt(other, *child))
                    .collect();
                let mut copy = el.clone();
                copy.children = children;
                self.push(Node::Element(copy))
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id] {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in el.children.clone() {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Serializes the whole document back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.write_node(*root, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id] {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in &el.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

/// Minimal HTML text escape for text-node assignment.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Single-pass lenient tokenizer building the arena through a stack of open
/// elements.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn run(mut self, doc: &mut Document) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = Vec::new();
        // Stack of (node id, tag) for open elements.
        let mut stack: Vec<(NodeId, String)> = Vec::new();

        while self.pos < self.input.len() {
            if self.rest().starts_with("<!--") {
                self.skip_comment();
            } else if self.rest().starts_with("<!") {
                self.take_declaration(doc, &mut roots, &mut stack);
            } else if self.rest().starts_with("</") {
                self.close_tag(&mut stack);
            } else if self.rest().starts_with('<') && self.looks_like_tag() {
                self.open_tag(doc, &mut roots, &mut stack);
            } else {
                self.take_text(doc, &mut roots, &mut stack);
            }
        }
        roots
    }

    fn attach(doc: &mut Document, roots: &mut Vec<NodeId>, stack: &[(NodeId, String)], id: NodeId) {
        match stack.last() {
            Some((parent, _)) => {
                if let Some(el) = doc.element_mut(*parent) {
                    el.children.push(id);
                }
            }
            None => roots.push(id),
        }
    }

    fn looks_like_tag(&self) -> bool {
        self.rest()[1..]
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
    }

    fn skip_comment(&mut self) {
        match self.rest().find("-->") {
            Some(end) => self.pos += end + 3,
            None => self.pos = self.input.len(),
        }
    }

    /// Doctype and similar declarations are kept verbatim as text so the
    /// document round-trips.
    fn take_declaration(
        &mut self,
        doc: &mut Document,
        roots: &mut Vec<NodeId>,
        stack: &mut [(NodeId, String)],
    ) {
        let end = self.rest().find('>').map(|p| p + 1).unwrap_or(self.rest().len());
        let raw = &self.rest()[..end];
        let id = doc.push(Node::Text(raw.to_string()));
        Self::attach(doc, roots, stack, id);
        self.pos += end;
    }

    fn close_tag(&mut self, stack: &mut Vec<(NodeId, String)>) {
        let end = self.rest().find('>').map(|p| p + 1).unwrap_or(self.rest().len());
        let name = self
            .rest()
            .get(2..end.saturating_sub(1))
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.pos += end;
        // Pop to the matching open element; a stray close tag is ignored.
        if let Some(at) = stack.iter().rposition(|(_, tag)| *tag == name) {
            stack.truncate(at);
        }
    }

    fn open_tag(
        &mut self,
        doc: &mut Document,
        roots: &mut Vec<NodeId>,
        stack: &mut Vec<(NodeId, String)>,
    ) {
        let end = match tag_end(self.rest()) {
            Some(p) => p,
            None => {
                self.pos = self.input.len();
                return;
            }
        };
        let inner = &self.rest()[1..end];
        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');
        let mut chars = inner.char_indices();
        let name_end = chars
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(inner.len());
        let tag = inner[..name_end].to_ascii_lowercase();
        let mut element = Element::new(tag.clone());
        parse_attrs(&inner[name_end..], &mut element);
        self.pos += end + 1;

        let id = doc.push(Node::Element(element));
        Self::attach(doc, roots, stack, id);

        if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            let close = format!("</{}", tag);
            let raw_end = self.rest().to_ascii_lowercase().find(&close);
            let raw_len = raw_end.unwrap_or(self.rest().len());
            if raw_len > 0 {
                let text = doc.push(Node::Text(self.rest()[..raw_len].to_string()));
                if let Some(el) = doc.element_mut(id) {
                    el.children.push(text);
                }
            }
            self.pos += raw_len;
            if raw_end.is_some() {
                let rest_end = self.rest().find('>').map(|p| p + 1).unwrap_or(0);
                self.pos += rest_end;
            }
            return;
        }

        if !self_closing && !VOID_TAGS.contains(&tag.as_str()) {
            stack.push((id, tag));
        }
    }

    fn take_text(&mut self, doc: &mut Document, roots: &mut Vec<NodeId>, stack: &mut [(NodeId, String)]) {
        // Skip the first char (it may be a `<` that did not open a tag) on
        // char boundaries; a leading multibyte char must not split.
        let rest = self.rest();
        let next_tag = rest
            .char_indices()
            .find(|&(i, c)| i > 0 && c == '<')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let text = &rest[..next_tag];
        if !text.is_empty() {
            let id = doc.push(Node::Text(text.to_string()));
            Self::attach(doc, roots, stack, id);
        }
        self.pos += next_tag;
    }
}

/// Position of the `>` closing an open tag, skipping quoted attribute values
/// (which may legally contain `>`).
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in rest.bytes().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Parses the attribute section of an open tag.
fn parse_attrs(input: &str, element: &mut Element) {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        let name = input[name_start..i].to_ascii_lowercase();
        if name.is_empty() {
            break;
        }
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                let value = &input[value_start..i];
                if i < bytes.len() {
                    i += 1;
                }
                value
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &input[value_start..i]
            };
            element.set_attr(&name, value);
        } else {
            // Bare boolean attribute
            element.set_attr(&name, "");
        }
    }
}
