//! Tolerant HTML fragment parser and serializer.
//!
//! Handles the markup the page shells and components use: elements with
//! quoted/unquoted/bare attributes, void elements, comments, a doctype and
//! raw-text `script`/`style`. Stray end tags are ignored and unclosed
//! elements are closed at the end of input.

use crate::document::{Document, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    /// Consumes through `end`, returning what came before it (or the rest of input).
    fn take_until(&mut self, end: &str) -> &'a str {
        match self.rest().find(end) {
            Some(i) => {
                let s = &self.rest()[..i];
                self.pos += i + end.len();
                s
            }
            None => {
                let s = self.rest();
                self.pos = self.src.len();
                s
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && c != '>' && c != '/' && c != '=' && c != '<'
}

/// Parses `html` and appends the resulting nodes to `parent`.
pub fn parse_into(doc: &mut Document, parent: NodeId, html: &str) {
    let mut cur = Cursor { src: html, pos: 0 };
    // open elements; the bottom entry is `parent` itself
    let mut stack: Vec<(NodeId, String)> = vec![(parent, String::new())];

    while !cur.eof() {
        let top = stack.last().map(|(n, _)| *n).unwrap_or(parent);
        let rest = cur.rest();

        if cur.eat("<!--") {
            let body = cur.take_until("-->");
            let c = doc.create_comment(body);
            doc.append_child(top, c);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            let decl = cur.take_until(">");
            if decl.to_ascii_lowercase().contains("doctype") {
                doc.doctype = true;
            }
        } else if rest.starts_with("</") {
            cur.pos += 2;
            let name = cur.eat_while(is_name_char).to_ascii_lowercase();
            cur.take_until(">");
            if let Some(idx) = stack.iter().rposition(|(_, t)| *t == name) {
                if idx > 0 {
                    stack.truncate(idx);
                }
            }
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            cur.pos += 1;
            let tag = cur.eat_while(is_name_char).to_ascii_lowercase();
            let el = doc.create_element(&tag);
            let self_closing = parse_attributes(&mut cur, doc, el);
            doc.append_child(top, el);
            if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) && !self_closing {
                let body = take_raw_text(&mut cur, &tag);
                if !body.is_empty() {
                    let t = doc.create_text(body);
                    doc.append_child(el, t);
                }
            } else if !self_closing && !is_void(&tag) {
                stack.push((el, tag));
            }
        } else {
            let start = cur.pos;
            cur.bump();
            cur.eat_while(|c| c != '<');
            let text = decode_entities(&html[start..cur.pos]);
            let t = doc.create_text(&text);
            doc.append_child(top, t);
        }
    }
}

/// Reads attributes up to and including the closing `>`; returns true for `/>`.
fn parse_attributes(cur: &mut Cursor<'_>, doc: &mut Document, el: NodeId) -> bool {
    loop {
        cur.eat_while(char::is_whitespace);
        if cur.eof() || cur.eat(">") {
            return false;
        }
        if cur.eat("/>") {
            return true;
        }
        if cur.eat("/") {
            continue;
        }
        let name = cur.eat_while(is_name_char).to_ascii_lowercase();
        if name.is_empty() {
            // junk like a stray '=' or '<'
            cur.bump();
            continue;
        }
        cur.eat_while(char::is_whitespace);
        let value = if cur.eat("=") {
            cur.eat_while(char::is_whitespace);
            match cur.peek() {
                Some(q @ ('"' | '\'')) => {
                    cur.bump();
                    let mut end = String::new();
                    end.push(q);
                    decode_entities(cur.take_until(&end))
                }
                _ => decode_entities(cur.eat_while(|c| !c.is_whitespace() && c != '>')),
            }
        } else {
            String::new()
        };
        if !doc.has_attr(el, &name) {
            doc.set_attr(el, &name, &value);
        }
    }
}

fn take_raw_text<'a>(cur: &mut Cursor<'a>, tag: &str) -> &'a str {
    let close = format!("</{}", tag);
    let lower = cur.rest().to_ascii_lowercase();
    match lower.find(&close) {
        Some(i) => {
            let body = &cur.rest()[..i];
            cur.pos += i;
            cur.take_until(">");
            body
        }
        None => {
            let body = cur.rest();
            cur.pos = cur.src.len();
            body
        }
    }
}

pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let name = &rest[1..end];
            let c = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "copy" => Some('©'),
                _ if name.starts_with("#x") || name.starts_with("#X") => {
                    u32::from_str_radix(&name[2..], 16).ok().and_then(char::from_u32)
                }
                _ if name.starts_with('#') => name[1..].parse::<u32>().ok().and_then(char::from_u32),
                _ => None,
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn serialize(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Text(t) => {
            let raw = doc
                .parent(node)
                .and_then(|p| doc.tag(p))
                .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
            if raw {
                out.push_str(t);
            } else {
                out.push_str(&escape_text(t));
            }
        }
        NodeData::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (k, v) in attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attr(v));
                out.push('"');
            }
            out.push('>');
            if is_void(tag) {
                return;
            }
            for c in doc.children(node) {
                serialize(doc, *c, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
