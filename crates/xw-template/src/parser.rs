//! The 8-state byte-level parser that drives the whole crate: it tokenises
//! an xw document in a single pass and fires the four content callbacks
//! plus an end-of-document hook.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bytes;
use crate::cache::{Cache, CacheEntry};
use crate::elements::{is_raw_element, is_void_element};
use crate::error::{ParseError, ParseResult};
use crate::fs_util::read_file_checked;
use crate::js_compiler;
use crate::macros::strcspn;
use crate::options::ParserOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Text,
    TagName,
    Attribute,
    AttributeValue,
    Comment,
    InlineValue,
    RawElement,
    TemplatePath,
}

/// Distinguishes the two things [`State::RawElement`] can be scanning for:
/// an ordinary raw-text element's closing tag, or the end of a captured
/// `<ls::template>` body awaiting compilation.
enum RawKind {
    Element,
    LsTemplate { id: String },
}

/// The parsing engine. `U` is opaque user data threaded through every
/// callback invocation, analogous to the `userData` pointer of the native
/// parser this crate is descended from.
pub struct Parser<U> {
    pub options: ParserOptions<U>,

    state: State,
    reset: bool,

    string_char: u8,
    end_tag: bool,
    space_broken: bool,
    flag_append_to_class: bool,
    flag_capture_id: bool,

    is_template: bool,
    is_raw: bool,
    render_element: bool,
    template_scope: Option<String>,
    current_tag: String,

    class_buffer: String,
    body_attributes: String,
    inside_head: bool,

    raw_kind: Option<RawKind>,
    raw_closer: Vec<u8>,
    ls_capture_id: String,
    js_buffer: String,

    tag_stack: Vec<Box<str>>,

    template_enabled: bool,
    root_path: Option<PathBuf>,
    cache: Option<Arc<Cache>>,
    own_entry: Option<Arc<RwLock<CacheEntry>>>,
}

impl<U> Parser<U> {
    pub fn new(options: ParserOptions<U>) -> Self {
        Self {
            options,
            state: State::Text,
            reset: true,
            string_char: 0,
            end_tag: false,
            space_broken: false,
            flag_append_to_class: false,
            flag_capture_id: false,
            is_template: false,
            is_raw: false,
            render_element: true,
            template_scope: None,
            current_tag: String::new(),
            class_buffer: String::new(),
            body_attributes: String::new(),
            inside_head: false,
            raw_kind: None,
            raw_closer: Vec::new(),
            ls_capture_id: String::new(),
            js_buffer: String::new(),
            tag_stack: Vec::new(),
            template_enabled: false,
            root_path: None,
            cache: None,
            own_entry: None,
        }
    }

    /// Preloads attributes to splice onto the next `<body>` opening tag
    /// encountered, mirroring the directive that lets a linked template
    /// contribute attributes to the document's own `<body>`.
    pub fn set_body_attributes(&mut self, attrs: impl Into<String>) {
        self.body_attributes = attrs.into();
    }

    pub(crate) fn enable_template_resolution(
        &mut self,
        cache: Arc<Cache>,
        own_entry: Arc<RwLock<CacheEntry>>,
        root_path: PathBuf,
    ) {
        self.template_enabled = true;
        self.cache = Some(cache);
        self.own_entry = Some(own_entry);
        self.root_path = Some(root_path);
    }

    /// Seeds or continues a parse. `output` is required when
    /// `options.buffer` is enabled.
    pub fn write(
        &mut self,
        input: &[u8],
        output: Option<&mut String>,
        user: &mut U,
    ) -> ParseResult<()> {
        if self.options.buffer && output.is_none() {
            return Err(ParseError::ArgumentError(
                "output string must be supplied when the buffer option is enabled".into(),
            ));
        }

        match output {
            Some(out) => self.resume(input, out, user),
            None => {
                let mut scratch = String::new();
                self.resume(input, &mut scratch, user)
            }
        }
    }

    /// Drains the open-tag stack, closes the document, and resets the
    /// parser for a fresh `write`.
    pub fn end(&mut self, output: &mut String, user: &mut U) {
        while let Some(tag) = self.tag_stack.pop() {
            self.fire_closing_tag(output, user, &tag);
        }

        if self.options.buffer && !self.js_buffer.is_empty() {
            let prefix = format!("<script>\n{}</script>\n", self.js_buffer);
            output.insert_str(0, &prefix);
        }

        if let Some(cb) = self.options.callbacks.on_end.as_mut() {
            cb(user);
        }

        self.state = State::Text;
        self.string_char = 0;
        self.space_broken = false;
        self.flag_append_to_class = false;
        self.flag_capture_id = false;
        self.end_tag = false;
        self.class_buffer.clear();
        self.body_attributes.clear();
        self.tag_stack.clear();
        self.js_buffer.clear();
        self.inside_head = false;
        self.reset = true;
    }

    /// Convenience wrapper: `write` followed by `end` into a fresh string.
    pub fn parse(&mut self, input: &[u8], user: &mut U) -> String {
        let mut result = String::new();
        let _ = self.write(input, Some(&mut result), user);
        self.end(&mut result, user);
        result
    }

    /// Reads `path`, repoints the parser at its bytes, and parses them as a
    /// continuation of the current document — the state machine is not
    /// reset, so the file's content lands wherever the current cursor is.
    pub fn inline_file(
        &mut self,
        path: &Path,
        output: &mut String,
        user: &mut U,
    ) -> ParseResult<()> {
        let bytes = read_file_checked(path)?;
        self.resume(&bytes, output, user)
    }

    fn resume(&mut self, input: &[u8], output: &mut String, user: &mut U) -> ParseResult<()> {
        let was_fresh = self.reset;
        self.reset = false;

        let chunk_end = input.len();
        let mut it = 0usize;
        let mut value_start = 0usize;
        let mut inline_literal_start: Option<usize> = None;

        if was_fresh
            && self.template_enabled
            && !self.options.vanilla
            && input.get(0..10) == Some(b"#template ")
        {
            self.state = State::TemplatePath;
            it = 10;
            value_start = 10;
        }

        while it < chunk_end {
            let byte = input[it];

            if self.string_char != 0 && byte != self.string_char {
                it += 1;
                continue;
            }

            if matches!(self.state, State::Attribute | State::AttributeValue)
                || (self.state == State::InlineValue && !self.space_broken)
            {
                let is_ws = byte.is_ascii_whitespace();
                if is_ws {
                    if !self.space_broken {
                        it += 1;
                        continue;
                    }
                    self.space_broken = false;
                }
                if !self.space_broken && !is_ws {
                    self.space_broken = true;
                    value_start = it;
                }
            }

            match self.state {
                State::Comment => {
                    if input.get(it..it + 3) == Some(b"-->") {
                        self.state = State::Text;
                        it += 3;
                        value_start = it;
                        continue;
                    }
                }

                State::Text => {
                    if byte == b'<' {
                        self.emit_text(output, user, &input[value_start..it]);

                        if input.get(it..it + 4) == Some(b"<!--") {
                            self.state = State::Comment;
                            it += 4;
                            continue;
                        }

                        self.end_tag = input.get(it + 1) == Some(&b'/');
                        self.state = State::TagName;
                        it += if self.end_tag { 2 } else { 1 };
                        value_start = it;
                        continue;
                    }

                    if !self.options.vanilla
                        && input.get(it..it + 2) == Some(b"{{")
                        && (it == 0 || input[it - 1] != b'\\')
                    {
                        self.emit_text(output, user, &input[value_start..it]);
                        self.state = State::InlineValue;
                        self.space_broken = false;
                        inline_literal_start = Some(it);
                        it += 2;
                        value_start = it;
                        continue;
                    }
                }

                State::TagName => {
                    if !self.options.vanilla
                        && !self.end_tag
                        && !self.is_template
                        && input.get(it..it + 2) == Some(b"::")
                    {
                        self.template_scope =
                            Some(String::from_utf8_lossy(&input[value_start..it]).into_owned());
                        self.is_template = true;
                        it += 2;
                        value_start = it;
                        continue;
                    }

                    if byte == b'>' || byte == b'/' || byte.is_ascii_whitespace() {
                        if !self.end_tag {
                            self.handle_opening_tag_name(input, value_start, it, byte, output, user);
                            it += if byte == b'/' { 2 } else { 1 };
                            value_start = it;
                            continue;
                        }

                        let closing =
                            String::from_utf8_lossy(&input[value_start..it]).into_owned();
                        let mut j = it;
                        if byte != b'>' {
                            j += strcspn!(input, b'>', it);
                        }
                        it = j;

                        if self.tag_stack.last().map(|t| t.as_ref()) == Some(closing.as_str()) {
                            self.tag_stack.pop();
                            self.fire_closing_tag(output, user, &closing);
                        } else {
                            log::debug!(
                                target: "xw_template::parser",
                                "discarding mismatched closing tag </{closing}>"
                            );
                        }

                        if closing.eq_ignore_ascii_case("head") {
                            self.inside_head = false;
                        }

                        self.end_tag = false;
                        self.state = State::Text;
                        it += 1;
                        value_start = it;
                        continue;
                    }
                }

                State::Attribute => {
                    if !self.options.vanilla && input.get(it..it + 2) == Some(b"{{") {
                        if it > value_start {
                            let token =
                                String::from_utf8_lossy(&input[value_start..it]).into_owned();
                            self.handle_attribute_token(output, &token);
                        }

                        let j = bytes::find_bytes(input, b"}}", it + 2).unwrap_or(chunk_end);
                        let expr =
                            String::from_utf8_lossy(bytes::trim(&input[it + 2..j])).into_owned();
                        if self.render_element && !expr.is_empty() {
                            output.push_str(" data-reactive=\"");
                            output.push_str(&expr);
                            output.push('"');
                        }

                        it = (j + 2).min(chunk_end);
                        value_start = it;
                        self.space_broken = false;
                        continue;
                    }

                    if byte == b'=' || byte == b'>' || byte == b'/' || byte.is_ascii_whitespace() {
                        if it > value_start {
                            let token =
                                String::from_utf8_lossy(&input[value_start..it]).into_owned();
                            self.handle_attribute_token(output, &token);
                        }

                        if byte == b'=' {
                            self.state = State::AttributeValue;
                            self.space_broken = false;
                            it += 1;
                            value_start = it;
                            continue;
                        }

                        if byte == b'>' {
                            it += 1;
                            value_start = it;
                            self.end_tag_action(output);
                            continue;
                        }

                        if byte == b'/' && input.get(it + 1) == Some(&b'>') {
                            it += 2;
                            value_start = it;
                            self.end_tag_action(output);
                            if let Some(name) = self.tag_stack.pop() {
                                self.fire_closing_tag(output, user, &name);
                            }
                            continue;
                        }
                    }
                }

                State::AttributeValue => {
                    let mut ends_value = byte == b'>' || byte.is_ascii_whitespace();

                    if byte == b'"' || byte == b'\'' {
                        if self.string_char == 0 {
                            self.string_char = byte;
                            it += 1;
                            value_start = it;
                            continue;
                        }
                        self.string_char = 0;
                        ends_value = true;
                    }

                    if ends_value {
                        if it > value_start {
                            let value =
                                String::from_utf8_lossy(&input[value_start..it]).into_owned();
                            self.handle_attribute_value(output, value);
                        } else {
                            self.flag_append_to_class = false;
                            self.flag_capture_id = false;
                        }

                        if byte == b'>' {
                            it += 1;
                            value_start = it;
                            self.end_tag_action(output);
                            continue;
                        }

                        self.state = State::Attribute;
                        self.space_broken = false;
                        value_start = it + 1;
                    }
                }

                State::InlineValue => {
                    if byte == b'}' && input.get(it + 1) == Some(&b'}') {
                        if it > value_start {
                            let expr = String::from_utf8_lossy(bytes::rtrim(&input[value_start..it]))
                                .into_owned();
                            if !expr.is_empty() {
                                self.fire_inline(output, user, &expr);
                            }
                        }
                        it += 2;
                        value_start = it;
                        self.state = State::Text;
                        continue;
                    }
                }

                State::RawElement => {
                    if byte == b'<'
                        && bytes::starts_with_ignore_case(input, &self.raw_closer, it)
                    {
                        let text = &input[value_start..it];

                        match self.raw_kind.take() {
                            Some(RawKind::Element) => {
                                self.emit_text(output, user, text);
                                if let Some(name) = self.tag_stack.pop() {
                                    self.fire_closing_tag(output, user, &name);
                                }
                            }
                            Some(RawKind::LsTemplate { id }) => {
                                let body = String::from_utf8_lossy(text);
                                self.js_buffer.push_str(&js_compiler::compile(&id, &body));
                            }
                            None => {}
                        }

                        let j = it + strcspn!(input, b'>', it);
                        it = (j + 1).min(chunk_end);
                        value_start = it;
                        self.state = State::Text;
                        self.is_raw = false;
                        continue;
                    }
                }

                State::TemplatePath => {
                    if byte == b'\n' || byte == b'\r' {
                        let path_str =
                            String::from_utf8_lossy(&input[value_start..it]).trim().to_string();
                        self.resolve_template(&path_str);
                        self.state = State::Text;
                        it += 1;
                        value_start = it;
                        continue;
                    }
                }
            }

            it += 1;
        }

        match self.state {
            State::Text => {
                self.emit_text(output, user, &input[value_start..chunk_end]);
            }
            State::InlineValue => {
                if let Some(start) = inline_literal_start {
                    self.emit_text(output, user, &input[start..chunk_end]);
                }
                self.state = State::Text;
                self.space_broken = false;
            }
            _ => {}
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_opening_tag_name(
        &mut self,
        input: &[u8],
        value_start: usize,
        it: usize,
        terminator: u8,
        output: &mut String,
        user: &mut U,
    ) {
        let tag_owned = String::from_utf8_lossy(&input[value_start..it]).into_owned();
        let was_template = self.is_template;

        self.current_tag = tag_owned.clone();
        self.render_element = !was_template && tag_owned != "html" && tag_owned != "!DOCTYPE";
        self.is_raw = self.render_element && is_raw_element(&tag_owned);

        if self.render_element {
            self.fire_opening_tag(output, user, &tag_owned);
        }

        if tag_owned.eq_ignore_ascii_case("body") && !self.body_attributes.is_empty() {
            output.push(' ');
            output.push_str(&self.body_attributes);
        }

        if terminator == b'>' || terminator == b'/' {
            if terminator == b'/' {
                // A self-closed element has no body, even if its tag name
                // is normally treated as raw text.
                self.is_raw = false;
            }

            self.end_tag_action(output);

            if terminator == b'/' {
                if self.render_element {
                    self.fire_closing_tag(output, user, &tag_owned);
                }
                return;
            }
        } else {
            self.state = State::Attribute;
        }

        if !was_template && !is_void_element(&tag_owned) && !self.is_raw {
            self.tag_stack.push(tag_owned.into_boxed_str());
        }

        if self.current_tag.eq_ignore_ascii_case("head") {
            self.inside_head = true;
        }
    }

    fn is_ls_template_tag(&self) -> bool {
        self.is_template
            && self.current_tag.eq_ignore_ascii_case("template")
            && self
                .template_scope
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case("ls"))
                .unwrap_or(false)
    }

    fn handle_attribute_token(&mut self, output: &mut String, token: &str) {
        if token.is_empty() {
            return;
        }

        let capturing_ls_id = self.is_ls_template_tag();

        if !self.options.vanilla && token.starts_with('#') {
            if capturing_ls_id {
                self.ls_capture_id = token[1..].to_string();
            }
            if self.render_element {
                output.push_str(" id=\"");
                output.push_str(&token[1..]);
                output.push('"');
            }
            return;
        }

        if !self.options.vanilla && token.starts_with('.') {
            if self.render_element {
                if !self.class_buffer.is_empty() {
                    self.class_buffer.push(' ');
                }
                self.class_buffer.push_str(&token[1..].replace('.', " "));
            }
            return;
        }

        if token.eq_ignore_ascii_case("class") {
            self.flag_append_to_class = true;
            return;
        }

        if capturing_ls_id && token.eq_ignore_ascii_case("id") {
            self.flag_capture_id = true;
            return;
        }

        if self.render_element {
            output.push(' ');
            output.push_str(token);
        }
    }

    fn handle_attribute_value(&mut self, output: &mut String, value: String) {
        if self.flag_capture_id {
            self.ls_capture_id = value.clone();
            self.flag_capture_id = false;
        }

        if self.flag_append_to_class {
            if self.render_element {
                if !self.class_buffer.is_empty() {
                    self.class_buffer.push(' ');
                }
                self.class_buffer.push_str(&value);
            }
            self.flag_append_to_class = false;
            return;
        }

        if self.render_element {
            let quote = if value.contains('"') { '\'' } else { '"' };
            output.push('=');
            output.push(quote);
            output.push_str(&value);
            output.push(quote);
        }
    }

    fn end_tag_action(&mut self, output: &mut String) {
        if self.is_template {
            let scope = self.template_scope.take().unwrap_or_default();
            self.is_template = false;
            let tag = std::mem::take(&mut self.current_tag);

            if scope.eq_ignore_ascii_case("ls") && tag.eq_ignore_ascii_case("template") {
                self.raw_kind = Some(RawKind::LsTemplate {
                    id: std::mem::take(&mut self.ls_capture_id),
                });
                self.raw_closer = b"</ls::template".to_vec();
                self.state = State::RawElement;
                return;
            }

            if scope.eq_ignore_ascii_case("template") {
                if let Some(entry) = &self.own_entry {
                    entry.write().template_chunk_split = Some(output.len());
                    self.state = State::Text;
                    return;
                }
            }

            if self.options.buffer {
                output.push_str("#template ");
                output.push_str(&scope);
                output.push('\n');
            }
            self.state = State::Text;
            return;
        }

        if self.render_element && self.options.buffer {
            if !self.class_buffer.is_empty() {
                output.push_str(" class=\"");
                output.push_str(&self.class_buffer);
                output.push('"');
                self.class_buffer.clear();
            }
            output.push('>');
        }

        if self.is_raw {
            self.raw_kind = Some(RawKind::Element);
            self.raw_closer = {
                let mut v = Vec::with_capacity(self.current_tag.len() + 2);
                v.extend_from_slice(b"</");
                v.extend_from_slice(self.current_tag.as_bytes());
                v
            };
            self.tag_stack.push(self.current_tag.clone().into_boxed_str());
        }

        self.state = if self.is_raw {
            State::RawElement
        } else {
            State::Text
        };
    }

    fn resolve_template(&mut self, rel_path: &str) {
        let (Some(cache), Some(entry)) = (self.cache.clone(), self.own_entry.clone()) else {
            return;
        };
        let base = self
            .root_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let resolved = crate::fs_util::normalize_path(&base.join(rel_path));

        match cache.from_file(&resolved) {
            Ok(template_entry) => {
                let template_mtime = template_entry.read().mtime;
                let mut this_entry = entry.write();
                this_entry.template = Some(template_entry);
                this_entry.template_mtime = Some(template_mtime);
            }
            Err(err) => {
                log::warn!(
                    target: "xw_template::cache",
                    "could not resolve template {}: {err}",
                    resolved.display()
                );
            }
        }
    }

    fn emit_text(&mut self, output: &mut String, user: &mut U, raw: &[u8]) {
        if raw.is_empty() {
            return;
        }
        let collapsed = if self.options.compact || self.inside_head {
            bytes::trim(raw)
        } else {
            raw
        };
        if collapsed.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(collapsed);
        if let Some(cb) = self.options.callbacks.on_text.as_mut() {
            cb(output, &self.tag_stack, &text, user);
        }
    }

    fn fire_opening_tag(&mut self, output: &mut String, user: &mut U, tag: &str) {
        if let Some(cb) = self.options.callbacks.on_opening_tag.as_mut() {
            cb(output, &self.tag_stack, tag, user);
        }
    }

    fn fire_closing_tag(&mut self, output: &mut String, user: &mut U, tag: &str) {
        if let Some(cb) = self.options.callbacks.on_closing_tag.as_mut() {
            cb(output, &self.tag_stack, tag, user);
        }
    }

    fn fire_inline(&mut self, output: &mut String, user: &mut U, expr: &str) {
        if let Some(cb) = self.options.callbacks.on_inline.as_mut() {
            cb(output, &self.tag_stack, expr, user);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_buffered(input: &[u8]) -> String {
        let options = ParserOptions::<()>::new(true);
        let mut parser = Parser::new(options);
        parser.parse(input, &mut ())
    }

    #[test]
    fn shorthand_id_and_class() {
        let out = parse_buffered(b"<div #main .foo.bar>hi</div>");
        assert!(out.contains(r#"<div id="main" class="foo bar">hi</div>"#));
    }

    #[test]
    fn reactive_inline_text() {
        let out = parse_buffered(b"<p>a{{ user.name }}b</p>");
        assert!(out.contains(r#"<p>a<span data-reactive="user.name"></span>b</p>"#));
    }

    #[test]
    fn raw_element_is_opaque() {
        let out = parse_buffered(b"<script>if (1<2) { x(); }</script>");
        assert!(out.contains("<script>if (1<2) { x(); }</script>"));
    }

    #[test]
    fn void_elements_do_not_unbalance_the_stack() {
        let options = ParserOptions::<()>::new(true);
        let mut parser = Parser::new(options);
        let out = parser.parse(b"<img src=\"x\"/><br>", &mut ());
        assert!(parser.tag_stack.is_empty());
        assert!(out.contains(r#"<img src="x">"#));
        assert!(out.contains("<br>"));
    }

    #[test]
    fn mismatched_closing_tag_is_discarded_not_fatal() {
        let out = parse_buffered(b"<div><span>text</div></span>");
        assert!(out.contains("text"));
    }

    #[test]
    fn vanilla_mode_disables_shorthand() {
        let options = ParserOptions::<()>::new(true).with_vanilla(true);
        let mut parser = Parser::new(options);
        let out = parser.parse(b"<div #main>{{ x }}</div>", &mut ());
        assert!(out.contains("<div #main>{{ x }}</div>"));
    }

    #[test]
    fn malformed_inline_emitted_verbatim() {
        let out = parse_buffered(b"<p>a{{ broken</p>");
        assert!(out.contains("{{ broken"));
    }

    #[test]
    fn reactive_attribute_shorthand() {
        let out = parse_buffered(b"<div {{ visible }} class=\"x\">hi</div>");
        assert!(out.contains(r#"<div data-reactive="visible" class="x">hi</div>"#));
    }

    use quickcheck::Arbitrary;

    #[derive(Clone, Debug)]
    struct Ident(String);

    impl Arbitrary for Ident {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let len = (usize::arbitrary(g) % 8) + 1;
            let letters = b"abcdefghijklmnopqrstuvwxyz";
            let s: String = (0..len)
                .map(|_| letters[usize::arbitrary(g) % letters.len()] as char)
                .collect();
            Ident(s)
        }
    }

    #[quickcheck_macros::quickcheck]
    fn shorthand_id_matches_explicit_attribute(ident: Ident) -> bool {
        let shorthand = parse_buffered(format!("<div #{}>x</div>", ident.0).as_bytes());
        let explicit = parse_buffered(format!("<div id=\"{}\">x</div>", ident.0).as_bytes());
        shorthand == explicit
    }

    #[quickcheck_macros::quickcheck]
    fn shorthand_class_matches_explicit_attribute(a: Ident, b: Ident) -> bool {
        let shorthand = parse_buffered(format!("<div .{}.{}>x</div>", a.0, b.0).as_bytes());
        let explicit =
            parse_buffered(format!("<div class=\"{} {}\">x</div>", a.0, b.0).as_bytes());
        shorthand == explicit
    }

    #[quickcheck_macros::quickcheck]
    fn void_elements_never_unbalance_the_stack(tag: Ident) -> bool {
        let void_tags = [
            "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
            "track", "command", "frame", "param", "wbr",
        ];
        let name = void_tags[tag.0.len() % void_tags.len()];
        let options = ParserOptions::<()>::new(true);
        let mut parser = Parser::new(options);
        parser.parse(format!("<{name}>").as_bytes(), &mut ());
        parser.tag_stack.is_empty()
    }

    #[quickcheck_macros::quickcheck]
    fn raw_element_body_is_passed_through_verbatim(word: Ident) -> bool {
        let body = format!("var {} = 1;", word.0);
        let out = parse_buffered(format!("<script>{body}</script>").as_bytes());
        out.contains(&body)
    }

    #[quickcheck_macros::quickcheck]
    fn closing_tag_callbacks_match_pushed_opens(depth_seed: u8) -> bool {
        let depth = (depth_seed as usize % 6) + 1;
        let mut input = String::new();
        for _ in 0..depth {
            input.push_str("<div>");
        }
        for _ in 0..depth {
            input.push_str("</div>");
        }

        let mut options = ParserOptions::<isize>::new(false);
        options.callbacks.on_opening_tag =
            Some(Box::new(|_out: &mut String, _stack: &[Box<str>], _tag: &str, count: &mut isize| {
                *count += 1;
            }));
        options.callbacks.on_closing_tag =
            Some(Box::new(|_out: &mut String, _stack: &[Box<str>], _tag: &str, count: &mut isize| {
                *count -= 1;
            }));
        let mut parser = Parser::new(options);
        let mut count: isize = 0;
        let mut scratch = String::new();
        parser.write(input.as_bytes(), Some(&mut scratch), &mut count).unwrap();
        parser.end(&mut scratch, &mut count);
        count == 0 && parser.tag_stack.is_empty()
    }
}
