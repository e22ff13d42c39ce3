//! Compiles a captured `<ls::template>` body into a JavaScript
//! DOM-construction function.
//!
//! The input has already been isolated from the surrounding document by the
//! parser's raw-capture machinery; this module only does a small recursive
//! descent over that captured slice.

struct Compiler<'a> {
    body: &'a str,
    pos: usize,
    next_id: usize,
    stack: Vec<usize>,
    root: Option<usize>,
    exports: Vec<(String, usize)>,
    out: String,
}

/// Compiles `body` (the bytes between `<ls::template ...>` and its closing
/// tag) into a standalone JS function named `id`.
pub fn compile(id: &str, body: &str) -> String {
    let safe_id = if id.is_empty() { "template" } else { id };
    let mut compiler = Compiler {
        body,
        pos: 0,
        next_id: 0,
        stack: Vec::new(),
        root: None,
        exports: Vec::new(),
        out: String::new(),
    };
    compiler.run();

    let mut js = String::new();
    js.push_str("function ");
    js.push_str(safe_id);
    js.push_str("(data){\n");
    js.push_str(&compiler.out);
    js.push_str("return { ");
    if let Some(root) = compiler.root {
        js.push_str(&format!("root: e{root}, "));
    }
    for (name, var) in &compiler.exports {
        js.push_str(&format!("{name}: e{var}, "));
    }
    js.push_str("};\n}\n");
    js
}

impl<'a> Compiler<'a> {
    fn run(&mut self) {
        while self.pos < self.body.len() {
            if self.body[self.pos..].starts_with("<!--") {
                self.skip_comment();
            } else if self.body[self.pos..].starts_with("</") {
                self.close_element();
            } else if self.body.as_bytes()[self.pos] == b'<' {
                self.open_element();
            } else {
                self.text_run();
            }
        }
    }

    fn skip_comment(&mut self) {
        if let Some(end) = self.body[self.pos..].find("-->") {
            self.pos += end + 3;
        } else {
            self.pos = self.body.len();
        }
    }

    fn close_element(&mut self) {
        if let Some(end) = self.body[self.pos..].find('>') {
            self.pos += end + 1;
        } else {
            self.pos = self.body.len();
        }
        self.stack.pop();
    }

    fn text_run(&mut self) {
        let start = self.pos;
        let bytes = self.body.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'<' {
            self.pos += 1;
        }
        let raw = &self.body[start..self.pos];
        self.emit_text(raw);
    }

    fn emit_text(&mut self, raw: &str) {
        let mut rest = raw;
        while let Some(open) = rest.find("{{") {
            let literal = &rest[..open];
            if !literal.trim().is_empty() {
                self.append_text_node(literal);
            }
            let Some(close) = rest[open..].find("}}") else {
                self.append_text_node(&rest[open..]);
                return;
            };
            let expr_raw = rest[open + 2..open + close].trim();
            self.append_reactive(expr_raw);
            rest = &rest[open + close + 2..];
        }
        if !rest.trim().is_empty() {
            self.append_text_node(rest);
        }
    }

    fn append_text_node(&mut self, text: &str) {
        let id = self.alloc();
        self.out.push_str(&format!(
            "var e{id} = document.createTextNode(\"{}\");\n",
            escape_js_string(text)
        ));
        self.attach(id);
    }

    fn append_reactive(&mut self, expr: &str) {
        if let Some(dynamic) = expr.strip_prefix('#') {
            let normalized = normalize_expression(dynamic.trim());
            self.out
                .push_str(&format!("LS.__dynamicInnerToNode({normalized});\n"));
            return;
        }

        let id = self.alloc();
        let normalized = normalize_expression(expr);
        self.out
            .push_str(&format!("var e{id} = document.createElement(\"span\");\n"));
        self.out.push_str(&format!(
            "LS.Reactive.bindElement(e{id}, {normalized});\n"
        ));
        self.attach(id);
    }

    fn open_element(&mut self) {
        let bytes = self.body.as_bytes();
        let mut end = self.pos + 1;
        while end < bytes.len() && bytes[end] != b'>' {
            end += 1;
        }
        let self_closing = end > self.pos && bytes[end - 1] == b'/';
        let tag_body = &self.body[self.pos + 1..if self_closing { end - 1 } else { end }];
        self.pos = (end + 1).min(self.body.len());

        let mut parts = tag_body.split_whitespace();
        let tag_name = parts.next().unwrap_or("div");
        let id = self.alloc();

        self.out.push_str(&format!(
            "var e{id} = document.createElement(\"{tag_name}\");\n"
        ));

        let mut classes: Vec<String> = Vec::new();
        let mut export_name: Option<String> = None;

        for token in parts {
            if let Some(rest) = token.strip_prefix('#') {
                self.out
                    .push_str(&format!("e{id}.id = \"{}\";\n", escape_js_string(rest)));
            } else if let Some(rest) = token.strip_prefix('.') {
                classes.extend(rest.split('.').map(str::to_string));
            } else if let Some((name, value)) = token.split_once('=') {
                let value = value.trim_matches(|c| c == '"' || c == '\'');
                if name.eq_ignore_ascii_case("class") {
                    classes.extend(value.split_whitespace().map(str::to_string));
                } else if name.eq_ignore_ascii_case("export") {
                    export_name = Some(value.to_string());
                } else {
                    self.out.push_str(&format!(
                        "e{id}.setAttribute(\"{name}\", \"{}\");\n",
                        escape_js_string(value)
                    ));
                }
            }
        }

        if !classes.is_empty() {
            self.out.push_str(&format!(
                "e{id}.className = \"{}\";\n",
                escape_js_string(&classes.join(" "))
            ));
        }

        if let Some(name) = export_name {
            self.exports.push((name, id));
        }

        self.attach(id);

        if !self_closing {
            self.stack.push(id);
        }
    }

    fn attach(&mut self, id: usize) {
        if let Some(&parent) = self.stack.last() {
            self.out.push_str(&format!("e{parent}.appendChild(e{id});\n"));
        } else if self.root.is_none() {
            self.root = Some(id);
        }
    }

    fn alloc(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Expressions are assumed to be `data.`-scoped unless they already look
/// like a member access, a call, or are explicitly namespaced.
fn normalize_expression(expr: &str) -> String {
    if expr.starts_with("data.") || expr.contains('.') || expr.contains('(') {
        expr.to_string()
    } else {
        format!("data.{expr}")
    }
}

fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compiles_simple_reactive_span() {
        let js = compile("row", "<span>{{ name }}</span>");
        assert!(js.starts_with("function row(data){"));
        assert!(js.contains("document.createElement(\"span\")"));
        assert!(js.contains("LS.Reactive.bindElement(e1, data.name)"));
        assert!(js.contains("return { root: e0,"));
    }

    #[test]
    fn export_attribute_is_returned_by_name() {
        let js = compile("card", "<div export=\"title\">{{ title }}</div>");
        assert!(js.contains("title: e0"));
    }

    #[test]
    fn normalize_expression_prefixes_bare_identifiers() {
        assert_eq!(normalize_expression("name"), "data.name");
        assert_eq!(normalize_expression("data.name"), "data.name");
        assert_eq!(normalize_expression("user.name"), "user.name");
        assert_eq!(normalize_expression("fn()"), "fn()");
    }
}
