//! Parser configuration: the option bag and the five content callbacks.

/// The four content callbacks plus the end-of-parse hook. `U` is an opaque
/// user-data type threaded through every call, mirroring the `userData`
/// pointer of the native parser this crate grew out of.
pub struct Callbacks<U> {
    pub on_text: Option<Box<dyn FnMut(&mut String, &[Box<str>], &str, &mut U)>>,
    pub on_opening_tag: Option<Box<dyn FnMut(&mut String, &[Box<str>], &str, &mut U)>>,
    pub on_closing_tag: Option<Box<dyn FnMut(&mut String, &[Box<str>], &str, &mut U)>>,
    pub on_inline: Option<Box<dyn FnMut(&mut String, &[Box<str>], &str, &mut U)>>,
    pub on_end: Option<Box<dyn FnMut(&mut U)>>,
}

impl<U> Default for Callbacks<U> {
    fn default() -> Self {
        Self {
            on_text: None,
            on_opening_tag: None,
            on_closing_tag: None,
            on_inline: None,
            on_end: None,
        }
    }
}

/// Parser configuration. Construct with [`ParserOptions::new`] and chain the
/// `with_*` builders; the option surface is append-only by design, mirroring
/// how the native parser's options object is populated field by field.
pub struct ParserOptions<U> {
    /// Reconstruct a rewritten document into the output string using the
    /// default callbacks (or caller-supplied overrides).
    pub buffer: bool,
    /// Collapse whitespace-only runs in text nodes, always applied inside
    /// `<head>` regardless of this flag.
    pub compact: bool,
    /// Disable shorthand attributes, `{{ }}` interpolation, and `scope::tag`
    /// / `<ls::template>` syntax; treat input as plain HTML.
    pub vanilla: bool,
    pub callbacks: Callbacks<U>,
}

impl<U> ParserOptions<U> {
    pub fn new(buffer: bool) -> Self {
        let mut callbacks = Callbacks::default();
        if buffer {
            callbacks.on_text = Some(Box::new(|out: &mut String, _stack, text: &str, _user| {
                out.push_str(text);
            }));
            callbacks.on_opening_tag =
                Some(Box::new(|out: &mut String, _stack, tag: &str, _user| {
                    out.push('<');
                    out.push_str(tag);
                }));
            callbacks.on_closing_tag =
                Some(Box::new(|out: &mut String, _stack, tag: &str, _user| {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }));
            callbacks.on_inline = Some(Box::new(|out: &mut String, _stack, expr: &str, _user| {
                out.push_str("<span data-reactive=\"");
                out.push_str(expr);
                out.push_str("\"></span>");
            }));
        }
        Self {
            buffer,
            compact: false,
            vanilla: false,
            callbacks,
        }
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn with_vanilla(mut self, vanilla: bool) -> Self {
        self.vanilla = vanilla;
        self
    }
}
