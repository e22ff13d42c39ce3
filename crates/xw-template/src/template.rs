//! Final assembly of a cached document against its linked template, if any.
//!
//! [`Parser`](crate::parser::Parser) and [`Cache`] only resolve and cache
//! content; turning a [`CacheEntry`] into the HTML that actually gets served
//! is this module's job. A document with no `#template` header is returned
//! as-is, wrapped in its own `<!DOCTYPE html>`/`<html>` shell. A document
//! with a linked template has its own `<head>` contents lifted out and
//! merged into the template's `<head>`, with the rest of the document
//! spliced in at the template's recorded split point.

use crate::cache::CacheEntry;

/// Produces the final HTML for a cached document, splicing in a linked
/// template if one was resolved.
pub fn export_copy(entry: &CacheEntry, header: &str) -> String {
    let escaped_header = html_escape(header);

    let Some(template) = &entry.template else {
        let mut out = String::with_capacity(entry.content.len() + 64);
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&escaped_header);
        out.push_str("<html lang=\"en\">");
        out.push_str(&entry.content);
        out.push_str("</html>");
        return out;
    };

    let template = template.read();
    let split = template
        .template_chunk_split
        .unwrap_or(template.content.len());
    let (template_prefix, template_suffix) = template
        .content
        .split_at(split.min(template.content.len()));

    let (document_head, document_body) = extract_head(&entry.content);

    let merged_prefix = splice_into_head(template_prefix, document_head.as_deref());

    let mut out = String::with_capacity(
        merged_prefix.len() + document_body.len() + template_suffix.len() + 64,
    );
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&escaped_header);
    out.push_str("<html lang=\"en\">");
    out.push_str(&merged_prefix);
    out.push_str(&document_body);
    out.push_str(template_suffix);
    out.push_str("</html>");
    out
}

/// Splits a document's content into its `<head>...</head>` inner text (if
/// present) and everything else, with the `<head>` block itself removed
/// from the remainder.
fn extract_head(content: &str) -> (Option<String>, String) {
    let Some(open) = find_tag_open(content, "head") else {
        return (None, content.to_string());
    };
    let Some(body_start) = content[open..].find('>') else {
        return (None, content.to_string());
    };
    let inner_start = open + body_start + 1;

    let Some(close_rel) = content[inner_start..].find("</head>") else {
        return (None, content.to_string());
    };
    let inner_end = inner_start + close_rel;
    let after = inner_end + "</head>".len();

    let head_inner = content[inner_start..inner_end].to_string();

    let mut remainder = String::with_capacity(content.len() - (after - open));
    remainder.push_str(&content[..open]);
    remainder.push_str(&content[after..]);

    (Some(head_inner), remainder)
}

fn find_tag_open(content: &str, tag: &str) -> Option<usize> {
    let needle_lower = format!("<{tag}");
    let lower = content.to_ascii_lowercase();
    lower.find(&needle_lower)
}

/// Inserts `head_inner` (if any) immediately before the template prefix's
/// `</head>`, or appends it verbatim if the template declares no `<head>`.
fn splice_into_head(template_prefix: &str, head_inner: Option<&str>) -> String {
    let Some(head_inner) = head_inner else {
        return template_prefix.to_string();
    };
    if head_inner.trim().is_empty() {
        return template_prefix.to_string();
    }

    let lower = template_prefix.to_ascii_lowercase();
    let Some(close) = lower.find("</head>") else {
        let mut out = template_prefix.to_string();
        out.push_str(head_inner);
        return out;
    };

    let mut out = String::with_capacity(template_prefix.len() + head_inner.len());
    out.push_str(&template_prefix[..close]);
    out.push_str(head_inner);
    out.push_str(&template_prefix[close..]);
    out
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn entry(content: &str) -> CacheEntry {
        CacheEntry {
            path: PathBuf::from("doc.xw"),
            content: content.to_string(),
            mtime: SystemTime::now(),
            template: None,
            template_mtime: None,
            template_chunk_split: None,
        }
    }

    #[test]
    fn untemplated_document_gets_wrapped() {
        let e = entry("<p>hi</p>");
        let out = export_copy(&e, "");
        assert_eq!(out, "<!DOCTYPE html>\n<html lang=\"en\"><p>hi</p></html>");
    }

    #[test]
    fn header_is_escaped() {
        let e = entry("<p>hi</p>");
        let out = export_copy(&e, "<script>");
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn head_merges_into_template_head() {
        let mut doc = entry("<head><meta charset=\"utf-8\"></head><body>hi</body>");
        let mut tmpl = entry("<head><title>t</title></head><body></body>");
        tmpl.template_chunk_split = None;
        doc.template = Some(std::sync::Arc::new(parking_lot::RwLock::new(tmpl)));

        let out = export_copy(&doc, "");
        assert!(out.contains("<title>t</title>"));
        assert!(out.contains("meta charset=\"utf-8\""));
    }

    #[test]
    fn export_copy_is_idempotent_for_an_unchanged_entry() {
        let mut tmpl = entry("<head><title>t</title></head><body>before</body>");
        tmpl.template_chunk_split = Some("<head><title>t</title></head><body>".len());
        let mut doc = entry("<head><meta charset=\"utf-8\"></head><body>hi</body>");
        doc.template = Some(std::sync::Arc::new(parking_lot::RwLock::new(tmpl)));

        let first = export_copy(&doc, "hdr");
        let second = export_copy(&doc, "hdr");
        assert_eq!(first, second);
    }
}
