//! Classification tables for tags that do not follow ordinary open/close
//! stack discipline.

/// Elements with no content model: never pushed onto the tag stack, and a
/// trailing `/` is never required to close them.
pub fn is_void_element(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "command"
            | "frame"
            | "param"
            | "wbr"
    )
}

/// Elements whose content is consumed opaquely until the literal matching
/// closing tag; the parser does not tokenise characters inside them.
pub fn is_raw_element(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_lowercase().as_str(),
        "script" | "style" | "xmp" | "textarea" | "title"
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn raw_elements() {
        assert!(is_raw_element("script"));
        assert!(is_raw_element("Style"));
        assert!(!is_raw_element("span"));
    }
}
