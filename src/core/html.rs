// src/core/html.rs
// Tolerant, case-insensitive tag scanning. No DOM; just enough to find
// blocks and visible text on pages we don't control.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Next `<o ...> ... c` block at or after `from`, as byte offsets into `s`.
/// `to_lower` only touches ASCII, so offsets in the lowered copy match `s`.
pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

/// Byte spans of all `<tag ...>...</tag>` blocks, in document order.
/// `<h2` never matches `<h2x>`: the byte after the name has to end it.
pub fn tag_block_spans(s: &str, tag: &str) -> Vec<(usize, usize)> {
    let open = join!("<", tag);
    let close = join!("</", tag, ">");
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b, e)) = next_tag_block_ci(s, &open, &close, pos) {
        let after = s.as_bytes().get(b + open.len()).copied().unwrap_or(b'>');
        if after == b'>' || after.is_ascii_whitespace() || after == b'/' {
            out.push((b, e));
            pos = e;
        } else {
            pos = b + open.len();
        }
    }
    out
}

/// Visible text of a fragment: tags dropped, entities decoded, whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => { in_tag = true; out.push(' '); }
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

/// Non-empty text nodes, in document order. `<script>`/`<style>` bodies are skipped.
pub fn text_nodes(doc: &str) -> Vec<String> {
    let lc = to_lower(doc);
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < doc.len() {
        let Some(lt) = doc[i..].find('<').map(|p| p + i) else {
            push_text(&mut out, &doc[i..]);
            break;
        };
        push_text(&mut out, &doc[i..lt]);

        let Some(gt) = doc[lt..].find('>').map(|p| p + lt) else { break };
        let tag = &lc[lt..=gt];
        i = gt + 1;

        for raw in ["script", "style"] {
            if tag.starts_with(&join!("<", raw)) {
                let close = join!("</", raw);
                i = lc[i..].find(&close).map(|p| p + i).unwrap_or(doc.len());
            }
        }
    }
    out
}

fn push_text(out: &mut Vec<String>, raw: &str) {
    let t = normalize_ws(&normalize_entities(raw));
    if !t.is_empty() {
        out.push(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_spans_respect_tag_name_boundary() {
        let doc = "<H2 class=t>One</h2><h2x>no</h2x><h2>Two</h2>";
        let spans = tag_block_spans(doc, "h2");
        assert_eq!(spans.len(), 2);
        assert_eq!(strip_tags(&doc[spans[0].0..spans[0].1]), "One");
        assert_eq!(strip_tags(&doc[spans[1].0..spans[1].1]), "Two");
    }

    #[test]
    fn strip_tags_keeps_words_apart() {
        assert_eq!(strip_tags("<a>macOS</a><span>26.1</span>&nbsp;beta"), "macOS 26.1 beta");
    }

    #[test]
    fn text_nodes_skip_scripts() {
        let doc = r#"<p>Chrome 141</p><script>var x = "Chrome 999";</script><div> Chrome&nbsp;142  Beta </div>"#;
        assert_eq!(text_nodes(doc), vec!["Chrome 141", "Chrome 142 Beta"]);
    }
}
