//! Deterministic HTML-to-text extraction.
//!
//! The scanners take plain text only; generated blog/card-news HTML is run
//! through this small state-machine stripper first. It is intentionally not
//! a full parser: it drops tags, discards `<script>`/`<style>` bodies,
//! turns block-level boundaries into newlines and decodes the handful of
//! entities the generator actually emits. Malformed markup degrades to
//! text, never to a panic.

/// Tags whose end (or self-closing occurrence) becomes a line break.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote",
    "section", "article",
];

/// Strip tags from an HTML fragment, returning plain text.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }

        // Collect the tag up to '>'. An unclosed '<' at EOF is kept as text.
        let rest = &html[idx..];
        let Some(close) = rest.find('>') else {
            out.push_str(rest);
            break;
        };
        let tag_body = &rest[1..close];
        let tag_name = tag_name_of(tag_body);

        // Skip the characters we just consumed as part of the tag.
        while let Some(&(next_idx, _)) = chars.peek() {
            if next_idx > idx + close {
                break;
            }
            chars.next();
        }

        let is_closing = tag_body.starts_with('/');
        match tag_name.as_str() {
            "script" | "style" if !is_closing => {
                // Drop everything up to the matching close tag.
                let after_tag = idx + close + 1;
                if let Some(skip_to) = find_closing_tag(html, after_tag, &tag_name) {
                    while let Some(&(next_idx, _)) = chars.peek() {
                        if next_idx >= skip_to {
                            break;
                        }
                        chars.next();
                    }
                }
            }
            name if BLOCK_TAGS.contains(&name) => {
                if !out.ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }

    decode_entities(&out)
}

/// Byte offset of `</name` at or after `from`, compared ASCII
/// case-insensitively in place. Byte-window comparison keeps offsets valid
/// even when the skipped body contains characters whose lowercase form has
/// a different byte length.
fn find_closing_tag(html: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    let name = name.as_bytes();
    let mut i = from;
    while i + 2 + name.len() <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + name.len()].eq_ignore_ascii_case(name)
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Lowercased tag name, ignoring attributes and the closing slash.
fn tag_name_of(tag_body: &str) -> String {
    tag_body
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Decode the entities the content generator emits. `&amp;` is decoded
/// last so it cannot create new entity spellings.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Count subheading markers in the raw body: HTML h2/h3 tags plus markdown
/// `##`/`###` heading lines.
pub fn count_subheadings(body: &str) -> usize {
    let lower = body.to_lowercase();
    let html_headings = lower.matches("<h2").count() + lower.matches("<h3").count();
    let md_headings = body
        .lines()
        .filter(|line| {
            let t = line.trim_start();
            t.starts_with("## ") || t.starts_with("### ")
        })
        .count();
    html_headings + md_headings
}
