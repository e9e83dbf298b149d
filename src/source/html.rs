//! Minimal HTML slicing for the fare results page
//!
//! Not a parser. Finds elements by class token and returns their text with
//! nested tags stripped, which is all the results page needs.

/// Inner text of every element carrying `class` as a whole class token
pub fn texts_with_class(html: &str, class: &str) -> Vec<String> {
    let mut texts = Vec::new();
    let mut from = 0;

    while let Some(rel) = html[from..].find(class) {
        let at = from + rel;
        from = at + class.len();

        if !is_class_token(html, at, class.len()) {
            continue;
        }
        let Some(tag_start) = html[..at].rfind('<') else {
            continue;
        };
        // the match must sit inside the opening tag, not in text after it
        if html[tag_start..at].contains('>') {
            continue;
        }
        if let Some((inner, end)) = element_inner(html, tag_start) {
            texts.push(strip_tags(inner));
            from = end;
        }
    }

    texts
}

/// Slice from the element whose `id` attribute equals `id` up to the next
/// element whose id is one of `stop_ids` (or end of document)
pub fn section_from_id<'a>(html: &'a str, id: &str, stop_ids: &[&str]) -> Option<&'a str> {
    let start = find_id(html, id, 0)?;
    let end = stop_ids
        .iter()
        .filter_map(|stop| find_id(html, stop, start + 1))
        .min()
        .unwrap_or(html.len());
    Some(&html[start..end])
}

fn find_id(html: &str, id: &str, from: usize) -> Option<usize> {
    let double = format!("id=\"{}\"", id);
    let single = format!("id='{}'", id);
    let tail = html.get(from..)?;
    [tail.find(&double), tail.find(&single)]
        .into_iter()
        .flatten()
        .min()
        .map(|rel| from + rel)
}

fn is_class_token(html: &str, at: usize, len: usize) -> bool {
    let bytes = html.as_bytes();
    let boundary = |b: u8| b == b'"' || b == b'\'' || b.is_ascii_whitespace();
    let before_ok = at > 0 && boundary(bytes[at - 1]);
    let after_ok = bytes.get(at + len).map(|b| boundary(*b)).unwrap_or(false);
    before_ok && after_ok
}

/// Inner HTML of the element opening at `tag_start`, plus the byte offset
/// just past its closing tag. Same-name nesting is balanced.
fn element_inner(html: &str, tag_start: usize) -> Option<(&str, usize)> {
    let open_end = html[tag_start..].find('>')? + tag_start + 1;
    let name: String = html[tag_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    if html[tag_start..open_end].ends_with("/>") {
        return Some(("", open_end));
    }

    let lc = html.to_ascii_lowercase();
    let open_pat = format!("<{}", name);
    let close_pat = format!("</{}", name);
    let mut depth = 1usize;
    let mut cursor = open_end;

    loop {
        let next_close = lc[cursor..].find(&close_pat)? + cursor;
        let next_open = lc[cursor..]
            .find(&open_pat)
            .map(|rel| rel + cursor)
            .filter(|pos| *pos < next_close && is_tag_name_end(&lc, *pos + open_pat.len()));

        match next_open {
            Some(pos) => {
                depth += 1;
                cursor = pos + open_pat.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    let close_end = lc[next_close..].find('>')? + next_close + 1;
                    return Some((&html[open_end..next_close], close_end));
                }
                cursor = next_close + close_pat.len();
            }
        }
    }
}

fn is_tag_name_end(lc: &str, pos: usize) -> bool {
    lc.as_bytes()
        .get(pos)
        .map(|b| *b == b'>' || *b == b'/' || b.is_ascii_whitespace())
        .unwrap_or(false)
}

/// Drop tags, decode the two entities the page uses, collapse whitespace
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    let decoded = out.replace("&nbsp;", " ").replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
