//! String helpers shared by the emitters.
//!
//! Indentation and word wrapping are the only text-layout primitives the
//! emitters need; both targets build their declarations line by line.

/// Indent a value by `level` steps of four spaces.
///
/// Multi-line values get every line indented so pre-built blocks can be
/// nested without re-splitting at the call site.
pub fn indented(value: &str, level: usize) -> String {
    if level == 0 {
        return value.to_string();
    }
    let pad = "    ".repeat(level);
    value
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Word-wrap `text` at `max_line_length` columns.
///
/// Words longer than the budget are hard-split rather than overflowing the
/// line. Never yields an empty result for non-empty input.
pub fn split_to_lines(text: &str, max_line_length: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        if word.len() + line.len() <= max_line_length {
            line.push_str(word);
            line.push(' ');
        } else {
            if !line.is_empty() {
                lines.push(line.trim_end().to_string());
                line.clear();
            }
            let mut overflow = word;
            while overflow.len() > max_line_length {
                let Some(split) = boundary_at_or_before(overflow, max_line_length) else {
                    break;
                };
                lines.push(overflow[..split].to_string());
                overflow = &overflow[split..];
            }
            line.push_str(overflow);
            line.push(' ');
        }
    }
    lines.push(line.trim_end().to_string());
    lines
}

/// Largest char boundary in `s` that is positive and at most `at`. `None`
/// when the first character alone already exceeds the budget.
fn boundary_at_or_before(s: &str, at: usize) -> Option<usize> {
    let mut split = at.min(s.len());
    while split > 0 && !s.is_char_boundary(split) {
        split -= 1;
    }
    (split > 0).then_some(split)
}

/// Lowercase the first character, leaving the rest untouched.
///
/// TypeScript method names are lower camel case while the schema declares
/// them in upper camel case.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
