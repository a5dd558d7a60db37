//! Documentation rendering.
//!
//! Builds XML doc comments (C#) or JSDoc blocks (TypeScript) from schema
//! descriptions. Descriptions arrive with escaped angle brackets, raw
//! generic-bracket text, and callout pseudo-tags; everything is normalized
//! into the target's doc syntax. Embedded `<table>` markup is left as
//! literal escaped text because neither doc syntax can represent it.

use crate::emit::Language;
use crate::util::{indented, split_to_lines};

/// Column budget for wrapped doc-comment lines.
const DOC_LINE_WIDTH: usize = 120;

/// Accumulates the pieces of one doc comment and renders them per target.
#[derive(Debug, Default)]
pub struct DocBuilder {
    enabled: bool,
    language: Language,
    pub summary: Option<String>,
    pub see_also: Vec<String>,
    /// Parameter name and description pairs, in declaration order.
    pub params: Vec<(String, String)>,
    pub returns: Option<String>,
    pub deprecation: Option<String>,
}

impl DocBuilder {
    pub fn new(enabled: bool, language: Language) -> Self {
        Self {
            enabled,
            language,
            ..Default::default()
        }
    }

    /// Render the doc comment indented by `level`; empty when disabled or
    /// when there is nothing to say.
    pub fn generate(&self, level: usize) -> String {
        if !self.enabled {
            return String::new();
        }
        let empty = self.summary.is_none()
            && self.see_also.is_empty()
            && self.params.is_empty()
            && self.returns.is_none()
            && self.deprecation.is_none();
        if empty {
            return String::new();
        }
        match self.language {
            Language::CSharp => self.generate_xml(level),
            Language::TypeScript => self.generate_jsdoc(level),
        }
    }

    fn generate_xml(&self, level: usize) -> String {
        let mut lines = Vec::new();
        if let Some(summary) = &self.summary {
            lines.push("/// <summary>".to_string());
            for line in convert_description(summary, Language::CSharp) {
                lines.push(format!("/// {line}"));
            }
            lines.push("/// </summary>".to_string());
        }
        for (name, description) in &self.params {
            let text = convert_description(description, Language::CSharp).join(" ");
            lines.push(format!("/// <param name=\"{name}\">{text}</param>"));
        }
        if let Some(returns) = &self.returns {
            let text = convert_description(returns, Language::CSharp).join(" ");
            lines.push(format!("/// <returns>{text}</returns>"));
        }
        for target in &self.see_also {
            lines.push(format!("/// <seealso cref=\"{target}\"/>"));
        }
        indented(&lines.join("\n"), level)
    }

    fn generate_jsdoc(&self, level: usize) -> String {
        let mut lines = vec!["/**".to_string()];
        if let Some(summary) = &self.summary {
            for line in convert_description(summary, Language::TypeScript) {
                lines.push(format!(" * {line}"));
            }
        }
        for (name, description) in &self.params {
            let text = convert_description(description, Language::TypeScript).join(" ");
            lines.push(format!(" * @param {name} {text}"));
        }
        if let Some(returns) = &self.returns {
            let text = convert_description(returns, Language::TypeScript).join(" ");
            lines.push(format!(" * @returns {text}"));
        }
        for target in &self.see_also {
            lines.push(format!(" * @see {target}"));
        }
        if let Some(note) = &self.deprecation {
            lines.push(format!(" * @deprecated {note}"));
        }
        lines.push(" */".to_string());
        indented(&lines.join("\n"), level)
    }
}

/// Normalize a description into wrapped doc lines for the target.
///
/// Callout pseudo-tags become plain `Note:` / `Warning:` prefixes, angle
/// bracket escapes are canonicalized per target, and lines wrap at the doc
/// column budget. A description containing table markup is passed through
/// untouched, one line per input line.
pub fn convert_description(text: &str, language: Language) -> Vec<String> {
    if text.contains("<table>") || text.contains("&lt;table&gt;") {
        return text.lines().map(str::to_string).collect();
    }
    let mut converted = text
        .replace("<Note>", "Note: ")
        .replace("<note>", "Note: ")
        .replace("</Note>", "")
        .replace("</note>", "")
        .replace("<Warning>", "Warning: ")
        .replace("<warning>", "Warning: ")
        .replace("</Warning>", "")
        .replace("</warning>", "");
    // Canonicalize bracket escaping: raw generic-bracket text and
    // pre-escaped text end up identical per target.
    converted = converted.replace("&lt;", "<").replace("&gt;", ">");
    if language == Language::CSharp {
        converted = converted.replace('<', "&lt;").replace('>', "&gt;");
    }
    let mut lines = Vec::new();
    for paragraph in converted.lines() {
        let paragraph = paragraph.trim_end();
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(split_to_lines(paragraph, DOC_LINE_WIDTH));
    }
    lines
}
