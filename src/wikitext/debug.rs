//! Developer Experience Tools
//!
//! Helpers for looking at what the tokenizer does.
//!
//! # Features
//! - Markup rendering: every token as `<span class="...">`
//! - State summaries for logs and assertions

use super::engine::Engine;
use super::highlight::highlight_document;
use super::state::State;
use std::fmt::{self, Write};

/// Append `text` to `out` with HTML special characters escaped
fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Render `text` as HTML-like markup, one `<span>` per styled span
///
/// Unstyled text is emitted as is (escaped); lines are joined with `\n`.
///
/// ```rust
/// use wikitext_lexer::wikitext::{render_markup, Engine, LanguageConfig};
///
/// let engine = Engine::new(LanguageConfig::default()).unwrap();
/// assert_eq!(
///     render_markup(&engine, "a ~~~~"),
///     "a <span class=\"mw-signature\">~~~~</span>"
/// );
/// ```
pub fn render_markup(engine: &Engine, text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 2);
    for (i, (line, spans)) in text
        .split('\n')
        .zip(highlight_document(engine, text))
        .enumerate()
    {
        if i > 0 {
            output.push('\n');
        }
        for span in spans {
            let slice = &line[span.range()];
            if span.style.is_empty() {
                escape_into(&mut output, slice);
                continue;
            }
            let _ = write!(output, "<span class=\"{}\">", engine.style_name(&span.style));
            escape_into(&mut output, slice);
            output.push_str("</span>");
        }
    }
    output
}

/// One-line description of a tokenizer state
///
/// ```text
/// context=TemplateArgument { expect_name: true } stack=1 template=1 link=0 ext=0 html=[] bold=false italic=false
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    /// Current context, as `Debug` output
    pub context: String,
    /// Depth of the resumption stack
    pub stack_depth: usize,
    /// Template nesting
    pub template_depth: u32,
    /// Link nesting
    pub link_depth: u32,
    /// Parser function nesting
    pub ext_depth: u32,
    /// Open HTML tags, innermost last
    pub open_html_tags: Vec<String>,
    /// Name of the extension tag whose body is being lexed
    pub extension: Option<String>,
    /// Bold is on
    pub bold: bool,
    /// Italic is on
    pub italic: bool,
}

impl StateSummary {
    /// Summarize `state`
    pub fn new(engine: &Engine, state: &State) -> Self {
        Self {
            context: format!("{:?}", state.context()),
            stack_depth: state.stack().len(),
            template_depth: state.template_depth(),
            link_depth: state.link_depth(),
            ext_depth: state.ext_depth(),
            open_html_tags: state.open_html_tags().to_vec(),
            extension: state
                .active_extension()
                .map(|active| engine.vocabulary().extension_entry(active.ext).name.clone()),
            bold: state.emphasis().bold,
            italic: state.emphasis().italic,
        }
    }
}

impl fmt::Display for StateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "context={} stack={} template={} link={} ext={} html=[{}]",
            self.context,
            self.stack_depth,
            self.template_depth,
            self.link_depth,
            self.ext_depth,
            self.open_html_tags.join(",")
        )?;
        if let Some(name) = &self.extension {
            write!(f, " extension={}", name)?;
        }
        write!(f, " bold={} italic={}", self.bold, self.italic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::config::LanguageConfig;
    use crate::wikitext::cursor::LineCursor;

    fn engine() -> Engine {
        Engine::new(LanguageConfig::default()).unwrap()
    }

    #[test]
    fn test_render_escapes_text() {
        let engine = engine();
        assert_eq!(render_markup(&engine, "a < b \"q\""), "a &lt; b &quot;q&quot;");
    }

    #[test]
    fn test_render_template() {
        let engine = engine();
        assert_eq!(
            render_markup(&engine, "{{Foo}}"),
            "<span class=\"mw-template-ground mw-template-bracket\">{{</span>\
             <span class=\"mw-template-ground mw-template-name mw-pagename\">Foo</span>\
             <span class=\"mw-template-ground mw-template-bracket\">}}</span>"
        );
    }

    #[test]
    fn test_render_keeps_line_breaks() {
        let engine = engine();
        let out = render_markup(&engine, "a\n\nb");
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn test_state_summary() {
        let engine = engine();
        let mut state = engine.start_state();
        let mut cursor = LineCursor::new("<b>{{Foo|");
        while !cursor.eol() {
            engine.token(&mut cursor, &mut state);
        }

        let summary = StateSummary::new(&engine, &state);
        assert_eq!(summary.template_depth, 1);
        assert_eq!(summary.open_html_tags, vec!["b".to_string()]);
        assert_eq!(summary.extension, None);

        let text = summary.to_string();
        assert!(text.starts_with("context=TemplateArgument"));
        assert!(text.contains("template=1"));
        assert!(text.contains("html=[b]"));
        assert!(text.ends_with("bold=false italic=false"));
    }
}
