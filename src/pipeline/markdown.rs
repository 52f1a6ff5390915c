//! Markdown rendering with syntax-highlighted code fences.
//!
//! Page authors are trusted content authors: raw HTML embedded in the
//! markdown source passes through unescaped. Code fences are the one
//! place escaping is enforced, so an untagged block can never inject
//! markup.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

/// Markdown-to-HTML renderer.
///
/// Typographic substitutions (smart quotes, dashes) are enabled. The
/// syntax set is loaded once and reused across all pages of a build.
pub struct MarkdownRenderer {
    options: Options,
    syntaxes: SyntaxSet,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self {
            options,
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render a markdown body to HTML.
    ///
    /// Code fences are intercepted before the HTML writer sees them:
    /// the fence text arrives unescaped, gets highlighted or escaped,
    /// and re-enters the stream as a finished HTML block.
    pub fn render(&self, source: &str) -> Result<String, syntect::Error> {
        let mut events = Vec::new();
        let mut fence: Option<String> = None;
        let mut code = String::new();

        for event in Parser::new_ext(source, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match &kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .unwrap_or_default()
                            .to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    fence = Some(lang);
                    code.clear();
                }
                Event::Text(text) if fence.is_some() => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let lang = fence.take().unwrap_or_default();
                    events.push(Event::Html(self.code_block(&code, &lang)?.into()));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }

    /// Produce the HTML for one code block.
    ///
    /// A known language tag yields class-based highlighted markup; an
    /// unknown or missing tag yields escaped literal text.
    fn code_block(&self, code: &str, lang: &str) -> Result<String, syntect::Error> {
        let syntax = (!lang.is_empty())
            .then(|| self.syntaxes.find_syntax_by_token(lang))
            .flatten();

        match syntax {
            Some(syntax) => {
                let mut generator = ClassedHTMLGenerator::new_with_class_style(
                    syntax,
                    &self.syntaxes,
                    ClassStyle::Spaced,
                );
                for line in LinesWithEndings::from(code) {
                    generator.parse_html_for_line_which_includes_newline(line)?;
                }
                Ok(format!(
                    "<pre><code class=\"language-{lang}\">{}</code></pre>\n",
                    generator.finalize()
                ))
            }
            None => Ok(format!(
                "<pre><code>{}</code></pre>\n",
                html_escape::encode_text(code)
            )),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
