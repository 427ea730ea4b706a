// src/content/render.rs
// =============================================================================
// Turns resolved content into text for the terminal.
//
// Plain text is printed as-is. Markdown goes through `pulldown-cmark`, which
// hands us a stream of events (start heading, text, end heading, ...). We
// walk that stream once and write a readable plain-text layout:
//
//   # Title          ->  Title
//                        =====
//   - item           ->  • item
//   [text](url)      ->  text (url)
//   ```code```       ->  four-space indented block
// =============================================================================

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use super::ResolvedContent;

/// Rendered text for a piece of resolved content.
pub fn render(content: &ResolvedContent) -> String {
    if content.render_as_markdown {
        render_markdown(&content.text)
    } else {
        content.text.clone()
    }
}

/// Renders Markdown into plain, terminal-friendly text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::new();

    // One entry per open list: Some(next number) for ordered lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut heading_start = 0;
    let mut in_code_block = false;
    let mut quote_depth = 0;
    let mut link_target: Option<String> = None;
    let mut link_text_start = 0;
    let mut cell_index = 0;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    if lists.is_empty() {
                        push_quote_prefix(&mut out, quote_depth);
                    }
                }
                Tag::Heading(..) => {
                    ensure_blank_line(&mut out);
                    heading_start = out.len();
                }
                Tag::BlockQuote => quote_depth += 1,
                Tag::CodeBlock(_) => {
                    ensure_newline(&mut out);
                    in_code_block = true;
                }
                Tag::List(first) => {
                    ensure_newline(&mut out);
                    lists.push(first);
                }
                Tag::Item => {
                    ensure_newline(&mut out);
                    let depth = lists.len().saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    match lists.last_mut() {
                        Some(Some(number)) => {
                            out.push_str(&format!("{}. ", number));
                            *number += 1;
                        }
                        _ => out.push_str("• "),
                    }
                }
                Tag::Link(_, dest, _) => {
                    link_target = Some(dest.to_string());
                    link_text_start = out.len();
                }
                Tag::Image(_, dest, _) => out.push_str(&format!("[image: {}", dest)),
                Tag::TableRow | Tag::TableHead => cell_index = 0,
                Tag::TableCell => {
                    if cell_index > 0 {
                        out.push_str(" | ");
                    }
                    cell_index += 1;
                }
                _ => {}
            },

            Event::End(tag) => match tag {
                Tag::Paragraph => {
                    if lists.is_empty() {
                        out.push_str("\n\n");
                    } else {
                        ensure_newline(&mut out);
                    }
                }
                Tag::Heading(level, ..) => {
                    let width = out[heading_start..].chars().count();
                    out.push('\n');
                    out.push_str(&underline(level).repeat(width.max(1)));
                    out.push_str("\n\n");
                }
                Tag::BlockQuote => {
                    quote_depth -= 1;
                }
                Tag::CodeBlock(_) => {
                    in_code_block = false;
                    ensure_blank_line(&mut out);
                }
                Tag::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        ensure_blank_line(&mut out);
                    }
                }
                Tag::Item => ensure_newline(&mut out),
                Tag::Link(..) => {
                    if let Some(dest) = link_target.take() {
                        // Autolinks already show the URL as their text.
                        if out[link_text_start..] != dest {
                            out.push_str(&format!(" ({})", dest));
                        }
                    }
                }
                Tag::Image(..) => out.push(']'),
                Tag::TableHead | Tag::TableRow => out.push('\n'),
                Tag::Table(_) => out.push('\n'),
                _ => {}
            },

            Event::Text(text) => {
                if in_code_block {
                    for line in text.lines() {
                        out.push_str("    ");
                        out.push_str(line);
                        out.push('\n');
                    }
                } else {
                    out.push_str(&text);
                }
            }
            Event::Code(code) => {
                out.push('`');
                out.push_str(&code);
                out.push('`');
            }
            Event::Html(html) => out.push_str(&html),
            Event::FootnoteReference(name) => out.push_str(&format!("[^{}]", name)),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => {
                out.push('\n');
                push_quote_prefix(&mut out, quote_depth);
            }
            Event::Rule => {
                ensure_newline(&mut out);
                out.push_str(&"─".repeat(40));
                out.push_str("\n\n");
            }
            Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
        }
    }

    let mut rendered = out.trim_end().to_string();
    rendered.push('\n');
    rendered
}

fn underline(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "=",
        _ => "-",
    }
}

fn push_quote_prefix(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("> ");
    }
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn ensure_blank_line(out: &mut String) {
    if out.is_empty() {
        return;
    }
    ensure_newline(out);
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        let content = ResolvedContent::plain("{ \"a\": [1, 2] }\n# not a heading");
        assert_eq!(render(&content), content.text);
    }

    #[test]
    fn test_heading_is_underlined() {
        let rendered = render_markdown("# Flames\n\nHunts go here.");
        assert_eq!(rendered, "Flames\n======\n\nHunts go here.\n");
    }

    #[test]
    fn test_subheading_uses_dashes() {
        let rendered = render_markdown("## Scope");
        assert_eq!(rendered, "Scope\n-----\n");
    }

    #[test]
    fn test_bullet_list() {
        let rendered = render_markdown("# Forge\n\n- a.md\n- tools/\n");
        assert_eq!(rendered, "Forge\n=====\n\n• a.md\n• tools/\n");
    }

    #[test]
    fn test_ordered_list_counts_from_start() {
        let rendered = render_markdown("3. three\n4. four\n");
        assert_eq!(rendered, "3. three\n4. four\n");
    }

    #[test]
    fn test_link_shows_target() {
        let rendered = render_markdown("See [MITRE](https://attack.mitre.org).");
        assert_eq!(rendered, "See MITRE (https://attack.mitre.org).\n");
    }

    #[test]
    fn test_autolink_not_duplicated() {
        let rendered = render_markdown("<https://example.com>");
        assert_eq!(rendered, "https://example.com\n");
    }

    #[test]
    fn test_code_block_is_indented() {
        let rendered = render_markdown("```\nlet x = 1;\n```\n");
        assert_eq!(rendered, "    let x = 1;\n");
    }

    #[test]
    fn test_escaped_listing_names_render_literally() {
        let rendered = render_markdown("- H\\_001\\_x.md\n");
        assert_eq!(rendered, "• H_001_x.md\n");
    }

    #[test]
    fn test_sentinel_renders_verbatim() {
        let content = ResolvedContent::sentinel();
        assert_eq!(render(&content), content.text);
        assert!(content.failed);
    }
}
