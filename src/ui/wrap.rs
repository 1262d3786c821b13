use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

/// Words up to this width move to the next line whole; longer ones are
/// hard-broken.
const MAX_UNBREAKABLE_LENGTH: usize = 30;

/// Wrap spans to the provided width while preserving styles and word
/// boundaries. Always returns at least one (possibly empty) line.
pub fn wrap_spans_to_width(spans: &[Span<'static>], max_width: usize) -> Vec<Vec<Span<'static>>> {
    if spans.is_empty() {
        return vec![Vec::new()];
    }
    let max_width = max_width.max(1);
    let mut wrapped_lines = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for span in spans {
        let style = span.style;
        let mut text = span.content.to_string();
        while !text.is_empty() {
            if current_line.is_empty() && !wrapped_lines.is_empty() {
                text = text.trim_start().to_string();
                if text.is_empty() {
                    break;
                }
            }
            let mut chars_to_fit = 0usize;
            let mut width_so_far = 0usize;
            let mut last_break_pos: Option<usize> = None;
            for (char_pos, ch) in text.char_indices() {
                let cw = UnicodeWidthStr::width(ch.encode_utf8(&mut [0; 4]));
                if current_width + width_so_far + cw <= max_width {
                    width_so_far += cw;
                    chars_to_fit = char_pos + ch.len_utf8();
                    if ch.is_whitespace() {
                        last_break_pos = Some(char_pos + ch.len_utf8());
                    }
                } else {
                    if ch.is_whitespace() {
                        last_break_pos = Some(char_pos);
                    }
                    break;
                }
            }

            if chars_to_fit >= text.len() {
                current_line.push(Span::styled(text, style));
                current_width += width_so_far;
                break;
            }

            if chars_to_fit == 0 {
                // Nothing fits on this line
                if !current_line.is_empty() {
                    wrapped_lines.push(take_line(&mut current_line));
                    current_width = 0;
                    text = text.trim_start().to_string();
                    continue;
                }
                // A single character wider than the line; emit it alone.
                let first_len = text.chars().next().map(char::len_utf8).unwrap_or(text.len());
                current_line.push(Span::styled(text[..first_len].to_string(), style));
                wrapped_lines.push(take_line(&mut current_line));
                text = text[first_len..].to_string();
                continue;
            }

            match last_break_pos {
                Some(break_pos) => {
                    let left = text[..break_pos].trim_end();
                    if !left.is_empty() {
                        current_line.push(Span::styled(left.to_string(), style));
                    }
                    text = text[break_pos..].trim_start().to_string();
                    wrapped_lines.push(take_line(&mut current_line));
                    current_width = 0;
                }
                None => {
                    let word_end = text.find(char::is_whitespace).unwrap_or(text.len());
                    let word_width = UnicodeWidthStr::width(&text[..word_end]);
                    if current_width > 0 && word_width <= MAX_UNBREAKABLE_LENGTH {
                        // Start the word on the next line so it stays intact.
                        wrapped_lines.push(take_line(&mut current_line));
                        current_width = 0;
                        continue;
                    }
                    // Hard break the very long token
                    current_line.push(Span::styled(text[..chars_to_fit].to_string(), style));
                    text = text[chars_to_fit..].to_string();
                    wrapped_lines.push(take_line(&mut current_line));
                    current_width = 0;
                }
            }
        }
    }

    if !current_line.is_empty() || wrapped_lines.is_empty() {
        wrapped_lines.push(current_line);
    }
    wrapped_lines
}

/// Take the finished line, dropping whitespace left dangling at the break.
fn take_line(line: &mut Vec<Span<'static>>) -> Vec<Span<'static>> {
    let mut finished = std::mem::take(line);
    while let Some(last) = finished.last_mut() {
        let trimmed = last.content.trim_end();
        if trimmed.is_empty() {
            finished.pop();
        } else {
            if trimmed.len() != last.content.len() {
                *last = Span::styled(trimmed.to_string(), last.style);
            }
            break;
        }
    }
    finished
}

#[cfg(test)]
mod tests {
    use super::wrap_spans_to_width;
    use ratatui::style::{Modifier, Style};
    use ratatui::text::Span;

    fn texts(lines: &[Vec<Span<'static>>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn wrap_splits_at_spaces() {
        let spans = vec![Span::raw("word boundary test")];
        let wrapped = wrap_spans_to_width(&spans, 9);
        assert_eq!(texts(&wrapped), vec!["word", "boundary", "test"]);
    }

    #[test]
    fn long_tokens_are_hard_broken() {
        let spans = vec![Span::raw("a".repeat(40))];
        let wrapped = wrap_spans_to_width(&spans, 16);
        assert_eq!(
            texts(&wrapped),
            vec!["a".repeat(16), "a".repeat(16), "a".repeat(8)]
        );
    }

    #[test]
    fn styles_survive_wrapping() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let spans = vec![Span::raw("plain text "), Span::styled("bold words here", bold)];
        let wrapped = wrap_spans_to_width(&spans, 12);

        assert_eq!(texts(&wrapped), vec!["plain text", "bold words", "here"]);
        assert!(wrapped[1].iter().all(|span| span.style == bold));
        assert_eq!(wrapped[2][0].style, bold);
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        assert_eq!(wrap_spans_to_width(&[], 10), vec![Vec::new()]);
    }
}
