use crate::system::{CommandError, CommandOutput};

const TELEGRAM_TEXT_HARD_LIMIT: usize = 4096;
const TELEGRAM_TEXT_SAFE_LIMIT: usize = 3900;
const TRUNCATE_NOTICE: &str = "\n\n⚠️ (Output was truncated...)";
const OUTPUT_HEAD_LINES: usize = 50;
const OUTPUT_TAIL_LINES: usize = 10;

/// Collapse a command's stdout/stderr into one displayable body. Failed
/// exits always surface the status so a silent non-zero exit is visible.
pub(crate) fn command_body(output: &CommandOutput) -> String {
    let mut content = String::new();
    let stdout = limit_output_lines(output.stdout.trim());
    let stderr = limit_output_lines(output.stderr.trim());

    if !stdout.is_empty() {
        content.push_str(&stdout);
    }

    if !stderr.is_empty() {
        if !content.is_empty() {
            content.push_str("\n\n--- stderr ---\n");
        }
        content.push_str(&stderr);
    }

    if content.is_empty() {
        content.push_str("No output.");
    }

    if output.status != 0 {
        content.push_str(&format!("\n\n(exit status: {})", output.status));
    }

    content
}

pub(crate) fn as_html_block(title: &str, body: &str) -> String {
    let escaped_title = html_escape::encode_text(title);
    let body_budget = TELEGRAM_TEXT_SAFE_LIMIT.saturating_sub(TRUNCATE_NOTICE.len());
    let mut escaped_body = sanitize_and_truncate(body, body_budget);
    let was_truncated = html_escape::encode_text(body).len() > escaped_body.len();

    if was_truncated {
        escaped_body.push_str(TRUNCATE_NOTICE);
    }

    let message = format!("<b>{}</b>\n<pre>{}</pre>", escaped_title, escaped_body);
    if message.len() > TELEGRAM_TEXT_HARD_LIMIT {
        log::warn!("formatted Telegram message is close to hard limit");
    }
    message
}

pub(crate) fn command_error_html(error: &CommandError) -> String {
    format!(
        "<b>Command execution failed</b>\n<pre>{}</pre>",
        sanitize_and_truncate(&error.to_string(), TELEGRAM_TEXT_SAFE_LIMIT)
    )
}

// Very long output keeps its head and tail; the middle is rarely the
// interesting part of a command dump.
fn limit_output_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= OUTPUT_HEAD_LINES + OUTPUT_TAIL_LINES {
        return text.to_string();
    }

    let omitted = lines.len() - (OUTPUT_HEAD_LINES + OUTPUT_TAIL_LINES);
    format!(
        "{}\n... ({} lines omitted) ...\n{}",
        lines[..OUTPUT_HEAD_LINES].join("\n"),
        omitted,
        lines[lines.len() - OUTPUT_TAIL_LINES..].join("\n")
    )
}

/// HTML-escape `input`, keeping the escaped result within
/// `max_escaped_len` bytes without splitting a character.
fn sanitize_and_truncate(input: &str, max_escaped_len: usize) -> String {
    let escaped_full = html_escape::encode_text(input);
    if escaped_full.len() <= max_escaped_len {
        return escaped_full.into_owned();
    }

    let mut budget = max_escaped_len;
    let mut kept_bytes = 0usize;
    for ch in input.chars() {
        let mut buf = [0u8; 4];
        let escaped_len = html_escape::encode_text(ch.encode_utf8(&mut buf)).len();
        if escaped_len > budget {
            break;
        }
        budget -= escaped_len;
        kept_bytes += ch.len_utf8();
    }

    html_escape::encode_text(&input[..kept_bytes]).into_owned()
}
