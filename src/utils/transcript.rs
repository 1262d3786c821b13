//! Plain-text transcript formatting shared by `/save` and the session log.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::message::{Message, TranscriptRole};

pub const USER_PREFIX: &str = "You: ";

/// The text written for one message, or `None` for messages that stay on
/// screen only.
pub fn format_entry(msg: &Message) -> Option<String> {
    match msg.role {
        TranscriptRole::User => Some(format!("{USER_PREFIX}{}", msg.content)),
        TranscriptRole::Assistant | TranscriptRole::AppError => Some(msg.content.clone()),
        TranscriptRole::AppInfo => None,
    }
}

/// Write every exportable message to a new file. Existing files are left
/// untouched.
pub fn export<'a, I>(messages: I, path: &Path) -> Result<usize, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = &'a Message>,
{
    let entries: Vec<String> = messages.into_iter().filter_map(format_entry).collect();
    if entries.is_empty() {
        return Err("No conversation to save - the chat history is empty.".into());
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            format!(
                "File '{}' already exists. Please specify a different filename with /save <filename>.",
                path.display()
            )
            .into()
        } else {
            Box::<dyn std::error::Error>::from(e)
        }
    })?;

    let mut writer = BufWriter::new(file);
    for entry in &entries {
        write_block(&mut writer, entry)?;
    }
    writer.flush()?;
    Ok(entries.len())
}

/// One entry followed by the blank separator line.
pub(crate) fn write_block<W: Write>(writer: &mut W, content: &str) -> std::io::Result<()> {
    for line in content.lines() {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::FALLBACK_REPLY;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Vec<Message> {
        vec![
            Message::app_info("Welcome to Destin"),
            Message::user("Plan a trip"),
            Message::assistant("Sure!\nWhere to?"),
            Message::user("Paris"),
            Message::app_error(FALLBACK_REPLY),
        ]
    }

    #[test]
    fn export_writes_user_prefix_and_skips_info() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("trip.txt");

        let written = export(&sample(), &path).expect("export");
        assert_eq!(written, 4);

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            "You: Plan a trip\n\nSure!\nWhere to?\n\nYou: Paris\n\nError: could not reach server.\n\n"
        );
    }

    #[test]
    fn export_refuses_to_overwrite() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("trip.txt");
        fs::write(&path, "keep me").expect("seed");

        let err = export(&sample(), &path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "keep me");
    }

    #[test]
    fn export_of_empty_conversation_fails() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("empty.txt");
        let only_info = [Message::app_info("hello")];

        assert!(export(&only_info, &path).is_err());
        assert!(!path.exists());
    }
}
