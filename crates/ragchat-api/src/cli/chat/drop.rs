//! Recognizing drag-and-drop in a terminal.
//!
//! Dragging files onto a terminal window pastes their paths into the prompt,
//! shell-quoted (`'/tmp/My File.pdf'`) or backslash-escaped
//! (`/tmp/My\ File.pdf`). A line made up only of paths to existing files is
//! treated as a drop. Terminals paste absolute paths, so relative ones never
//! count.

use std::path::PathBuf;

/// Paths dropped onto the prompt, or `None` if the line is ordinary text.
pub fn dropped_paths(line: &str) -> Option<Vec<PathBuf>> {
    let tokens = split_shell_words(line.trim())?;
    if tokens.is_empty() {
        return None;
    }

    let paths: Vec<PathBuf> = tokens
        .into_iter()
        .map(|token| PathBuf::from(token.strip_prefix("file://").unwrap_or(&token)))
        .collect();

    paths
        .iter()
        .all(|p| p.is_absolute() && p.is_file())
        .then_some(paths)
}

/// The path that gets uploaded from a drop, and how many others are ignored.
pub fn first_dropped(paths: Vec<PathBuf>) -> Option<(PathBuf, usize)> {
    let ignored = paths.len().saturating_sub(1);
    paths.into_iter().next().map(|first| (first, ignored))
}

/// Split on unquoted whitespace, honouring quotes and backslash escapes.
/// `None` if a quote is left open.
fn split_shell_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_shell_words() {
        assert_eq!(
            split_shell_words(r#"'/tmp/My File.pdf' /tmp/a\ b.txt "c d""#).unwrap(),
            vec!["/tmp/My File.pdf", "/tmp/a b.txt", "c d"]
        );
        assert!(split_shell_words("'unterminated").is_none());
    }

    #[test]
    fn test_existing_files_are_a_drop() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("My Report.pdf");
        let second = dir.path().join("notes.md");
        std::fs::write(&first, b"%PDF").unwrap();
        std::fs::write(&second, b"# hi").unwrap();

        let line = format!("'{}' {}", first.display(), second.display());
        let paths = dropped_paths(&line).unwrap();
        assert_eq!(paths, vec![first, second]);
    }

    #[test]
    fn test_only_first_dropped_path_is_kept() {
        let paths = vec![PathBuf::from("/tmp/a.pdf"), PathBuf::from("/tmp/b.pdf"), PathBuf::from("/tmp/c.pdf")];
        assert_eq!(first_dropped(paths), Some((PathBuf::from("/tmp/a.pdf"), 2)));
        assert_eq!(
            first_dropped(vec![PathBuf::from("/tmp/a.pdf")]),
            Some((PathBuf::from("/tmp/a.pdf"), 0))
        );
        assert_eq!(first_dropped(Vec::new()), None);
    }

    #[test]
    fn test_file_uri_prefix() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let paths = dropped_paths(&format!("file://{}", file.display())).unwrap();
        assert_eq!(paths, vec![file]);
    }

    #[test]
    fn test_ordinary_text_is_not_a_drop() {
        assert!(dropped_paths("What does chapter 2 say?").is_none());
        assert!(dropped_paths("   ").is_none());
    }

    #[test]
    fn test_mixed_text_and_path_is_not_a_drop() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();
        assert!(dropped_paths(&format!("summarize {}", file.display())).is_none());
    }

    #[test]
    fn test_relative_path_is_not_a_drop() {
        assert!(dropped_paths("Cargo.toml").is_none());
    }

    #[test]
    fn test_directory_is_not_a_drop() {
        let dir = tempdir().unwrap();
        assert!(dropped_paths(&dir.path().display().to_string()).is_none());
    }
}
