//! Line-oriented reader for the range list.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads every non-blank line of `path`, trimmed.
pub fn read_range_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    parse_range_lines(BufReader::new(file))
}

pub fn parse_range_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_trims() {
        let input = "  10.0.0.0/24\n\n\t\n192.0.2.0/30  \r\nnot-a-cidr\n";
        let lines = parse_range_lines(input.as_bytes()).unwrap();
        assert_eq!(lines, vec!["10.0.0.0/24", "192.0.2.0/30", "not-a-cidr"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_range_lines(Path::new("/definitely/not/here/ranges.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
