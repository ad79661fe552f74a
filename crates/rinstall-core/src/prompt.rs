//! Minimal line-based prompts.
//!
//! Both functions take any [`BufRead`] so they can be driven from stdin in
//! the binary and from in-memory buffers in tests.

use std::io::{self, BufRead};

/// Read one line and return it trimmed, or `default` if the line is empty
/// or cannot be read.
pub fn answer<R: BufRead>(reader: &mut R, default: &str) -> String {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(_) => {
            let line = line.trim();
            if line.is_empty() {
                default.to_string()
            } else {
                line.to_string()
            }
        }
        Err(e) => {
            log::warn!("Failed to read answer: {}", e);
            default.to_string()
        }
    }
}

/// Read one line and report whether it starts with `y` or `Y`. Anything
/// else, including an empty line or end of input, is a no.
pub fn yes<R: BufRead>(reader: &mut R) -> bool {
    answer(reader, "").to_uppercase().starts_with('Y')
}

/// [`yes`] on standard input
pub fn yes_stdin() -> bool {
    yes(&mut io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_answer() {
        let mut input = Cursor::new("  /opt/rinstall \n");
        assert_eq!(answer(&mut input, "/usr/local"), "/opt/rinstall");
    }

    #[test]
    fn test_answer_default_on_empty_line() {
        let mut input = Cursor::new("\n");
        assert_eq!(answer(&mut input, "/usr/local"), "/usr/local");

        let mut input = Cursor::new("   \n");
        assert_eq!(answer(&mut input, "fallback"), "fallback");
    }

    #[test]
    fn test_answer_default_on_eof() {
        let mut input = Cursor::new("");
        assert_eq!(answer(&mut input, "fallback"), "fallback");
    }

    #[test]
    fn test_answer_reads_one_line_at_a_time() {
        let mut input = Cursor::new("first\nsecond\n");
        assert_eq!(answer(&mut input, ""), "first");
        assert_eq!(answer(&mut input, ""), "second");
        assert_eq!(answer(&mut input, "done"), "done");
    }

    #[test]
    fn test_yes() {
        for input in ["y\n", "Y\n", "yes\n", "  YES  \n", "yep"] {
            assert!(yes(&mut Cursor::new(input)), "{:?} should be yes", input);
        }
    }

    #[test]
    fn test_no() {
        for input in ["n\n", "no\n", "\n", "", "maybe\n", " nope y\n"] {
            assert!(!yes(&mut Cursor::new(input)), "{:?} should be no", input);
        }
    }
}
