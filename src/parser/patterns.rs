use regex::Regex;

// Each pattern splits a line into the text before the operator (`rest`), the
// operator and the target running to end of line. The greedy `rest` makes the
// textually last operator the one that matches.
const STDERR_PATTERN: &str = r"^(?P<rest>(?:.*[ \t\f\v])?)2(?P<op>>>?)(?P<target>.*)$";
const STDOUT_PATTERN: &str = r"^(?P<rest>(?:.*[ \t\f\v])?)1?(?P<op>>>?)(?P<target>.*)$";
const STDIN_PATTERN: &str = r"^(?P<rest>(?:.*[ \t\f\v])?)<(?P<target>.*)$";

/// The redirection matchers, compiled once and shared by every parse.
#[derive(Debug, Clone)]
pub struct RedirectPatterns {
    pub(crate) stderr: Regex,
    pub(crate) stdout: Regex,
    pub(crate) stdin: Regex,
}

impl RedirectPatterns {
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            stderr: Regex::new(STDERR_PATTERN)?,
            stdout: Regex::new(STDOUT_PATTERN)?,
            stdin: Regex::new(STDIN_PATTERN)?,
        })
    }

    pub fn sources(&self) -> [&str; 3] {
        [self.stderr.as_str(), self.stdout.as_str(), self.stdin.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile() {
        let patterns = RedirectPatterns::compile().unwrap();
        assert_eq!(
            patterns.sources(),
            [STDERR_PATTERN, STDOUT_PATTERN, STDIN_PATTERN]
        );
    }

    #[test]
    fn test_stderr_pattern_needs_whitespace() {
        let patterns = RedirectPatterns::compile().unwrap();
        assert!(patterns.stderr.is_match("cmd 2> err"));
        assert!(patterns.stderr.is_match("cmd\t2>>err"));
        assert!(!patterns.stderr.is_match("cmd x2> err"));
        assert!(!patterns.stderr.is_match("cmd > out"));
    }

    #[test]
    fn test_stdout_pattern_takes_last_operator() {
        let patterns = RedirectPatterns::compile().unwrap();
        let caps = patterns.stdout.captures("echo a > one >> two").unwrap();
        assert_eq!(&caps["rest"], "echo a > one ");
        assert_eq!(&caps["op"], ">>");
        assert_eq!(&caps["target"], " two");
    }

    #[test]
    fn test_stdin_pattern() {
        let patterns = RedirectPatterns::compile().unwrap();
        let caps = patterns.stdin.captures("sort < in.txt").unwrap();
        assert_eq!(&caps["rest"], "sort ");
        assert_eq!(&caps["target"], " in.txt");
        assert!(!patterns.stdin.is_match("sort<in.txt"));
    }
}
