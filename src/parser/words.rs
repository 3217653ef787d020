use std::iter::Peekable;
use std::str::Chars;

use super::ParseError;
use crate::path::PathExpander;

/// Splits what is left of a line after redirection stripping into words,
/// applying quote removal, escapes, tilde and variable expansion.
#[derive(Debug, Clone)]
pub struct WordExpander {
    paths: PathExpander,
}

impl WordExpander {
    pub fn new(paths: PathExpander) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &PathExpander {
        &self.paths
    }

    pub fn expand(&self, input: &str) -> Result<Vec<String>, ParseError> {
        let mut words = Vec::new();
        let mut current = String::new();
        // A word exists once anything (even an empty quote pair) was seen.
        let mut in_word = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                '\'' => {
                    in_word = true;
                    self.single_quoted(&mut chars, &mut current)?;
                }
                '"' => {
                    in_word = true;
                    self.double_quoted(&mut chars, &mut current)?;
                }
                '\\' => {
                    in_word = true;
                    current.push(chars.next().unwrap_or('\\'));
                }
                '$' => {
                    in_word = true;
                    expand_variable(&mut chars, &mut current);
                }
                '~' if !in_word && ends_word(chars.peek()) => {
                    in_word = true;
                    match self.paths.home_dir() {
                        Ok(home) => current.push_str(&home.to_string_lossy()),
                        Err(_) => current.push('~'),
                    }
                }
                c => {
                    in_word = true;
                    current.push(c);
                }
            }
        }

        if in_word {
            words.push(current);
        }
        Ok(words)
    }

    fn single_quoted(&self, chars: &mut Peekable<Chars<'_>>, out: &mut String) -> Result<(), ParseError> {
        for c in chars.by_ref() {
            if c == '\'' {
                return Ok(());
            }
            out.push(c);
        }
        Err(ParseError::UnterminatedQuote('\''))
    }

    fn double_quoted(&self, chars: &mut Peekable<Chars<'_>>, out: &mut String) -> Result<(), ParseError> {
        while let Some(c) = chars.next() {
            match c {
                '"' => return Ok(()),
                '\\' => match chars.peek() {
                    Some(&next) if matches!(next, '"' | '\\' | '$') => {
                        out.push(next);
                        chars.next();
                    }
                    _ => out.push('\\'),
                },
                '$' => expand_variable(chars, out),
                c => out.push(c),
            }
        }
        Err(ParseError::UnterminatedQuote('"'))
    }
}

fn ends_word(next: Option<&char>) -> bool {
    match next {
        None => true,
        Some(&c) => c == '/' || c.is_whitespace(),
    }
}

/// Handles the text after a `$`. Unset variables expand to nothing; a `$` not
/// followed by a name stays literal.
fn expand_variable(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let mut name = String::new();

    if chars.peek() == Some(&'{') {
        let mut lookahead = chars.clone();
        lookahead.next();
        let braced: String = lookahead.by_ref().take_while(|&c| c != '}').collect();
        let closed = chars.clone().skip(1).any(|c| c == '}');
        if closed && is_name(&braced) {
            *chars = lookahead;
            out.push_str(&std::env::var(&braced).unwrap_or_default());
        } else {
            out.push('$');
        }
        return;
    }

    while let Some(&c) = chars.peek() {
        let valid = if name.is_empty() {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_'
        };
        if !valid {
            break;
        }
        name.push(c);
        chars.next();
    }

    if name.is_empty() {
        out.push('$');
    } else {
        out.push_str(&std::env::var(&name).unwrap_or_default());
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
