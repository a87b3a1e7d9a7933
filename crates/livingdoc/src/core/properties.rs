//! Parser for `key = value` properties text
//!
//! Supports the line-oriented properties syntax used by per-diagram settings
//! files: `#`/`!` comments, `=`/`:`/whitespace separators, backslash line
//! continuations and backslash escapes including `\uXXXX`.

use indexmap::IndexMap;
use thiserror::Error;

/// A malformed properties document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}")]
pub struct PropertiesError {
    pub line: usize,
    pub message: String,
}

/// Parsed properties in declaration order
///
/// A key declared twice keeps the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: IndexMap<String, String>,
}

impl Properties {
    /// Parse properties text
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let mut entries = IndexMap::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim_start_matches(is_blank);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let line_number = index + 1;
            let mut logical = line.to_string();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let error = |message| PropertiesError {
                line: line_number,
                message,
            };
            let key = unescape(key).map_err(error)?;
            let value = unescape(value).map_err(error)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd number of trailing backslashes continues the line
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let code = read_hex4(&mut chars)?;
                let code = match code {
                    0xD800..=0xDBFF => {
                        let mut lookahead = chars.clone();
                        match (lookahead.next(), lookahead.next()) {
                            (Some('\\'), Some('u')) => {
                                let low = read_hex4(&mut lookahead)?;
                                if (0xDC00..=0xDFFF).contains(&low) {
                                    chars = lookahead;
                                    0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                                } else {
                                    code
                                }
                            }
                            _ => code,
                        }
                    }
                    _ => code,
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("Unsupported unicode escape \\u{:04X}", code))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
        return Err("Malformed \\uxxxx encoding".to_string());
    }
    u32::from_str_radix(&hex, 16).map_err(|_| "Malformed \\uxxxx encoding".to_string())
}
