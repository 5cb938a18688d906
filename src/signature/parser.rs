// Wed Jan 14 2026 - Alex

//! Reader for the plain-text `sig_v1` signature format.
//!
//! ```text
//! # sig_v1
//!
//! osCreateThread 0x0140 0x8C3F0A12 0x0B1D44E7
//!  .targ26 __osDisableInt 0x030
//!  .hi16 __osActiveQueue 0x048 0x0A0
//!  .lo16 __osActiveQueue 0x04C 0x0A8
//! ```
//!
//! A relocation directive may continue onto following lines for as long as
//! its tokens parse as numbers.

use crate::signature::{RelocKind, RelocationRecord, SignatureError, SignatureRecord};
use std::iter::Peekable;

/// Record together with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub line: usize,
    pub record: SignatureRecord,
}

struct Token<'a> {
    line: usize,
    text: &'a str,
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for (index, line) in source.lines().enumerate() {
        for text in line.split_whitespace() {
            if text.starts_with('#') {
                break;
            }
            tokens.push(Token { line: index + 1, text });
        }
    }
    tokens
}

/// Parse an unsigned number the way `strtoul(.., 0)` does: `0x` hex, leading
/// `0` octal, decimal otherwise. The whole token must be consumed.
pub fn parse_number(text: &str) -> Option<u32> {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

fn is_symbol_start(text: &str) -> bool {
    text.chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
}

pub fn parse_signatures(source: &str) -> Result<Vec<ParsedRecord>, SignatureError> {
    let tokens = tokenize(source);
    let mut tokens = tokens.into_iter().peekable();
    let mut records: Vec<ParsedRecord> = Vec::new();

    while let Some(token) = tokens.next() {
        if token.text.starts_with('.') {
            let kind: RelocKind = token
                .text
                .parse()
                .map_err(|_| SignatureError::parse(token.line, format!("invalid relocation directive '{}'", token.text)))?;

            let owner = records.last_mut().ok_or_else(|| {
                SignatureError::parse(token.line, "relocation directive before any symbol")
            })?;

            let name = tokens
                .next()
                .ok_or_else(|| SignatureError::parse(token.line, "relocation directive without a name"))?;

            let offsets = take_numbers(&mut tokens);
            owner.record.relocations.push(RelocationRecord {
                kind,
                name: name.text.to_string(),
                offsets,
            });
            continue;
        }

        if !is_symbol_start(token.text) {
            return Err(SignatureError::parse(token.line, format!("unexpected '{}'", token.text)));
        }

        let mut fields = [0u32; 3];
        for field in fields.iter_mut() {
            *field = tokens
                .next()
                .and_then(|t| parse_number(t.text))
                .ok_or_else(|| {
                    SignatureError::parse(token.line, format!("invalid parameters for symbol '{}'", token.text))
                })?;
        }

        let [size, crc_a, crc_b] = fields;
        records.push(ParsedRecord {
            line: token.line,
            record: SignatureRecord::new(token.text, size, crc_a, crc_b),
        });
    }

    Ok(records)
}

fn take_numbers<'a, I>(tokens: &mut Peekable<I>) -> Vec<u32>
where
    I: Iterator<Item = Token<'a>>,
{
    let mut numbers = Vec::new();
    while let Some(value) = tokens.peek().and_then(|t| parse_number(t.text)) {
        numbers.push(value);
        tokens.next();
    }
    numbers
}

/// Render records back into `sig_v1` text.
pub fn format_signatures<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a SignatureRecord>,
{
    let mut out = String::from("# sig_v1\n\n");
    for record in records {
        out.push_str(&format!(
            "{} 0x{:04X} 0x{:08X} 0x{:08X}\n",
            record.name, record.size, record.crc_a, record.crc_b
        ));
        for reloc in &record.relocations {
            out.push_str(&format!(" {:<7} {}", reloc.kind.directive(), reloc.name));
            for offset in &reloc.offsets {
                out.push_str(&format!(" 0x{:03X}", offset));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
