//! Pure literal parsing: integer text, character names, string escapes.

/// Parse integer literal text: optional sign, then decimal or `0x` hex.
pub(crate) fn parse_integer(text: &str) -> Option<i128> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = u128::from_str_radix(digits, radix).ok()?;
    if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
}

/// True if `value` is representable in `bits` bits.
pub(crate) fn fits(value: i128, bits: u32, signed: bool) -> bool {
    if bits >= 128 {
        return signed || value >= 0;
    }
    if signed {
        let max = (1i128 << (bits - 1)) - 1;
        (-max - 1..=max).contains(&value)
    } else {
        (0..(1i128 << bits)).contains(&value)
    }
}

/// Outcome of reading `#\...` syntax.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum CharLiteral {
    /// Not character syntax at all.
    NotChar,
    /// Character syntax naming this byte (`EOF` is -1).
    Byte(i8),
    /// Character syntax with an unknown name.
    Invalid,
}

/// Read a `#\NAME` or `#\c` character literal.
pub(crate) fn parse_char(text: &str) -> CharLiteral {
    let Some(body) = text.strip_prefix("#\\").filter(|body| !body.is_empty()) else {
        return CharLiteral::NotChar;
    };
    let byte = match body {
        "NULL" => 0,
        "TAB" => b'\t',
        "SPACE" => b' ',
        "NEWLINE" => b'\n',
        "CARRIAGE" => b'\r',
        "EOF" => return CharLiteral::Byte(-1),
        _ => match body.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => return CharLiteral::Invalid,
        },
    };
    // ASCII always fits
    CharLiteral::Byte(i8::try_from(byte).unwrap_or(i8::MAX))
}

/// Translate string literal text into its stored bytes: every two-character
/// `\n` becomes a newline byte and one NUL terminator is appended.
pub fn translate_string_literal(text: &str) -> Vec<u8> {
    let mut bytes = text.replace("\\n", "\n").into_bytes();
    bytes.push(0);
    bytes
}
