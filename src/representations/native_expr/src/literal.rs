use crate::Number;

/// Converts the text of a character literal such as `'a'`, `L'\n'` or `'\x41'`.
pub fn character_literal_value(text: &str) -> Option<char> {
    let text = text.strip_prefix('L').unwrap_or(text);

    let inner = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .filter(|inner| !inner.is_empty())?;

    let Some(escape) = inner.strip_prefix('\\') else {
        let mut characters = inner.chars();
        let c = characters.next()?;
        return characters.next().is_none().then_some(c);
    };

    let simple = match escape {
        "\\" => Some('\\'),
        "'" => Some('\''),
        "\"" => Some('"'),
        "?" => Some('?'),
        "0" => Some('\0'),
        "a" => Some('\u{7}'),
        "b" => Some('\u{8}'),
        "f" => Some('\u{c}'),
        "n" => Some('\n'),
        "r" => Some('\r'),
        "t" => Some('\t'),
        "v" => Some('\u{b}'),
        _ => None,
    };

    if simple.is_some() {
        return simple;
    }

    let code = if let Some(hex) = escape.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(number) = escape.strip_prefix(['u', 'U']) {
        Number::parse_literal(number)?.as_i64()?.try_into().ok()?
    } else {
        u32::from_str_radix(escape, 8).ok()?
    };

    char::from_u32(code)
}

/// Strips the quotes (and wide prefix) from a string literal without interpreting escapes.
pub fn string_literal_value(text: &str) -> Option<&str> {
    let text = text.strip_prefix('L').unwrap_or(text);

    if text.len() < 2 {
        return None;
    }

    text.strip_prefix('"')?.strip_suffix('"')
}
