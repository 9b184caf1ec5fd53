/// Character for an entity or character reference, given the text between
/// `&` and `;`.
///
/// Covers the five predefined entities and numeric references.
///
/// # Examples
///
/// ```
/// use cellscan::common::xml::resolve_entity;
/// assert_eq!(resolve_entity(b"amp"), Some('&'));
/// assert_eq!(resolve_entity(b"#x3042"), Some('あ'));
/// assert_eq!(resolve_entity(b"#65"), Some('A'));
/// assert_eq!(resolve_entity(b"nbsp"), None);
/// ```
pub fn resolve_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => {
            let hex = std::str::from_utf8(hex).ok()?;
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        },
        [b'#', dec @ ..] => atoi_simd::parse::<u32>(dec).ok().and_then(char::from_u32),
        _ => None,
    }
}

/// Append the resolved reference to `out`.
///
/// Unknown references are kept literally as `&name;`.
pub fn push_entity(out: &mut String, name: &[u8]) {
    match resolve_entity(name) {
        Some(c) => out.push(c),
        None => {
            out.push('&');
            out.push_str(&String::from_utf8_lossy(name));
            out.push(';');
        },
    }
}
