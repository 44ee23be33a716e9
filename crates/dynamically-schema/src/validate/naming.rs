use crate::MAX_IDENT_LEN;

// Strict and reserved keywords across editions, plus the path keywords.
const RESERVED: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Ensure an identifier can be emitted verbatim into Rust source.
pub fn validate_ident(ident: &str) -> Result<(), String> {
    if ident.is_empty() {
        return Err("ident is empty".to_string());
    }
    if ident.len() > MAX_IDENT_LEN {
        return Err(format!("ident '{ident}' exceeds max length {MAX_IDENT_LEN}"));
    }
    if ident == "_" {
        return Err("ident '_' is a wildcard".to_string());
    }

    let mut chars = ident.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("ident '{ident}' is not a valid identifier"));
    }

    is_reserved(ident)
}

fn is_reserved(word: &str) -> Result<(), String> {
    if RESERVED.contains(&word) {
        return Err(format!("the word '{word}' is reserved"));
    }

    Ok(())
}
