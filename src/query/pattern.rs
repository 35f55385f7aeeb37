//! SQL `ILIKE` semantics, reproduced in process.

const ESCAPE: char = '\\';

/// Escape `%`, `_` and the escape character so `text` matches literally.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `%text%` with `text` escaped.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}

/// A caller-supplied pattern made safe for Postgres: a dangling escape at the
/// end is doubled so it matches a literal backslash, as it does in [`ilike`].
pub fn user_pattern(pattern: &str) -> String {
    let trailing = pattern.chars().rev().take_while(|&c| c == ESCAPE).count();
    let mut safe = pattern.to_string();
    if trailing % 2 == 1 {
        safe.push(ESCAPE);
    }
    safe
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyMany,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => Token::AnyMany,
            '_' => Token::AnyOne,
            // trailing escape matches itself
            ESCAPE => Token::Literal(chars.next().unwrap_or(ESCAPE)),
            c => Token::Literal(c),
        };
        tokens.push(token);
    }
    tokens
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive `text ILIKE pattern`.
pub fn ilike(text: &str, pattern: &str) -> bool {
    let text = fold(text);
    let tokens: Vec<Token> = tokenize(pattern)
        .into_iter()
        .flat_map(|t| match t {
            Token::Literal(c) => c.to_lowercase().map(Token::Literal).collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::AnyMany) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|t| *t == Token::AnyMany)
}

/// Integer value of the trailing run of ASCII digits, as
/// `substring(col from '[0-9]+$')::numeric` sees it.
pub fn trailing_number(text: &str) -> Option<i64> {
    let digits = text
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text[text.len() - digits..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_user_pattern_pairs_dangling_escape() {
        assert_eq!(user_pattern("star"), "star");
        assert_eq!(user_pattern("star\\"), "star\\\\");
        assert_eq!(user_pattern("star\\\\"), "star\\\\");
        assert_eq!(user_pattern("\\\\\\"), "\\\\\\\\");
        assert_eq!(user_pattern("100\\%"), "100\\%");
    }

    #[test]
    fn test_user_pattern_keeps_in_process_meaning() {
        assert!(ilike("star\\", "star\\"));
        assert!(ilike("star\\", &user_pattern("star\\")));
        assert!(!ilike("star", &user_pattern("star\\")));
    }

    #[test]
    fn test_ilike_substring_is_case_insensitive() {
        assert!(ilike("Orion", &contains_pattern("orion")));
        assert!(ilike("β Orionis", &contains_pattern("ORION")));
        assert!(!ilike("Ursa Minor", &contains_pattern("orion")));
    }

    #[test]
    fn test_ilike_without_wildcards_is_exact() {
        assert!(ilike("Spiral Galaxy", "spiral galaxy"));
        assert!(!ilike("Barred Spiral Galaxy", "spiral galaxy"));
    }

    #[test]
    fn test_ilike_wildcards() {
        assert!(ilike("Planetary Nebula", "%nebula"));
        assert!(ilike("M42", "M_2"));
        assert!(ilike("anything", "%"));
        assert!(ilike("", "%"));
        assert!(!ilike("", "_"));
        assert!(ilike("aXbXc", "a%b%c"));
        assert!(!ilike("abc", "a%d"));
    }

    #[test]
    fn test_ilike_escaped_wildcard_is_literal() {
        assert!(ilike("100%", "100\\%"));
        assert!(!ilike("1000", "100\\%"));
    }

    #[test]
    fn test_ilike_unicode_folding() {
        assert!(ilike("Π³ ORIONIS", &contains_pattern("π³ orionis")));
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("M31"), Some(31));
        assert_eq!(trailing_number("NGC 0224"), Some(224));
        assert_eq!(trailing_number("31"), Some(31));
        assert_eq!(trailing_number("M31a"), None);
        assert_eq!(trailing_number(""), None);
        assert_eq!(trailing_number("M99999999999999999999999"), None);
    }
}
