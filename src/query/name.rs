//! Catalogue shorthand in name searches (`M31`, `NGC224`, `IC 434`).

use super::Catalogue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameToken {
    Messier(i64),
    Ngc(i64),
    Ic(i64),
    Plain(String),
}

const PREFIXES: [(&str, fn(i64) -> NameToken); 3] = [
    ("NGC", NameToken::Ngc),
    ("IC", NameToken::Ic),
    ("M", NameToken::Messier),
];

impl NameToken {
    /// Prefixes are case-insensitive and need a digit suffix; whitespace
    /// between prefix and digits is allowed.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        for (prefix, token) in PREFIXES {
            let Some(head) = text.get(..prefix.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(prefix) {
                continue;
            }
            let digits = text[prefix.len()..].trim_start();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            if let Ok(number) = digits.parse() {
                return token(number);
            }
        }

        NameToken::Plain(text.to_string())
    }

    /// Catalogue and number for shorthand tokens.
    pub fn catalogue_number(&self) -> Option<(Catalogue, i64)> {
        match *self {
            NameToken::Messier(n) => Some((Catalogue::Messier, n)),
            NameToken::Ngc(n) => Some((Catalogue::Ngc, n)),
            NameToken::Ic(n) => Some((Catalogue::Ic, n)),
            NameToken::Plain(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messier_shorthand() {
        assert_eq!(NameToken::parse("M31"), NameToken::Messier(31));
        assert_eq!(NameToken::parse("m31"), NameToken::Messier(31));
        assert_eq!(NameToken::parse(" M 42 "), NameToken::Messier(42));
    }

    #[test]
    fn test_messier_shorthand_is_stable() {
        for _ in 0..3 {
            assert_eq!(
                NameToken::parse("M31").catalogue_number(),
                Some((Catalogue::Messier, 31))
            );
        }
    }

    #[test]
    fn test_ngc_and_ic_shorthand() {
        assert_eq!(NameToken::parse("NGC224"), NameToken::Ngc(224));
        assert_eq!(NameToken::parse("ngc 1976"), NameToken::Ngc(1976));
        assert_eq!(NameToken::parse("IC434"), NameToken::Ic(434));
    }

    #[test]
    fn test_prefix_without_digits_is_plain() {
        assert_eq!(NameToken::parse("Mira"), NameToken::Plain("Mira".into()));
        assert_eq!(NameToken::parse("M"), NameToken::Plain("M".into()));
        assert_eq!(NameToken::parse("NGC"), NameToken::Plain("NGC".into()));
        assert_eq!(NameToken::parse("M31a"), NameToken::Plain("M31a".into()));
        assert_eq!(NameToken::parse("Icarus"), NameToken::Plain("Icarus".into()));
    }

    #[test]
    fn test_multibyte_names_are_plain() {
        assert_eq!(
            NameToken::parse("β Cassiopeiae"),
            NameToken::Plain("β Cassiopeiae".into())
        );
    }

    #[test]
    fn test_oversized_number_is_plain() {
        let text = "M99999999999999999999999";
        assert_eq!(NameToken::parse(text), NameToken::Plain(text.into()));
    }
}
