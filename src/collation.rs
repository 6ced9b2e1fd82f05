//! Sibling ordering for account codes
//!
//! The tree builder never compares codes with `<`; it asks a [`CodeOrdering`].
//! [`LocaleCollation`] is the default and compares codes as natural text the way
//! a pt-BR browser collator does. [`SegmentOrdering`] is an opt-in alternative
//! that compares dotted segments numerically.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparator used to order sibling accounts by code
pub trait CodeOrdering: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> CodeOrdering for F
where
    F: Fn(&str, &str) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Ordering selected in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKind {
    #[default]
    Locale,
    Segments,
}

impl OrderingKind {
    pub fn comparator(&self) -> &'static dyn CodeOrdering {
        match self {
            OrderingKind::Locale => &LocaleCollation,
            OrderingKind::Segments => &SegmentOrdering,
        }
    }
}

/// Character classes in collation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Symbol,
    Digit,
    Letter,
}

/// Collation weights of a single character
#[derive(Debug, Clone, Copy)]
struct Weights {
    class: CharClass,
    base: char,
    accented: bool,
    upper: bool,
}

impl Weights {
    fn of(c: char) -> Self {
        let (base, accented) = fold_accent(c);
        let lower = base.to_lowercase().next().unwrap_or(base);
        let class = if c.is_whitespace() {
            CharClass::Whitespace
        } else if c.is_numeric() {
            CharClass::Digit
        } else if c.is_alphabetic() {
            CharClass::Letter
        } else if is_punctuation(c) {
            CharClass::Punctuation
        } else {
            CharClass::Symbol
        };
        Self {
            class,
            base: lower,
            accented,
            upper: c.is_uppercase(),
        }
    }

    fn primary(&self) -> (CharClass, char) {
        (self.class, self.base)
    }
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '_' | '-' | ',' | ';' | ':' | '!' | '?' | '.' | '\'' | '"' | '(' | ')' | '[' | ']'
            | '{' | '}' | '@' | '*' | '/' | '\\' | '&' | '#' | '%'
    )
}

/// Strips the diacritics used in Portuguese and the common Latin-1 ones
fn fold_accent(c: char) -> (char, bool) {
    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => return (c, false),
    };
    (base, true)
}

/// Locale-aware text comparison (pt-BR, numeric collation off)
///
/// Three levels, each consulted only when the previous one ties:
/// 1. character class then case- and accent-folded letter,
/// 2. unaccented before accented,
/// 3. lowercase before uppercase.
///
/// Codes are compared as text, so `"1.10"` sorts before `"1.2"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleCollation;

impl CodeOrdering for LocaleCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let wa: Vec<Weights> = a.chars().map(Weights::of).collect();
        let wb: Vec<Weights> = b.chars().map(Weights::of).collect();

        let primary = wa
            .iter()
            .map(Weights::primary)
            .cmp(wb.iter().map(Weights::primary));
        if primary != Ordering::Equal {
            return primary;
        }

        let secondary = wa
            .iter()
            .map(|w| w.accented)
            .cmp(wb.iter().map(|w| w.accented));
        if secondary != Ordering::Equal {
            return secondary;
        }

        wa.iter().map(|w| w.upper).cmp(wb.iter().map(|w| w.upper))
    }
}

/// Compares dotted codes segment by segment, numerically where both segments are digits
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentOrdering;

impl CodeOrdering for SegmentOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let mut left = a.split('.');
        let mut right = b.split('.');
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => {
                    let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                        // "01" and "1" are equal numerically; keep the text order between them
                        (Ok(nx), Ok(ny)) => nx.cmp(&ny).then_with(|| LocaleCollation.compare(x, y)),
                        _ => LocaleCollation.compare(x, y),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(ordering: &dyn CodeOrdering, input: &[&str]) -> Vec<String> {
        let mut v: Vec<&str> = input.to_vec();
        v.sort_by(|a, b| ordering.compare(a, b));
        v.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_locale_codes_as_text() {
        let out = sorted(&LocaleCollation, &["1.2", "1.10", "1.1", "2", "1"]);
        assert_eq!(out, vec!["1", "1.1", "1.10", "1.2", "2"]);
    }

    #[test]
    fn test_locale_case_and_accents() {
        assert_eq!(LocaleCollation.compare("a", "B"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("a", "A"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("caixa", "Caixa"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("e", "é"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("é", "f"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("Ativo", "ativo"), Ordering::Greater);
        assert_eq!(LocaleCollation.compare("1.1", "1.1"), Ordering::Equal);
    }

    #[test]
    fn test_locale_class_order() {
        // punctuation < digits < letters
        assert_eq!(LocaleCollation.compare(".", "0"), Ordering::Less);
        assert_eq!(LocaleCollation.compare("9", "a"), Ordering::Less);
        assert_eq!(LocaleCollation.compare(" ", "."), Ordering::Less);
    }

    #[test]
    fn test_segments_numeric() {
        let out = sorted(&SegmentOrdering, &["1.10", "1.2", "1.1", "1", "1.1.01"]);
        assert_eq!(out, vec!["1", "1.1", "1.1.01", "1.2", "1.10"]);
    }

    #[test]
    fn test_closure_ordering() {
        let reversed = |a: &str, b: &str| b.cmp(a);
        assert_eq!(sorted(&reversed, &["1", "2", "3"]), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_ordering_kind_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            ordering: OrderingKind,
        }
        let w: Wrapper = toml::from_str(r#"ordering = "segments""#).unwrap();
        assert_eq!(w.ordering, OrderingKind::Segments);
        assert_eq!(OrderingKind::default(), OrderingKind::Locale);
    }
}
