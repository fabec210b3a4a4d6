//! German (DIN 5007-1) ordering for display names.
//!
//! Umlauts and the accented Latin letters of neighbouring languages
//! (`š`, `č`, `ł`, ...) sort with their base letter, `ß` as `ss`, case is
//! ignored at the first level. Letters outside the fold table keep their
//! code point and sort after `z`. Ties are broken by preferring unaccented and lowercase
//! forms, and finally by plain code point order so the result is total.

use std::cmp::Ordering;

fn fold_char(ch: char, out: &mut String) {
    match ch {
        'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => out.push('c'),
        'ď' | 'đ' => out.push('d'),
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => out.push('e'),
        'ğ' | 'ģ' => out.push('g'),
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => out.push('i'),
        'ķ' => out.push('k'),
        'ł' | 'ľ' | 'ĺ' | 'ļ' => out.push('l'),
        'ñ' | 'ń' | 'ň' | 'ņ' => out.push('n'),
        'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ō' | 'ő' => out.push('o'),
        'ŕ' | 'ř' => out.push('r'),
        'ś' | 'š' | 'ş' | 'ș' => out.push('s'),
        'ť' | 'ţ' | 'ț' => out.push('t'),
        'ü' | 'ù' | 'ú' | 'û' | 'ū' | 'ů' | 'ű' | 'ų' => out.push('u'),
        'ý' | 'ÿ' => out.push('y'),
        'ź' | 'ż' | 'ž' => out.push('z'),
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'œ' => out.push_str("oe"),
        other => out.push(other),
    }
}

/// Base letters only, case folded.
fn primary_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        fold_char(ch, &mut key);
    }
    key
}

/// Case folded, accents kept.
fn secondary_key(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercase before uppercase at the same position.
fn tertiary(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Compare two strings the way a German dictionary orders them.
pub fn compare_german(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary(a, b))
        .then_with(|| a.cmp(b))
}
