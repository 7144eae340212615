use phf::phf_map;
use unicode_normalization::UnicodeNormalization;

static ND_CHARMAP: phf::Map<char, &'static str> = phf_map! {
    'Æ' => "AE",
    'æ' => "ae",
    'Ð' => "D",
    'ð' => "d",
    'Ø' => "O",
    'ø' => "o",
    'Þ' => "Th",
    'þ' => "th",
    'ß' => "ss",
    'Đ' => "D",
    'đ' => "d",
    'Ħ' => "H",
    'ħ' => "h",
    'ı' => "i",
    'Ł' => "L",
    'ł' => "l",
    'Ŋ' => "N",
    'ŋ' => "n",
    'Œ' => "Oe",
    'œ' => "oe",
    'Ŧ' => "T",
    'ŧ' => "t",
};

/// Folds text to ASCII: decomposed accents are dropped, a few ligatures and
/// special letters are transliterated, other non-latin letters become spaces.
fn fold_diacritics(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.nfkd() {
        if let Some(mapped) = ND_CHARMAP.get(&c) {
            result.push_str(mapped);
        } else if c.is_ascii() {
            result.push(c);
        } else if c.is_alphabetic() {
            result.push(' ');
        }
    }

    result
}

/// Builds URL friendly identifier of a movie from its title and release year,
/// e.g. `"Amélie", 2001` gives `amelie-2001`.
pub fn slugify(title: &str, year: i32) -> String {
    let folded = fold_diacritics(title);
    let mut slug = String::with_capacity(folded.len() + 5);
    let mut separate = false;

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if separate && !slug.is_empty() {
                slug.push('-');
            }
            separate = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            separate = true;
        }
    }

    if !slug.is_empty() {
        slug.push('-');
    }
    slug.push_str(&year.to_string());
    slug
}
