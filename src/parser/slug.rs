//! String helpers for specifications.

/// Turns `text` into a filename-safe slug.
///
/// German umlauts are transliterated (`ä` becomes `ae`, `ß` becomes `ss`),
/// accents are stripped from common Latin letters and any other non-ASCII
/// character is dropped. Runs of remaining non-alphanumeric characters
/// collapse into a single `-`; leading and trailing hyphens are trimmed.
/// Case is kept.
///
/// ```rust
/// use archive_core::parser::slug::slugify;
///
/// assert_eq!(slugify("Liebe Grüße aus Ovelgönne"), "Liebe-Gruesse-aus-Ovelgoenne");
/// assert_eq!(slugify("Hello ---- again!!"), "Hello-again");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        let ascii = match transliterate(c) {
            Some(ascii) => ascii,
            None if c.is_ascii() => {
                if c.is_ascii_alphanumeric() {
                    push_word(&mut slug, &mut pending_separator, c.encode_utf8(&mut [0; 4]));
                } else {
                    pending_separator = true;
                }
                continue;
            }
            None => continue,
        };
        push_word(&mut slug, &mut pending_separator, ascii);
    }

    slug
}

fn push_word(slug: &mut String, pending_separator: &mut bool, word: &str) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push_str(word);
}

fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'Ä' => "Ae",
        'Ö' => "Oe",
        'Ü' => "Ue",
        'ä' => "ae",
        'ö' => "oe",
        'ü' => "ue",
        'ß' => "ss",
        'À' | 'Á' | 'Â' | 'Ã' | 'Å' => "A",
        'à' | 'á' | 'â' | 'ã' | 'å' => "a",
        'Ç' => "C",
        'ç' => "c",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ñ' => "N",
        'ñ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ø' => "o",
        'Ù' | 'Ú' | 'Û' => "U",
        'ù' | 'ú' | 'û' => "u",
        'Ý' => "Y",
        'ý' | 'ÿ' => "y",
        _ => return None,
    };
    Some(ascii)
}

/// Uppercases the first character and leaves the rest alone.
pub fn capitalize_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
