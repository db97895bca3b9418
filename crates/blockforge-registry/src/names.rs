//! English display names derived from description ids such as
//! `block.deco.oak_lamp_block`.

use regex::{NoExpand, RegexBuilder};

const BLOCK_SUFFIX: &str = "_block";

/// [`display_name_with`] with the `_block` suffix stripped.
pub fn display_name(description_id: &str) -> String {
    display_name_with(description_id, true)
}

/// Title-cased name from the last segment of `description_id`.
///
/// `block.deco.deco_lamp_block` becomes `DECO Lamp`: the namespace word (the
/// segment before the name) is upper-cased wherever it appears, `_block` is
/// dropped unless `strip_block_suffix` is false or it is part of `_blocks`,
/// and "of"/"the" stay lower case between words.
pub fn display_name_with(description_id: &str, strip_block_suffix: bool) -> String {
    let raw = description_id
        .rsplit_once('.')
        .map_or(description_id, |(_, name)| name);
    let mut name = if strip_block_suffix {
        strip_block_suffixes(raw)
    } else {
        raw.to_owned()
    };
    name = capitalize_words(&name.replace('-', "_").replace('_', " "));
    if let Some(word) = namespace_word(description_id).filter(|w| !w.is_empty()) {
        name = replace_ignore_case(&name, word, &word.to_ascii_uppercase());
    }
    name.replace(" Of ", " of ").replace(" The ", " the ")
}

fn namespace_word(description_id: &str) -> Option<&str> {
    let (head, _) = description_id.rsplit_once('.')?;
    Some(head.rsplit_once('.').map_or(head, |(_, word)| word))
}

// Every "_block" not directly followed by 's'.
fn strip_block_suffixes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find(BLOCK_SUFFIX) {
        let after = &rest[pos + BLOCK_SUFFIX.len()..];
        out.push_str(&rest[..pos]);
        if after.starts_with('s') {
            out.push_str(BLOCK_SUFFIX);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    // An escaped literal always compiles; keep the input if it somehow doesn't.
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(haystack, NoExpand(replacement)).into_owned(),
        Err(_) => haystack.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_singular_block_suffix() {
        assert_eq!(strip_block_suffixes("lamp_block"), "lamp");
        assert_eq!(strip_block_suffixes("stone_blocks"), "stone_blocks");
        assert_eq!(strip_block_suffixes("a_block_block"), "a");
        assert_eq!(strip_block_suffixes("block"), "block");
    }

    #[test]
    fn namespace_word_segments() {
        assert_eq!(namespace_word("block.deco.lamp"), Some("deco"));
        assert_eq!(namespace_word("deco.lamp"), Some("deco"));
        assert_eq!(namespace_word("lamp"), None);
    }

    #[test]
    fn namespace_word_replaced_in_any_case() {
        assert_eq!(replace_ignore_case("Deco Lamp deco", "deco", "DECO"), "DECO Lamp DECO");
        assert_eq!(replace_ignore_case("A.b Ab", "a.b", "X"), "X Ab");
        assert_eq!(replace_ignore_case("cost $1", "$1", "$2"), "cost $2");
    }

    #[test]
    fn capitalizes_fully() {
        assert_eq!(capitalize_words("oAK  lamp"), "Oak  Lamp");
    }
}
