use nanoid::nanoid;

/// Alphabet for post and comment identifiers (no ambiguous glyphs).
const ENTITY_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const ENTITY_ID_LENGTH: usize = 16;

pub fn generate_entity_id() -> String {
    nanoid!(ENTITY_ID_LENGTH, ENTITY_ID_ALPHABET)
}

/// Returns `true` if `value` could have been produced by [`generate_entity_id`].
pub fn is_entity_id(value: &str) -> bool {
    value.chars().count() == ENTITY_ID_LENGTH && value.chars().all(|c| ENTITY_ID_ALPHABET.contains(&c))
}
