//! A small embedded rank table for the dictionary matcher.
//!
//! Loading a real frequency-ranked dictionary (and the leet/ambiguous
//! character-substitution tables that go with it) is explicitly out of
//! scope for this crate (see DESIGN.md). This table exists only so the
//! dictionary matcher -- and, through it, the Pruner/Randomness-Gate/
//! Exhaustive-Search stages it feeds -- has something real to chew on in
//! tests and doctests.
//!
//! Entries are ordered most-common-first; a word's rank is its 1-based
//! position. Deliberately excludes keyboard-walk words (`qwerty` and the
//! like): a dictionary hit's entropy is rank-based and so is typically far
//! cheaper than the same span's spatial-walk entropy, which would let the
//! Pruner discard the spatial candidate before the exhaustive search ever
//! sees it.

lazy_static! {
    pub static ref COMMON_PASSWORDS: std::collections::HashMap<&'static str, usize> = {
        const WORDS: &[&str] = &[
            "password",
            "123456",
            "letmein",
            "dragon",
            "baseball",
            "football",
            "monkey",
            "master",
            "superman",
            "access",
            "shadow",
            "trustno1",
            "hello",
            "freedom",
            "whatever",
            "ninja",
            "mustang",
            "welcome",
            "admin",
            "login",
            "princess",
            "sunshine",
            "iloveyou",
            "starwars",
        ];
        WORDS
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, i + 1))
            .collect()
    };
}

/// Maps a leeted character to the letters it commonly stands in for, the
/// way a dictionary matcher consults a substitution table before falling
/// back to brute force. Kept intentionally small.
lazy_static! {
    pub static ref LEET_SUBSTITUTIONS: std::collections::HashMap<char, char> = {
        [
            ('4', 'a'),
            ('@', 'a'),
            ('3', 'e'),
            ('1', 'i'),
            ('!', 'i'),
            ('0', 'o'),
            ('$', 's'),
            ('5', 's'),
            ('7', 't'),
        ]
        .into_iter()
        .collect()
    };
}
