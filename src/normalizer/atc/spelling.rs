//! Spoken forms for digits, letters and cardinal numbers.

use num2words::Num2Words;

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

const NATO_ALPHABET: [&str; 26] = [
    "alfa", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliett",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "x-ray", "yankee", "zulu",
];

pub fn digit_word(c: char) -> Option<&'static str> {
    c.to_digit(10).map(|d| DIGIT_WORDS[d as usize])
}

/// NATO phonetic word for an ASCII letter, case-insensitive.
pub fn phonetic_word(c: char) -> Option<&'static str> {
    if !c.is_ascii_alphabetic() {
        return None;
    }
    let index = (c.to_ascii_lowercase() as u8 - b'a') as usize;
    Some(NATO_ALPHABET[index])
}

/// Spell every ASCII digit individually: `"350"` -> `"three five zero"`.
pub fn spell_digits(digits: &str) -> String {
    digits
        .chars()
        .filter_map(digit_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spell a code character by character, digits as numbers and letters
/// phonetically. Anything else is dropped.
pub fn spell_code(code: &str) -> String {
    code.chars()
        .filter_map(|c| digit_word(c).or_else(|| phonetic_word(c)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cardinal words for a whole number: `5000` -> `"five thousand"`.
///
/// Compound tens come back hyphenated from num2words; they are split into
/// separate words here.
pub fn cardinal(number: i64) -> String {
    match Num2Words::new(number).to_words() {
        Ok(words) => words.replace('-', " "),
        Err(_) => spell_digits(&number.to_string()),
    }
}
