// Letter level helpers for Hebrew titles and clues.

const HEBREW_LETTERS: [char; 27] = [
    'א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט', 'י', 'כ', 'ך', 'ל', 'מ',
    'ם', 'נ', 'ן', 'ס', 'ע', 'פ', 'ף', 'צ', 'ץ', 'ק', 'ר', 'ש', 'ת',
];

// geresh, gershayim and their ascii look-alikes
const DIACRITIC_MARKS: [char; 5] = ['\'', '"', '״', '׳', '`'];

const STOP_WORDS: [&str; 3] = ["של", "או", "-"];

/// Maps a final letter form to its regular form, other letters are returned as is.
pub fn regular_form(letter: char) -> char {
    match letter {
        'ם' => 'מ',
        'ן' => 'נ',
        'ץ' => 'צ',
        'ף' => 'פ',
        'ך' => 'כ',
        _ => letter,
    }
}

pub fn is_hebrew_word(word: &str) -> bool {
    word.chars().all(|letter| HEBREW_LETTERS.contains(&letter))
}

/// Stop words only count in titles longer than two words.
pub fn is_stop_word(word: &str, sentence_length: usize) -> bool {
    sentence_length != 2 && STOP_WORDS.contains(&word)
}

pub fn clean_diacritics(word: &str) -> String {
    word.chars().filter(|c| !DIACRITIC_MARKS.contains(c)).collect()
}

pub fn is_digit(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

/// Spells a single digit in Hebrew (feminine form), other text is returned unchanged.
pub fn digit_to_hebrew(text: &str) -> String {
    let spelled = match text {
        "0" => "אפס",
        "1" => "אחת",
        "2" => "שתיים",
        "3" => "שלוש",
        "4" => "ארבע",
        "5" => "חמש",
        "6" => "שש",
        "7" => "שבע",
        "8" => "שמונה",
        "9" => "תשע",
        _ => text,
    };
    spelled.to_string()
}

/// The anagram key of a phrase: its letters without spaces, in regular form, sorted.
pub fn sorted_letters(phrase: &str) -> String {
    let mut letters: Vec<char> = phrase
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(regular_form)
        .collect();
    letters.sort_unstable();
    letters.into_iter().collect()
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn final_letters_map_to_regular_form() {
        assert_eq!(regular_form('ם'), 'מ');
        assert_eq!(regular_form('ך'), 'כ');
        assert_eq!(regular_form('ר'), 'ר');
    }

    #[test]
    fn hebrew_word_detection() {
        assert!(is_hebrew_word("שלום"));
        assert!(!is_hebrew_word("שלום1"));
        assert!(!is_hebrew_word("hello"));
        assert!(!is_hebrew_word("(סרט)"));
    }

    #[test]
    fn stop_words_ignored_in_two_word_titles() {
        assert!(is_stop_word("של", 3));
        assert!(is_stop_word("-", 4));
        assert!(!is_stop_word("של", 2));
        assert!(!is_stop_word("בית", 3));
    }

    #[test]
    fn diacritics_are_removed() {
        assert_eq!(clean_diacritics("צה\"ל"), "צהל");
        assert_eq!(clean_diacritics("ג׳ירפה"), "גירפה");
        assert_eq!(clean_diacritics("תשפ״ג"), "תשפג");
    }

    #[test]
    fn digits_are_spelled() {
        assert!(is_digit("7"));
        assert!(!is_digit("12"));
        assert!(!is_digit(""));
        assert_eq!(digit_to_hebrew("3"), "שלוש");
        assert_eq!(digit_to_hebrew("12"), "12");
    }

    #[test]
    fn sorted_letters_ignore_spaces_and_final_forms() {
        // "רמז" and "זמר" share letters, "מר ז" too once spaces and finals are normalized
        assert_eq!(sorted_letters("רמז"), sorted_letters("זמר"));
        assert_eq!(sorted_letters("זמר"), sorted_letters("זם ר"));
        assert_eq!(sorted_letters("cab"), "abc");
    }
}
