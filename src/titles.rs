//! Dictionaries built from Wikipedia article titles.
//!
//! `lookupDict` maps a word to the words that appear next to it in a two-word title,
//! `anagramDict` maps a sorted-letters key to the titles spelled with exactly those letters.

use crate::hebrew;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use tracing::info;

pub type LookupDict = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitlesDicts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_dict: Option<LookupDict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anagram_dict: Option<LookupDict>,
}

impl TitlesDicts {

    /// Words that form a title with every one of `words`.
    ///
    /// Needs at least two words and the first two must be in the lookup table. Later words
    /// that are missing from the table (or have no neighbours) don't narrow the result.
    pub fn shared_words<S: AsRef<str>>(&self, words: &[S]) -> BTreeSet<String> {

        let lookup = match &self.lookup_dict {
            Some(lookup) if words.len() > 1 => lookup,
            _ => return BTreeSet::new(),
        };

        let (first, second) = match (lookup.get(words[0].as_ref()), lookup.get(words[1].as_ref())) {
            (Some(first), Some(second)) => (first, second),
            _ => return BTreeSet::new(),
        };

        let second: BTreeSet<&String> = second.iter().collect();
        let mut shared: BTreeSet<String> = first
            .iter()
            .filter(|word| second.contains(word))
            .cloned()
            .collect();

        for word in &words[2..] {
            if let Some(next) = lookup.get(word.as_ref()).filter(|next| !next.is_empty()) {
                shared.retain(|w| next.contains(w));
            }
        }
        shared
    }

    /// Titles whose letters sort to `sorted_letters`.
    pub fn anagrams_of(&self, sorted_letters: &str) -> &[String] {
        self.anagram_dict
            .as_ref()
            .and_then(|dict| dict.get(sorted_letters))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Builds both dictionaries from a Wikipedia titles dump, one title per line, words separated by `_`.
    pub fn build<R: BufRead>(reader: R) -> std::io::Result<TitlesDicts> {

        let mut lookup_dict = LookupDict::new();
        let mut anagram_dict = LookupDict::new();
        let mut n_lines = 0;

        for line in reader.lines() {
            let line = line?;
            n_lines += 1;

            let words: Vec<String> = line.trim_end_matches('\r')
                .split('_')
                .map(hebrew::clean_diacritics)
                .collect();

            if is_lookupable(&words) {
                push_unique(&mut lookup_dict, &words[0], &words[1]);
                push_unique(&mut lookup_dict, &words[1], &words[0]);
            }

            let title = clean_title(&words);
            if !title.is_empty() {
                push_unique(&mut anagram_dict, &hebrew::sorted_letters(&title), &title);
            }
        }

        info!("read {} titles, {} lookup words, {} anagram keys", n_lines, lookup_dict.len(), anagram_dict.len());
        Ok(TitlesDicts {
            lookup_dict: Some(lookup_dict),
            anagram_dict: Some(anagram_dict),
        })
    }

}

// only the first two words of a title are used
fn is_lookupable(words: &[String]) -> bool {
    words.len() > 1
        && !words[1].starts_with('(')
        && hebrew::is_hebrew_word(&words[0])
        && hebrew::is_hebrew_word(&words[1])
        && !hebrew::is_stop_word(&words[1], words.len())
}

// keeps the leading hebrew words, a digit is accepted (and spelled) as the second word
fn clean_title(words: &[String]) -> String {
    let mut clean_words: Vec<String> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if hebrew::is_hebrew_word(word) {
            clean_words.push(word.to_owned());
        } else if i == 1 && hebrew::is_digit(word) {
            clean_words.push(hebrew::digit_to_hebrew(word));
        } else {
            break;
        }
    }
    clean_words.join(" ").trim().to_string()
}

fn push_unique(dict: &mut LookupDict, key: &str, value: &str) {
    let values = dict.entry(key.to_owned()).or_default();
    if !values.iter().any(|v| v == value) {
        values.push(value.to_owned());
    }
}
