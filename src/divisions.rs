//! Input records produced by the clue divider: one definition per clue and its divisions.

use crate::error::{Result, SuggesterError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One word length of the answer, written either as a number or as a numeric string.
///
/// Anything else is kept as `Other` so a single bad definition does not reject the whole file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordLength {
    Number(usize),
    Text(String),
    Other(Value),
}

impl WordLength {
    pub fn value(&self) -> Result<usize> {
        match self {
            WordLength::Number(n) => Ok(*n),
            WordLength::Text(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| SuggesterError::InvalidWordLength(s.to_owned())),
            WordLength::Other(v) => Err(SuggesterError::InvalidWordLength(v.to_string())),
        }
    }
}

/// A clue definition, echoed back unchanged in the candidates file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    #[serde(default)]
    pub verbal_clue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linguistic_clue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_length: Option<Vec<WordLength>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Definition {
    /// The answer word lengths, `None` when the definition has none.
    pub fn answer_lengths(&self) -> Option<Result<Vec<usize>>> {
        self.words_length
            .as_ref()
            .map(|lengths| lengths.iter().map(WordLength::value).collect())
    }
}

/// A division where one part's letters may be rearranged into the answer.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnagramDivision {
    /// the non-anagram words of the clue
    pub first_part: Option<Vec<String>>,
    /// the words whose letters compose the anagram
    pub second_part: Option<Vec<String>>,
    /// rearrangements of the second part, split to the answer word lengths
    pub anagrams: Option<Vec<Vec<String>>>,
    pub sorted_anagram_letters: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Divisions {
    pub multiword_divisions: Option<Vec<Vec<String>>>,
    pub anagram_divisions: Option<Vec<AnagramDivision>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SuggesterData {
    pub definition: Option<Definition>,
    pub divisions: Option<Divisions>,
}
