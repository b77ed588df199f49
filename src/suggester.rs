//! Candidate answers for clue divisions.
//!
//! Two classes of cryptic clues are handled:
//!
//! - multiword expressions: the answer completes a phrase with each word of the division
//!   ("coin toss" -> "out", as in "toss out" and "coin out"), found with nearest neighbours
//!   of the division words and with the titles lookup table;
//! - anagrams: part of the clue is rearranged into the answer and the rest hints its meaning,
//!   candidates are scored by the similarity of the two parts.

use crate::candidates::{
    filter_by_length, is_insufficient, sort_by_score, AnagramDivisionMeasures, Candidate,
    CandidatesData, DivisionsMeasures, MultiwordDivisionMeasures, SingleWordMeasures,
    TitlesMeasures,
};
use crate::config::{SuggesterParams, VectorFormat};
use crate::divisions::{AnagramDivision, SuggesterData};
use crate::error::Result;
use crate::similarity::WordVectors;
use crate::titles::TitlesDicts;

use tracing::{debug, info, warn};

/// Nearest neighbours query kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measure {
    Cosine,
    CosMul,
}

/// True when `candidate_words` only reorders `clue_words`, e.g. "room blue" for "blue room".
pub fn is_shuffle_of<S: AsRef<str>, T: AsRef<str>>(candidate_words: &[S], clue_words: &[T]) -> bool {
    if candidate_words.len() != clue_words.len() {
        return false;
    }
    let mut candidate: Vec<&str> = candidate_words.iter().map(|w| w.as_ref()).collect();
    let mut clue: Vec<&str> = clue_words.iter().map(|w| w.as_ref()).collect();
    candidate.sort_unstable();
    clue.sort_unstable();
    candidate == clue
}

pub struct Suggester<'a> {
    vectors: &'a WordVectors,
    titles: &'a TitlesDicts,
    params: &'a SuggesterParams,
    technique: VectorFormat,
}

impl<'a> Suggester<'a> {

    pub fn new(vectors: &'a WordVectors, titles: &'a TitlesDicts, params: &'a SuggesterParams, technique: VectorFormat) -> Self {
        Self { vectors, titles, params, technique }
    }

    /// Candidates of every definition, definitions without word lengths are skipped.
    pub fn suggest(&self, data: &[SuggesterData]) -> Vec<CandidatesData> {
        data.iter().filter_map(|entry| self.suggest_one(entry)).collect()
    }

    fn suggest_one(&self, entry: &SuggesterData) -> Option<CandidatesData> {

        let definition = match &entry.definition {
            Some(definition) => definition,
            None => {
                warn!("skipping entry without definition");
                return None;
            }
        };
        info!("{}", definition.verbal_clue);

        let words_length = match definition.answer_lengths() {
            Some(Ok(lengths)) if !lengths.is_empty() => lengths,
            Some(Err(e)) => {
                warn!("skipping {:?}: {}", definition.verbal_clue, e);
                return None;
            },
            _ => {
                warn!("skipping {:?}: no words length", definition.verbal_clue);
                return None;
            }
        };

        let mut divisions_measures = DivisionsMeasures::default();
        if let Some(divisions) = &entry.divisions {
            if let Some(multiword_divisions) = &divisions.multiword_divisions {
                divisions_measures.multiword_divisions_measures = self.multiword_measures(multiword_divisions, &words_length);
            }
            if let Some(anagram_divisions) = &divisions.anagram_divisions {
                divisions_measures.anagram_divisions_measures = self.anagram_measures(anagram_divisions, &words_length);
            }
        }

        Some(CandidatesData {
            divisions_measures,
            definition: definition.clone(),
        })
    }

    /// Neighbours of `words` with exactly `length` letters, widening the search when too few are found.
    pub fn length_filtered(&self, measure: Measure, words: &[String], length: usize) -> Result<Vec<Candidate>> {

        let query = |topn: usize| -> Result<Vec<Candidate>> {
            let similar = match measure {
                Measure::Cosine => self.vectors.most_similar(words, topn)?,
                Measure::CosMul => self.vectors.most_similar_cosmul(words, topn)?,
            };
            Ok(filter_by_length(similar, length))
        };

        let candidates = query(self.params.top_n)?;
        if is_insufficient(&candidates, self.params.min_candidates) {
            debug!("{} {:?} candidates for {:?}, widening", candidates.len(), measure, words);
            return query(self.params.top_n * self.params.widen_factor);
        }
        Ok(candidates)
    }

    fn single_word_measures(&self, words: &[String], length: usize) -> Vec<SingleWordMeasures> {
        let mut measures = Vec::new();
        for word in words {
            let query = [word.to_owned()];
            let result = self.length_filtered(Measure::Cosine, &query, length)
                .and_then(|sim| Ok((sim, self.length_filtered(Measure::CosMul, &query, length)?)));
            match result {
                Ok((most_sim_words, most_sim_cosmul_words)) => measures.push(SingleWordMeasures {
                    word: word.to_owned(),
                    most_sim_words,
                    most_sim_cosmul_words,
                }),
                Err(e) => warn!("{}", e),
            }
        }
        measures
    }

    /// Measures of multiword expression divisions.
    ///
    /// Combined and titles measures are only computed for single word answers.
    pub fn multiword_measures(&self, divisions: &[Vec<String>], words_length: &[usize]) -> Vec<MultiwordDivisionMeasures> {

        let first_word_length = match words_length.first() {
            Some(length) => *length,
            None => return Vec::new(),
        };
        let single_word_answer = words_length.len() == 1;

        divisions.iter().map(|division| {

            let mut measures = MultiwordDivisionMeasures {
                word_embedding_technique: self.technique.as_str().to_string(),
                ..Default::default()
            };

            measures.single_word_measures = self.single_word_measures(division, first_word_length);

            if single_word_answer {
                let combined = self.length_filtered(Measure::Cosine, division, first_word_length)
                    .and_then(|sim| Ok((sim, self.length_filtered(Measure::CosMul, division, first_word_length)?)));
                match combined {
                    Ok((most_sim_words, most_sim_cosmul_words)) => {
                        measures.most_sim_words = most_sim_words;
                        measures.most_sim_cosmul_words = most_sim_cosmul_words;
                    },
                    Err(e) => warn!("{}", e),
                }

                if self.titles.lookup_dict.is_some() {
                    measures.titles_measures = Some(self.titles_measures(division, first_word_length));
                }
            }

            measures
        }).collect()
    }

    /// Words sharing a title with every division word, scored against the division.
    pub fn titles_measures(&self, words: &[String], length: usize) -> TitlesMeasures {

        let mut most_sim = Vec::new();
        let mut without_sim = Vec::new();

        for shared in self.titles.shared_words(words) {
            if shared.chars().count() != length {
                continue;
            }
            let similarity = self.vectors.n_similarity(words, &[shared.as_str()]);
            match similarity {
                Ok(score) => most_sim.push(Candidate::new(shared, score)),
                // the shared word or a division word has no vector
                Err(e) if e.is_out_of_vocabulary() => without_sim.push(Candidate::new(shared, self.params.default_similarity)),
                Err(e) => warn!("{:?} {:?}: {}", words, shared, e),
            }
        }

        TitlesMeasures {
            titles_most_sim_words: sort_by_score(most_sim),
            titles_without_sim: sort_by_score(without_sim),
        }
    }

    /// Measures of anagram divisions.
    pub fn anagram_measures(&self, divisions: &[AnagramDivision], words_length: &[usize]) -> Vec<AnagramDivisionMeasures> {

        divisions.iter().map(|division| {

            let mut measures = AnagramDivisionMeasures::default();
            if let Some(second_part) = &division.second_part {
                measures.clue_words = second_part.join(" ");
            }

            // no first part: the whole clue is both the anagram and its hint
            let first_part: &[String] = division.first_part.as_deref().unwrap_or_default();

            if let (Some(anagrams), Some(second_part), false) = (&division.anagrams, &division.second_part, first_part.is_empty()) {
                let mut scored = Vec::new();
                for group in anagrams {
                    if group.is_empty() || is_shuffle_of(group, second_part) {
                        continue;
                    }
                    // most anagrams are not words
                    if let Ok(score) = self.vectors.n_similarity(first_part, group) {
                        scored.push(Candidate::new(group.join(" "), score));
                    }
                }
                measures.most_sim_measures = sort_by_score(scored);
            }

            if let (Some(letters), Some(second_part), Some(_)) = (&division.sorted_anagram_letters, &division.second_part, &self.titles.anagram_dict) {
                measures.titles_measures = self.titles_anagram_measures(letters, first_part, second_part, words_length);
            }

            measures
        }).collect()
    }

    /// Titles spelled with the anagram letters, scored against the hint part of the clue.
    pub fn titles_anagram_measures(&self, sorted_letters: &str, non_anagram_words: &[String], anagram_words: &[String], words_length: &[usize]) -> TitlesMeasures {

        let mut most_sim = Vec::new();
        let mut without_sim = Vec::new();

        if sorted_letters.is_empty() {
            return TitlesMeasures::default();
        }

        let hint_words = if non_anagram_words.is_empty() { anagram_words } else { non_anagram_words };

        for title in self.titles.anagrams_of(sorted_letters) {
            let title_words: Vec<&str> = title.split_whitespace().collect();
            if is_shuffle_of(&title_words, anagram_words) {
                continue;
            }

            let title_lengths: Vec<usize> = title_words.iter().map(|w| w.chars().count()).collect();
            if title_lengths != words_length {
                continue;
            }

            match self.vectors.n_similarity(hint_words, &title_words) {
                Ok(score) => most_sim.push(Candidate::new(title.to_owned(), score)),
                Err(_) => {
                    let score = self.partial_similarity(&title_words, hint_words);
                    without_sim.push(Candidate::new(title.to_owned(), score));
                }
            }
        }

        TitlesMeasures {
            titles_most_sim_words: sort_by_score(most_sim),
            titles_without_sim: sort_by_score(without_sim),
        }
    }

    /// Similarity of the in-vocabulary title words and hint words, when most hint words have vectors.
    pub fn partial_similarity<S: AsRef<str>>(&self, title_words: &[S], hint_words: &[String]) -> f32 {

        let title_known: Vec<&str> = title_words.iter().map(|w| w.as_ref()).filter(|w| self.vectors.contains(w)).collect();
        if title_known.is_empty() {
            return self.params.default_similarity;
        }

        let hint_known: Vec<&str> = hint_words.iter().map(|w| w.as_str()).filter(|w| self.vectors.contains(w)).collect();
        if hint_known.len() * 2 > hint_words.len() {
            if let Ok(score) = self.vectors.n_similarity(&hint_known, &title_known) {
                return score;
            }
        }
        self.params.default_similarity
    }

}
