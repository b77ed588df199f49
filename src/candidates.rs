
use crate::divisions::Definition;
use serde::{Serialize, Serializer};

/// A proposed answer and its similarity score.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub word: String,
    pub score: f32,
}

impl Candidate {
    pub fn new(word: impl Into<String>, score: f32) -> Self {
        Self { word: word.into(), score }
    }

    /// Length in letters, not bytes.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

// candidates are written as [word, score] pairs
impl Serialize for Candidate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
            (&self.word, self.score).serialize(serializer)
    }
}

/// Sorts by score in descending order, candidates with equal scores keep their order.
pub fn sort_by_score(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Keeps the candidates with exactly `length` letters.
pub fn filter_by_length(candidates: Vec<Candidate>, length: usize) -> Vec<Candidate> {
    candidates.into_iter().filter(|c| c.len() == length).collect()
}

pub fn is_insufficient(candidates: &[Candidate], min_candidates: usize) -> bool {
    candidates.len() < min_candidates
}


#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleWordMeasures {
    pub word: String,
    pub most_sim_words: Vec<Candidate>,
    pub most_sim_cosmul_words: Vec<Candidate>,
}

/// Candidates found in the titles dictionaries.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitlesMeasures {
    /// scored by vector similarity
    pub titles_most_sim_words: Vec<Candidate>,
    /// similarity could not be computed, scored by default or partial similarity
    pub titles_without_sim: Vec<Candidate>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiwordDivisionMeasures {
    pub single_word_measures: Vec<SingleWordMeasures>,
    pub most_sim_words: Vec<Candidate>,
    pub most_sim_cosmul_words: Vec<Candidate>,
    pub word_embedding_technique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titles_measures: Option<TitlesMeasures>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnagramDivisionMeasures {
    /// the anagram source words, joined with spaces
    pub clue_words: String,
    pub most_sim_measures: Vec<Candidate>,
    pub titles_measures: TitlesMeasures,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionsMeasures {
    pub multiword_divisions_measures: Vec<MultiwordDivisionMeasures>,
    pub anagram_divisions_measures: Vec<AnagramDivisionMeasures>,
}

/// Output record of one clue.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesData {
    pub divisions_measures: DivisionsMeasures,
    pub definition: Definition,
}


#[cfg(test)]
mod tests {

    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_candidates(n: usize, seed: u64) -> Vec<Candidate> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|i| {
            let word = "א".repeat(rng.gen_range(1..8));
            // coarse scores so that ties are frequent
            let score = rng.gen_range(0..5) as f32 / 4.0;
            Candidate::new(format!("{}{}", word, i), score)
        }).collect()
    }

    #[test]
    fn candidate_is_written_as_pair() {
        let json = serde_json::to_string(&Candidate::new("זמר", 0.5)).unwrap();
        assert_eq!(json, "[\"זמר\",0.5]");
    }

    #[test]
    fn length_counts_letters() {
        // three hebrew letters, six bytes
        assert_eq!(Candidate::new("זמר", 0.0).len(), 3);
    }

    #[test]
    fn filter_never_returns_other_lengths() {
        for seed in 0..10 {
            let candidates = random_candidates(200, seed);
            for length in 1..10 {
                let expected = candidates.iter().filter(|c| c.word.chars().count() == length).count();
                let filtered = filter_by_length(candidates.clone(), length);
                assert_eq!(filtered.len(), expected);
                assert!(filtered.iter().all(|c| c.len() == length));
            }
        }
    }

    #[test]
    fn sort_is_stable_descending() {
        let candidates = random_candidates(300, 42);
        let sorted = sort_by_score(candidates.clone());

        for pair in sorted.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        // words are unique, equal scores keep their input order
        let position = |c: &Candidate| candidates.iter().position(|x| x.word == c.word).unwrap();
        for pair in sorted.windows(2) {
            if pair[0].score == pair[1].score {
                assert!(position(&pair[0]) <= position(&pair[1]));
            }
        }
    }

    #[test]
    fn insufficient_below_minimum() {
        let candidates = random_candidates(9, 1);
        assert!(is_insufficient(&candidates, 10));
        assert!(!is_insufficient(&candidates, 9));
        assert!(is_insufficient(&[], 1));
    }
}
