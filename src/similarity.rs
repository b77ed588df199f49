use crate::candidates::Candidate;
use crate::config::{files_handling, VectorFormat};
use crate::error::{Result, SuggesterError};

use ndarray::{prelude::*, Zip};
use ndarray_npy::read_npy;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

// added to the (empty) product of negative terms in 3CosMul
const COSMUL_EPSILON: f32 = 1e-6;
// header counts are not trusted for allocation past these
const MAX_PRESIZE_ROWS: usize = 1 << 20;
const MAX_PRESIZE_VALUES: usize = 1 << 26;

/// In-memory word vectors with exhaustive cosine queries.
pub struct WordVectors {
    // unit length rows, zero rows stay zero
    unit: Array2<f32>,
    // l2 length of each raw row
    lengths: Array1<f32>,
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
}

impl WordVectors {

    pub fn from_rows(words: Vec<String>, mut w: Array2<f32>) -> Result<WordVectors> {

        if words.len() != w.nrows() {
            return Err(SuggesterError::InvalidVectors {
                path: String::from("<memory>"),
                reason: format!("{} words for {} vectors", words.len(), w.nrows()),
            });
        }

        let mut t2i: HashMap<String, usize> = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if t2i.insert(word.to_owned(), i).is_some() {
                return Err(SuggesterError::InvalidVectors {
                    path: String::from("<memory>"),
                    reason: format!("duplicate word {:?}", word),
                });
            }
        }

        // need to normalize w so each entry norm l2 is 1
        let mut lengths = Array1::<f32>::zeros(w.nrows());
        Zip::from(w.rows_mut()).and(&mut lengths).for_each(|mut row, length| {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|a| a / norm);
            }
            *length = norm;
        });

        Ok(Self { unit: w, lengths, t2i, i2t: words })
    }

    /// Loads at most `limit` vectors in the given format.
    pub fn load(format: VectorFormat, path: &Path, limit: usize) -> Result<WordVectors> {
        let timer = Instant::now();
        let vectors = match format {
            VectorFormat::FastText | VectorFormat::Word2Vec => {
                let reader = files_handling::open_text(path)?;
                Self::read_word2vec_text(reader, limit, &path.display().to_string())?
            },
            VectorFormat::Glove => Self::read_glove_output(path, limit)?,
        };
        info!("loaded {} vectors of dim {} from {}, took {} seconds", vectors.len(), vectors.dim(), path.display(), timer.elapsed().as_secs());
        Ok(vectors)
    }

    /// Reads the word2vec text layout: a `<count> <dim>` header, then one `<word> <values..>` line per vector.
    pub fn read_word2vec_text<R: BufRead>(reader: R, limit: usize, source: &str) -> Result<WordVectors> {

        let invalid = |reason: String| SuggesterError::InvalidVectors { path: source.to_owned(), reason };

        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(invalid("empty file".to_string())),
        };
        let header_fields: Vec<usize> = header
            .split_whitespace()
            .map(|field| field.parse::<usize>())
            .collect::<std::result::Result<Vec<usize>, _>>()
            .map_err(|_| invalid(format!("bad header {:?}", header)))?;
        let (count, dim) = match header_fields.as_slice() {
            [count, dim] => (*count, *dim),
            _ => return Err(invalid(format!("bad header {:?}", header))),
        };

        let expected = count.min(limit);
        let total = expected
            .checked_mul(dim)
            .filter(|_| dim < usize::MAX)
            .ok_or_else(|| invalid(format!("header {:?} is too large", header)))?;

        let reserve = expected.min(MAX_PRESIZE_ROWS);
        let mut words: Vec<String> = Vec::with_capacity(reserve);
        let mut values: Vec<f32> = Vec::with_capacity(total.min(MAX_PRESIZE_VALUES));
        let mut seen: HashSet<String> = HashSet::with_capacity(reserve);

        let mut read = 0;
        for (line_no, line) in lines.take(expected).enumerate() {
            let line = line?;
            read += 1;
            let parts: Vec<&str> = line.trim_end().split(' ').collect();
            if parts.len() != dim + 1 {
                return Err(invalid(format!("invalid vector on line {}", line_no + 2)));
            }

            let word = parts[0];
            if !seen.insert(word.to_owned()) {
                warn!("duplicate word {:?} in {}, ignoring all but first", word, source);
                continue;
            }

            for part in &parts[1..] {
                let value = part
                    .parse::<f32>()
                    .map_err(|_| invalid(format!("non numeric value {:?} on line {}", part, line_no + 2)))?;
                values.push(value);
            }
            words.push(word.to_owned());
        }

        if read < expected {
            return Err(invalid(format!("unexpected end of input, read {} of {} vectors", read, expected)));
        }

        let w = Array2::from_shape_vec((words.len(), dim), values)?;
        Self::from_rows(words, w)
    }

    /// Reads a GloVe trainer output directory: `vecs.npy` and the `words.txt` token to row json.
    pub fn read_glove_output(dir: &Path, limit: usize) -> Result<WordVectors> {

        let w: Array2<f32> = read_npy(dir.join("vecs.npy"))?;
        let t2i: HashMap<String, usize> = serde_json::from_reader(BufReader::new(File::open(dir.join("words.txt"))?))?;

        let rows = w.nrows().min(limit);
        let mut i2t: Vec<Option<String>> = vec![None; rows];
        for (token, i) in t2i {
            if i < rows {
                i2t[i] = Some(token);
            }
        }

        let words = i2t
            .into_iter()
            .enumerate()
            .map(|(i, token)| token.ok_or_else(|| SuggesterError::InvalidVectors {
                path: dir.display().to_string(),
                reason: format!("no token for row {}", i),
            }))
            .collect::<Result<Vec<String>>>()?;

        Self::from_rows(words, w.slice(s![..rows, ..]).to_owned())
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.unit.ncols()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.t2i.contains_key(token)
    }

    fn index_of(&self, token: &str) -> Result<usize> {
        match self.t2i.get(token) {
            Some(i) => Ok(*i),
            None => Err(SuggesterError::OutOfVocabulary(token.to_owned())),
        }
    }

    fn indices_of<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        if tokens.is_empty() {
            return Err(SuggesterError::EmptyQuery);
        }
        tokens.iter().map(|t| self.index_of(t.as_ref())).collect()
    }

    /// The vector of `token` as it was loaded.
    pub fn extract_vec_from_word(&self, token: &str) -> Result<Array1<f32>> {
        let i = self.index_of(token)?;
        Ok(&self.unit.row(i) * self.lengths[i])
    }

    /// The `topn` words closest (cosine) to the mean of the unit vectors of `positive`, query words excluded.
    pub fn most_similar<S: AsRef<str>>(&self, positive: &[S], topn: usize) -> Result<Vec<Candidate>> {

        let indices = self.indices_of(positive)?;

        let mut mean = Array1::<f32>::zeros(self.dim());
        for i in &indices {
            mean += &self.unit.row(*i);
        }
        mean /= indices.len() as f32;

        let scores = self.unit.dot(&unit_vec(mean));
        Ok(self.k_best(scores, &indices, topn))
    }

    /// 3CosMul with positive words only: the product of `(1 + cos) / 2` over the query words.
    pub fn most_similar_cosmul<S: AsRef<str>>(&self, positive: &[S], topn: usize) -> Result<Vec<Candidate>> {

        let indices = self.indices_of(positive)?;

        let mut scores = Array1::<f32>::ones(self.len());
        for i in &indices {
            let cos = self.unit.dot(&self.unit.row(*i));
            scores *= &cos.mapv(|x| (1.0 + x) / 2.0);
        }
        scores /= 1.0 + COSMUL_EPSILON;

        Ok(self.k_best(scores, &indices, topn))
    }

    /// Cosine similarity between the means of the vectors of two word sets.
    pub fn n_similarity<S: AsRef<str>, T: AsRef<str>>(&self, ws1: &[S], ws2: &[T]) -> Result<f32> {
        let v1 = self.mean_vector(ws1)?;
        let v2 = self.mean_vector(ws2)?;
        Ok(unit_vec(v1).dot(&unit_vec(v2)))
    }

    fn mean_vector<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Array1<f32>> {
        if tokens.is_empty() {
            return Err(SuggesterError::EmptyQuery);
        }
        let mut mean = Array1::<f32>::zeros(self.dim());
        for token in tokens {
            mean += &self.extract_vec_from_word(token.as_ref())?;
        }
        mean /= tokens.len() as f32;
        Ok(mean)
    }

    // ties are ordered by vocabulary index so a larger k always extends a smaller one
    fn k_best(&self, scores: Array1<f32>, exclude: &[usize], k: usize) -> Vec<Candidate> {

        let mut indexed_scores: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| !exclude.contains(i))
            .collect();

        let by_score = |a: &(usize, f32), b: &(usize, f32)| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0));
        if k < indexed_scores.len() {
            indexed_scores.select_nth_unstable_by(k, by_score);
            indexed_scores.truncate(k);
        }
        indexed_scores.sort_unstable_by(by_score);

        debug!("kept {} of {} scored words", indexed_scores.len(), scores.len());
        indexed_scores
            .into_iter()
            .map(|(i, score)| Candidate::new(self.i2t[i].clone(), score))
            .collect()
    }

}

fn unit_vec(v: Array1<f32>) -> Array1<f32> {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v / norm
    } else {
        v
    }
}
