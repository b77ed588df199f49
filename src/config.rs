
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, path::PathBuf};

/// Word vectors formats understood by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VectorFormat {
    /// pre-trained fastText vectors, word2vec text layout
    #[value(name = "ft")]
    FastText,
    /// word2vec vectors, text layout
    #[value(name = "w2v")]
    Word2Vec,
    /// GloVe trainer output directory (vecs.npy + words.txt)
    #[value(name = "glove")]
    Glove,
}

impl VectorFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorFormat::FastText => "ft",
            VectorFormat::Word2Vec => "w2v",
            VectorFormat::Glove => "glove",
        }
    }
}

impl Display for VectorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Command line of the candidates suggester.
#[derive(Parser, Clone, Debug)]
#[command(name = "crcr_suggester")]
#[command(about = "Suggest candidate answers for cryptic crossword clue divisions")]
#[command(version)]
pub struct Cli {
    /// Word vectors format: ft, w2v or glove
    #[arg(value_enum)]
    pub wv_format: VectorFormat,

    /// Word vectors file (.vec, .vec.gz) or GloVe output directory
    pub wv_file: PathBuf,

    /// Maximum number of vectors to load
    pub wv_limit: usize,

    /// Titles dictionaries json file
    pub titles_file: PathBuf,

    /// Definitions divisions json file
    pub divisions_file: PathBuf,

    /// Json file with suggester parameters
    #[arg(long, env = "CRCR_PARAMS")]
    pub params: Option<PathBuf>,

    /// Directory for the candidates files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Tunable parameters of the candidates search, every key is optional in the json file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggesterParams {
    /// neighbours requested from the vectors before length filtering
    pub top_n: usize,
    /// multiplier of `top_n` when too few candidates survive the filter
    pub widen_factor: usize,
    /// below this many candidates the search is widened
    pub min_candidates: usize,
    /// score of title words whose similarity can't be computed
    pub default_similarity: f32,
}

impl Default for SuggesterParams {
    fn default() -> Self {
        Self {
            top_n: 100,
            widen_factor: 4,
            min_candidates: 10,
            default_similarity: 1.0,
        }
    }
}

impl Display for SuggesterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using suggester params:
        top_n: {},
        widen_factor: {},
        min_candidates: {},
        default_similarity: {}",
        self.top_n, self.widen_factor, self.min_candidates, self.default_similarity
        )
    }
}


pub mod files_handling {

    use crate::candidates::CandidatesData;
    use crate::config::SuggesterParams;
    use crate::divisions::SuggesterData;
    use crate::error::Result;
    use crate::titles::TitlesDicts;

    use flate2::read::GzDecoder;
    use serde::{de::DeserializeOwned, Serialize};
    use std::fs::{self, File};
    use std::io::{BufRead, BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    const BOM: char = '\u{feff}';

    pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<<R as ReadFile>::Item> {
        let input = <R as ReadFile>::read_file(file_path)?;
        Ok(input)
    }

    /// Creates `output_dir` if needed and saves `item` under `file_name`, returns the written path.
    pub fn save_output<S: SaveFile + ?Sized>(output_dir: &Path, file_name: &str, item: &S) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        item.save_file(output_dir, file_name)
    }

    /// Opens a text file for line reading, gzip files (`.gz`) are decompressed on the fly.
    pub fn open_text(file_path: &Path) -> Result<Box<dyn BufRead>> {
        let f = File::open(file_path)?;
        let is_gz = file_path.extension().map_or(false, |ext| ext == "gz");
        if is_gz {
            Ok(Box::new(BufReader::new(GzDecoder::new(f))))
        } else {
            Ok(Box::new(BufReader::new(f)))
        }
    }

    // utf-8 with an optional byte order mark, as written by editors on windows
    fn read_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
        let content = fs::read_to_string(file_path)?;
        let item = serde_json::from_str(content.trim_start_matches(BOM))?;
        Ok(item)
    }

    fn write_json<T: Serialize + ?Sized>(output_dir: &Path, file_name: &str, item: &T) -> Result<PathBuf> {
        let out = output_dir.join(format!("{}.json", file_name));
        let mut f = BufWriter::new(File::create(&out)?);
        serde_json::to_writer(&mut f, item)?;
        f.flush()?;
        Ok(out)
    }

    pub trait ReadFile {
        type Item;
        fn read_file(file_path: &Path) -> Result<Self::Item>;
    }

    impl ReadFile for Vec<SuggesterData> {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            read_json(file_path)
        }
    }

    impl ReadFile for TitlesDicts {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            read_json(file_path)
        }
    }

    impl ReadFile for SuggesterParams {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            read_json(file_path)
        }
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf>;
    }

    impl SaveFile for [CandidatesData] {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            write_json(output_dir, file_name, self)
        }
    }

    impl SaveFile for TitlesDicts {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            write_json(output_dir, file_name, self)
        }
    }

}
