
use crate::config::{files_handling, Cli, SuggesterParams, VectorFormat};
use crate::divisions::SuggesterData;
use crate::error::Result;
use crate::similarity::WordVectors;
use crate::suggester::Suggester;
use crate::titles::TitlesDicts;

use chrono::Local;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

const STOP_COMMANDS: [&str; 3] = ["stop", "quit", "exit"];


/// Loaded vectors and dictionaries, ready to answer divisions files one after the other.
pub struct Run {
    vectors: WordVectors,
    titles: TitlesDicts,
    params: SuggesterParams,
    technique: VectorFormat,
    output_dir: PathBuf,
}

impl Run {

    pub fn new(vectors: WordVectors, titles: TitlesDicts, params: SuggesterParams, technique: VectorFormat, output_dir: PathBuf) -> Run {
        Self { vectors, titles, params, technique, output_dir }
    }

    /// Loads everything `cli` names, then serves divisions files until a stop command on stdin.
    pub fn run(cli: Cli) -> Result<()> {

        info!("running with {:?}", cli);

        let params = match &cli.params {
            Some(path) => files_handling::read_input::<SuggesterParams>(path)?,
            None => SuggesterParams::default(),
        };
        info!("{}", params);

        info!("loading word vectors file...");
        let vectors = WordVectors::load(cli.wv_format, &cli.wv_file, cli.wv_limit)?;
        info!("word vectors file was loaded");

        info!("loading titles dict file...");
        let titles = files_handling::read_input::<TitlesDicts>(&cli.titles_file)?;
        info!("titles dict file was loaded");

        let run = Run::new(vectors, titles, params, cli.wv_format, cli.output_dir);
        let stdin = io::stdin();
        run.serve(cli.divisions_file, stdin.lock())?;
        Ok(())
    }

    /// Processes `first` and every path read from `input`, returns the candidates files written.
    ///
    /// Failures of a single file are logged and the next path is requested.
    pub fn serve<R: BufRead>(&self, first: PathBuf, mut input: R) -> Result<Vec<PathBuf>> {

        let mut written: Vec<PathBuf> = Vec::new();
        let mut divisions_file = first;

        loop {
            match self.process_file(&divisions_file) {
                Ok(out) => written.push(out),
                Err(e) => error!("{}: {}", divisions_file.display(), e),
            }

            let next_command = match read_command(&mut input)? {
                Some(command) => command,
                None => break,
            };
            if STOP_COMMANDS.contains(&next_command.as_str()) {
                break;
            }
            divisions_file = PathBuf::from(next_command);
        }

        Ok(written)
    }

    /// Suggests candidates for one divisions file and writes them to a timestamped json file.
    pub fn process_file(&self, divisions_file: &Path) -> Result<PathBuf> {

        info!("loading suggester data file with divisions...");
        let data = files_handling::read_input::<Vec<SuggesterData>>(divisions_file)?;
        info!("suggester data file was loaded, {} definitions", data.len());

        let timer = Instant::now();
        info!("searching for candidates... may take some time");
        let suggester = Suggester::new(&self.vectors, &self.titles, &self.params, self.technique);
        let candidates = suggester.suggest(&data);

        info!("writing candidates file...");
        let file_name = available_name(&self.output_dir, &format!("candidates-{}", Local::now().format("%Y-%m-%d-%H-%M-%S")));
        let out = files_handling::save_output(&self.output_dir, &file_name, candidates.as_slice())?;
        info!("finished with current divisions, wrote {}, took {} seconds", out.display(), timer.elapsed().as_secs());

        Ok(out)
    }

}

/// The next trimmed line of `input`, `None` at end of input. Lines that are not utf-8 are reported and skipped.
fn read_command<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    loop {
        info!("enter path to another suggester data file, or stop / quit / exit");
        let mut line = Vec::new();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        match String::from_utf8(line) {
            Ok(command) => return Ok(Some(command.trim().to_string())),
            Err(e) => error!("input is not valid utf-8 ({}), check the terminal encoding", e.utf8_error()),
        }
    }
}

/// `stem`, or `stem-<n>` when `<dir>/<stem>.json` already exists.
fn available_name(dir: &Path, stem: &str) -> String {
    let mut name = stem.to_owned();
    let mut n = 1;
    while dir.join(format!("{}.json", name)).exists() {
        name = format!("{}-{}", stem, n);
        n += 1;
    }
    name
}


#[cfg(test)]
mod tests {

    use super::*;
    use ndarray::array;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    const DIVISIONS_JSON: &str = r#"[
        {
            "definition": {"verbalClue": "coin toss", "wordsLength": ["3"], "composer": "x"},
            "divisions": {
                "multiwordDivisions": [["coin", "toss"]],
                "anagramDivisions": [
                    {"firstPart": ["coin"], "secondPart": ["toss"], "anagrams": [["sost"]], "sortedAnagramLetters": "osst"}
                ]
            }
        }
    ]"#;

    fn test_run(output_dir: PathBuf) -> Run {
        let words = ["coin", "toss", "out", "cap"].iter().map(|w| w.to_string()).collect();
        let w = array![[0.0f32, 0.0, 1.0], [0.0, 0.2, 1.0], [0.1, 0.1, 1.0], [1.0, 0.0, 0.2]];
        let vectors = WordVectors::from_rows(words, w).unwrap();

        let mut lookup = BTreeMap::new();
        lookup.insert("coin".to_string(), vec!["out".to_string()]);
        lookup.insert("toss".to_string(), vec!["out".to_string()]);
        let titles = TitlesDicts { lookup_dict: Some(lookup), anagram_dict: None };

        Run::new(vectors, titles, SuggesterParams::default(), VectorFormat::Word2Vec, output_dir)
    }

    #[test]
    fn serves_until_stop_command() {
        let dir = tempfile::tempdir().unwrap();
        let divisions = dir.path().join("divisions.json");
        std::fs::write(&divisions, DIVISIONS_JSON).unwrap();

        let run = test_run(dir.path().join("out"));
        // a missing file is logged and the loop asks again
        let input = Cursor::new("missing-divisions.json\n\nquit\nnever-read.json\n");
        let written = run.serve(divisions, input).unwrap();
        assert_eq!(written.len(), 1);

        let name = written[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("candidates-") && name.ends_with(".json"));

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        let entry = &json[0];
        assert_eq!(entry["definition"]["verbalClue"], "coin toss");

        let multiword = &entry["divisionsMeasures"]["multiwordDivisionsMeasures"][0];
        assert_eq!(multiword["wordEmbeddingTechnique"], "w2v");
        assert_eq!(multiword["mostSimWords"][0][0], "out");
        assert_eq!(multiword["titlesMeasures"]["titlesMostSimWords"][0][0], "out");

        let anagram = &entry["divisionsMeasures"]["anagramDivisionsMeasures"][0];
        assert_eq!(anagram["clueWords"], "toss");
        assert_eq!(anagram["mostSimMeasures"].as_array().unwrap().len(), 0);
        assert!(anagram["titlesMeasures"]["titlesMostSimWords"].as_array().unwrap().is_empty());
    }

    #[test]
    fn end_of_input_stops() {
        let dir = tempfile::tempdir().unwrap();
        let run = test_run(dir.path().to_path_buf());
        let written = run.serve(dir.path().join("missing.json"), Cursor::new("")).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn non_utf8_input_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let divisions = dir.path().join("divisions.json");
        std::fs::write(&divisions, DIVISIONS_JSON).unwrap();

        let mut input: Vec<u8> = vec![0xff, 0xfe, b'\n'];
        input.extend_from_slice(format!("{}\nstop\n", divisions.display()).as_bytes());

        let run = test_run(dir.path().join("out"));
        let written = run.serve(divisions.clone(), Cursor::new(input)).unwrap();
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn repeated_files_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let divisions = dir.path().join("divisions.json");
        std::fs::write(&divisions, DIVISIONS_JSON).unwrap();

        let run = test_run(dir.path().join("out"));
        let input = format!("{0}\n{0}\nexit\n", divisions.display());
        let written = run.serve(divisions.clone(), Cursor::new(input)).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[0] != written[1] && written[1] != written[2] && written[0] != written[2]);
        assert!(written.iter().all(|path| path.exists()));
    }

    #[test]
    fn taken_names_get_a_counter() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(available_name(dir.path(), "candidates-x"), "candidates-x");
        std::fs::write(dir.path().join("candidates-x.json"), "[]").unwrap();
        std::fs::write(dir.path().join("candidates-x-1.json"), "[]").unwrap();
        assert_eq!(available_name(dir.path(), "candidates-x"), "candidates-x-2");
    }

    #[test]
    fn malformed_divisions_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let divisions = dir.path().join("divisions.json");
        std::fs::write(&divisions, "{not json").unwrap();

        let run = test_run(dir.path().to_path_buf());
        assert!(run.process_file(&divisions).is_err());
    }
}
