use clap::Parser;
use crcr_suggester::files_handling::{open_text, save_output};
use crcr_suggester::titles::TitlesDicts;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};


// Builds the titles dictionaries used by the suggester from a Wikipedia titles dump
// (e.g. hewiki-latest-all-titles-in-ns0.gz), one title per line, words separated by '_'.
// Treated as its own executable so the dump is only processed once.

#[derive(Parser, Debug)]
#[command(name = "titles_dict")]
#[command(about = "Build lookup and anagram dictionaries from Wikipedia titles")]
#[command(version)]
struct Args {
    /// Titles dump, plain text or .gz
    titles_file: PathBuf,

    /// Directory for the dictionaries file
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the dictionaries file, without the .json extension
    #[arg(short, long, default_value = "titles-dict")]
    name: String,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let timer = Instant::now();
    info!("preparing the dictionaries from {}, this can take a while", args.titles_file.display());

    let titles = match open_text(&args.titles_file).and_then(|reader| Ok(TitlesDicts::build(reader)?)) {
        Ok(titles) => titles,
        Err(e) => {
            error!("{}: {}", args.titles_file.display(), e);
            std::process::exit(1);
        }
    };

    match save_output(&args.output_dir, &args.name, &titles) {
        Ok(out) => info!("wrote {}, took {} seconds", out.display(), timer.elapsed().as_secs()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
