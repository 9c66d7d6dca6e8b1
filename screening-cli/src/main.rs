use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screening_core::{
    Analyzer, FeatureVector, PredictionResult, ResourcePaths, Screener, features::FEATURE_NAMES,
    metrics::TextCounts,
};
use std::{
    collections::BTreeMap,
    io::{Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Linguistic screening of Cookie Theft picture descriptions",
    long_about = None
)]
struct Args {
    /// Directory holding `averaged_perceptron_tagger_eng/`, `wordnet/` and `model.json`.
    /// Defaults to the SCREENING_* environment variables.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the feature vector of each English transcript
    Features {
        /// Write one CSV table instead of JSON lines
        #[arg(long)]
        csv: bool,

        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Screen one English transcript (`-` reads stdin)
    Predict { file: PathBuf },
}

#[derive(serde::Serialize)]
struct FileFeatures<'a> {
    file: &'a Path,
    counts: TextCounts,
    concepts: Vec<&'static str>,
    features: BTreeMap<&'static str, f64>,
    vector: [f64; 10],
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn csv_header() -> Vec<&'static str> {
    std::iter::once("file").chain(FEATURE_NAMES).collect()
}

fn csv_row(file: &Path, features: &FeatureVector) -> Vec<String> {
    std::iter::once(file.display().to_string())
        .chain(features.values().iter().map(|value| value.to_string()))
        .collect()
}

fn features(paths: &ResourcePaths, files: &[PathBuf], as_csv: bool) -> Result<()> {
    let analyzer = Analyzer::load(paths).context("Failed to load tagger and WordNet data")?;
    let stdout = std::io::stdout().lock();

    if as_csv {
        let mut writer = csv::Writer::from_writer(stdout);
        writer.write_record(csv_header())?;
        for file in files {
            let text = read_text(file)?;
            let features = analyzer.extract_features(&text);
            writer.write_record(csv_row(file, &features))?;
        }
        writer.flush()?;
        return Ok(());
    }

    let mut out = stdout;
    for file in files {
        let text = read_text(file)?;
        let analysis = analyzer.analyze(&text);
        log::debug!("{}: {} tokens", file.display(), analysis.tokens.len());

        let record = FileFeatures {
            file,
            counts: analysis.counts,
            features: analysis.features.named().collect(),
            vector: *analysis.features.values(),
            concepts: analysis.concepts,
        };
        writeln!(out, "{}", serde_json::to_string(&record)?)?;
    }
    Ok(())
}

fn predict(paths: &ResourcePaths, file: &Path) -> Result<()> {
    let screener = Screener::load(paths).context("Failed to load screening resources")?;
    let text = read_text(file)?;
    let screening = screener.screen(&text);
    let result = PredictionResult::new(screening, text.clone(), text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let paths = match args.data {
        Some(dir) => ResourcePaths::under(dir),
        None => ResourcePaths::from_env(),
    };

    match args.command {
        Command::Features { csv, files } => features(&paths, &files, csv),
        Command::Predict { file } => predict(&paths, &file),
    }
}
