use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libjieba::{DictSources, Jieba, JiebaConfig, TokenizeMode};

#[derive(Parser)]
#[command(name = "libjieba", about = "Chinese word segmentation")]
struct Args {
    /// Main dictionary (`word freq [tag]` per line).
    #[arg(long)]
    dict: PathBuf,

    /// Segmentation HMM model.
    #[arg(long)]
    hmm: PathBuf,

    #[arg(long)]
    user_dict: Option<PathBuf>,

    #[arg(long)]
    idf: Option<PathBuf>,

    #[arg(long)]
    stop_words: Option<PathBuf>,

    /// POS HMM model used to tag unknown words.
    #[arg(long)]
    pos_hmm: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable HMM discovery of unknown words.
    #[arg(long)]
    no_hmm: bool,

    /// Print one JSON array per input line.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,

    /// Text to process; lines are read from stdin when absent.
    #[arg(long)]
    text: Option<String>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    Cut,
    CutAll,
    Search,
    Tag,
    Tokenize {
        #[arg(long)]
        search: bool,
    },
    Keywords {
        #[arg(long, default_value_t = 20)]
        top_k: usize,
    },
    Textrank {
        #[arg(long, default_value_t = 20)]
        top_k: usize,
    },
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn read_opt(path: &Option<PathBuf>) -> Result<Option<Vec<u8>>> {
    path.as_deref().map(read).transpose()
}

fn build(args: &Args) -> Result<Jieba> {
    let config = match &args.config {
        Some(path) => JiebaConfig::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => JiebaConfig::default(),
    };
    let dict = read(&args.dict)?;
    let hmm = read(&args.hmm)?;
    let user_dict = read_opt(&args.user_dict)?;
    let idf = read_opt(&args.idf)?;
    let stop_words = read_opt(&args.stop_words)?;
    let pos_hmm = read_opt(&args.pos_hmm)?;

    let mut sources = DictSources::new(&dict, &hmm);
    sources.user_dict = user_dict.as_deref();
    sources.idf = idf.as_deref();
    sources.stop_words = stop_words.as_deref();
    sources.pos_hmm = pos_hmm.as_deref();
    Jieba::with_config(sources, config).context("building segmenter")
}

fn run_line(jieba: &Jieba, command: Command, hmm: bool, json: bool, line: &str) -> Result<String> {
    let out = match command {
        Command::Cut => words_out(jieba.cut(line, hmm), json)?,
        Command::CutAll => words_out(jieba.cut_all(line), json)?,
        Command::Search => words_out(jieba.cut_for_search(line, hmm), json)?,
        Command::Tag => {
            let tags = jieba.tag(line);
            if json {
                serde_json::to_string(&tags)?
            } else {
                tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
            }
        }
        Command::Tokenize { search } => {
            let mode = if search {
                TokenizeMode::Search
            } else {
                TokenizeMode::Default
            };
            let tokens = jieba.tokenize(line, mode, hmm);
            if json {
                serde_json::to_string(&tokens)?
            } else {
                tokens
                    .iter()
                    .map(|t| format!("{}\t{}\t{}", t.word, t.start, t.end))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Keywords { top_k } => keywords_out(jieba.extract_keywords_with_weight(line, top_k), json)?,
        Command::Textrank { top_k } => keywords_out(jieba.extract_keywords_textrank(line, top_k), json)?,
    };
    Ok(out)
}

fn words_out(words: Vec<&str>, json: bool) -> Result<String> {
    Ok(if json {
        serde_json::to_string(&words)?
    } else {
        words.join(" / ")
    })
}

fn keywords_out(keywords: Vec<libjieba::Keyword>, json: bool) -> Result<String> {
    Ok(if json {
        serde_json::to_string(&keywords)?
    } else {
        keywords
            .iter()
            .map(|k| format!("{}\t{:.6}", k.keyword, k.weight))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let jieba = build(&args)?;
    let hmm = !args.no_hmm;

    if let Some(text) = &args.text {
        println!("{}", run_line(&jieba, args.command, hmm, args.json, text)?);
        return Ok(());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        println!("{}", run_line(&jieba, args.command, hmm, args.json, &line)?);
    }
    Ok(())
}
