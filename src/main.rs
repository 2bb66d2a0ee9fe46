use anyhow::{Context, Result};
use clap::Parser;
use instacomments::{
    init_tracing_once, DataShape, FileFormat, GraphqlClient, InstaComments, MediaRef, RunSummary, ScrapeError, Session,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const GUIDE: &str = "
============================================================
 InstaComments - Instagram Comment Scraper
============================================================
Quick start:
    instacomments --url https://www.instagram.com/reel/SHORT/

Popular options:
    --data-format usernames|detailed   Data shape to export (default: usernames)
    --file-format json|csv|txt|jsonl   Output format (default: from --output extension)
    --output PATH                      Output file path (default: listComments.json)
    --per-page N                       Comments per page (default: 50)
    --max-comments N                   Stop after N parent comments
    --min-likes N                      Only include comments with at least N likes
    --include-replies                  Include replies for each parent comment
    --dedupe/--no-dedupe               Toggle duplicate removal (default: dedupe)
    --no-progress                      Disable progress spinner

Credentials are read from SESSIONID, DS_USER_ID, CSRFTOKEN and MID
(environment or a .env file in the working directory).

Tip: run with --help to see the full help and descriptions.
============================================================
";

#[derive(Parser, Debug)]
#[command(name = "instacomments")]
#[command(about = "Instagram comments scraper (parent comments, optional replies)")]
struct Args {
    /// Instagram Reel or Post URL (https://www.instagram.com/reel/... or /p/...)
    #[arg(long)]
    url: Option<String>,

    /// Output file path
    #[arg(long, default_value = "listComments.json")]
    output: PathBuf,

    /// Data shape to export: usernames | detailed
    #[arg(long, default_value = "usernames")]
    data_format: DataShape,

    /// Output file format: json | csv | txt | jsonl (default: inferred from --output, else json)
    #[arg(long)]
    file_format: Option<FileFormat>,

    /// Comments per page
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    per_page: i64,

    /// Stop after N parent comments (default: no limit)
    #[arg(long)]
    max_comments: Option<usize>,

    /// Filter: minimum likes for a parent comment
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_likes: i64,

    /// Include available replies for each parent comment
    #[arg(long)]
    include_replies: bool,

    /// Remove duplicates (by username in 'usernames' mode, by id in 'detailed' mode). Default: enabled
    #[arg(long, overrides_with = "no_dedupe")]
    dedupe: bool,

    /// Keep duplicates
    #[arg(long, overrides_with = "dedupe")]
    no_dedupe: bool,

    /// Disable progress spinner
    #[arg(long)]
    no_progress: bool,

    /// Write created_at as RFC3339 instead of unix seconds
    #[arg(long)]
    human_timestamps: bool,
}

fn prompt_url() -> Result<String> {
    println!("Enter an Instagram Reel or Post URL (or run with --help for examples):");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("read URL from stdin")?;
    Ok(line.trim().to_string())
}

fn run(args: Args) -> Result<RunSummary> {
    let url = match args.url.clone() {
        Some(u) => u,
        None => prompt_url()?,
    };
    let media = MediaRef::parse(&url)?;
    let session = Session::from_env()?;

    let format = args
        .file_format
        .or_else(|| FileFormat::from_path(&args.output))
        .unwrap_or(FileFormat::Json);
    let per_page = u32::try_from(args.per_page.max(1)).unwrap_or(u32::MAX);
    let min_likes = u64::try_from(args.min_likes.max(0)).unwrap_or(0);

    tracing::info!(target_media = %media, shape = %args.data_format, %format, per_page, min_likes, "starting");

    let client = GraphqlClient::new(&session, &media)?;
    let summary = InstaComments::new()
        .media(&media)
        .page_size(per_page)
        .max_comments(args.max_comments)
        .min_likes(min_likes)
        .include_replies(args.include_replies)
        .dedupe(args.dedupe || !args.no_dedupe)
        .progress(!args.no_progress)
        .timestamps_human_readable(args.human_timestamps)
        .run(&client, args.data_format, format, &args.output)?;
    Ok(summary)
}

fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing_once();

    if std::env::args_os().len() == 1 {
        println!("{GUIDE}");
    }
    let args = Args::parse();

    match run(args) {
        Ok(summary) => {
            println!("[+] Saved {} records to {}", summary.written, summary.path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[!] {err:#}");
            let code = match err.downcast_ref::<ScrapeError>() {
                Some(e @ ScrapeError::MissingCredentials(_)) => {
                    eprintln!("    Add them to a .env file (see .env.example).");
                    e.exit_code()
                }
                Some(e) => e.exit_code(),
                None => 1,
            };
            ExitCode::from(code as u8)
        }
    }
}
