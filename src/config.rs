use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Data shape exported to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataShape {
    Usernames,
    Detailed,
}

/// On-disk serialization format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
    Txt,
    Jsonl,
}

impl FileFormat {
    /// Infer the format from an output path extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for DataShape {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usernames" => Ok(DataShape::Usernames),
            "detailed" => Ok(DataShape::Detailed),
            other => Err(format!("unknown data format '{other}' (expected usernames|detailed)")),
        }
    }
}

impl FromStr for FileFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "csv" => Ok(FileFormat::Csv),
            "txt" => Ok(FileFormat::Txt),
            "jsonl" | "ndjson" => Ok(FileFormat::Jsonl),
            other => Err(format!("unknown file format '{other}' (expected json|csv|txt|jsonl)")),
        }
    }
}

impl fmt::Display for DataShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataShape::Usernames => "usernames",
            DataShape::Detailed => "detailed",
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
            FileFormat::Txt => "txt",
            FileFormat::Jsonl => "jsonl",
        })
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ScrapeOptions {
    pub shortcode: String,
    pub page_size: u32,                 // comments requested per page, >= 1
    pub max_comments: Option<usize>,    // cap on qualifying parent comments
    pub min_likes: u64,                 // keep comments with like_count >= min_likes
    pub include_replies: bool,          // map one level of threaded replies
    pub dedupe: bool,                   // by id (detailed) or username (usernames)
    pub progress: bool,                 // show progress spinner
    pub progress_label: Option<String>, // optional label for progress spinner

    // output formatting
    pub human_timestamps: bool, // convert unix created_at to RFC3339 strings
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            shortcode: String::new(),
            page_size: 50,
            max_comments: None,
            min_likes: 0,
            include_replies: false,
            dedupe: true,
            progress: true,
            progress_label: None,
            human_timestamps: false,
        }
    }
}

impl ScrapeOptions {
    pub fn with_shortcode(mut self, shortcode: impl AsRef<str>) -> Self {
        self.shortcode = shortcode.as_ref().trim().to_string();
        self
    }
    pub fn with_page_size(mut self, n: u32) -> Self {
        self.page_size = n.max(1);
        self
    }
    /// `Some(0)` means "no limit".
    pub fn with_max_comments(mut self, max: Option<usize>) -> Self {
        self.max_comments = max.filter(|&n| n > 0);
        self
    }
    pub fn with_min_likes(mut self, n: u64) -> Self {
        self.min_likes = n;
        self
    }
    pub fn with_include_replies(mut self, yes: bool) -> Self {
        self.include_replies = yes;
        self
    }
    pub fn with_dedupe(mut self, yes: bool) -> Self {
        self.dedupe = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_human_timestamps(mut self, yes: bool) -> Self {
        self.human_timestamps = yes;
        self
    }
}
