use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "defang-seo")]
#[command(about = "A CLI SEO analyzer and link validator for Defang blog drafts", long_about = None)]
pub struct Cli {
    /// The blog draft to analyze (Markdown or HTML)
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Content type: html or markdown (detected from the file extension by default)
    #[arg(short = 't', long)]
    pub content_type: Option<String>,

    /// SEO metadata file (JSON, TOML, or YAML)
    #[arg(short, long)]
    pub metadata: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Check that every extracted link is reachable
    #[arg(long)]
    pub validate_urls: bool,

    /// Number of concurrent link checks (default: 5)
    #[arg(short = 'c', long, default_value_t = 5)]
    pub concurrency: usize,

    /// Rate limit for link checks per second (optional, e.g., 1.0 for 1 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Per-link timeout in seconds (default: 10)
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
