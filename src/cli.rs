use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lazyunzip")]
#[command(version)]
#[command(about = "Extract ZIP entries on demand from local files or HTTP URLs", long_about = None)]
#[command(after_help = "Examples:\n  \
  lazyunzip data1.zip -x joe        extract all files except joe from data1.zip\n  \
  lazyunzip -p foo.zip | more       send contents of foo.zip via pipe into more\n  \
  lazyunzip -t foo.zip              read every entry and check its CRC-32\n  \
  lazyunzip -l https://example.com/archive.zip   list files from remote ZIP\n\n\
  Set RUST_LOG=debug to trace how the archive is located and read.")]
pub struct Cli {
    /// ZIP file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Files to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely/show version info
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Test archive entries (decompress and check CRC-32)
    #[arg(short = 't')]
    pub test: bool,

    /// Display archive comment only
    #[arg(short = 'z')]
    pub comment: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.is_very_quiet() {
            "off"
        } else if self.is_quiet() {
            "error"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    /// Whether `name` is selected by the positional file arguments and not
    /// excluded by `-x`.
    pub fn selects(&self, name: &str) -> bool {
        if !self.files.is_empty() {
            let matches = self.files.iter().any(|f| {
                if has_glob_chars(f) {
                    glob_match(f, name)
                } else {
                    // No wildcards: exact match on filename or full path
                    name == f.as_str() || basename(name) == f.as_str()
                }
            });
            if !matches {
                return false;
            }
        }

        !self
            .exclude
            .iter()
            .any(|x| name.contains(x.as_str()) || glob_match(x, name))
    }
}

/// Last path component of an archive member name.
pub fn basename(name: &str) -> &str {
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(name)
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Skip the star, or let it swallow one more character
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("lazyunzip").chain(args.iter().copied()))
    }

    #[test]
    fn glob_patterns() {
        assert!(glob_match("*.txt", "readme.txt"));
        assert!(glob_match("file?.dat", "file1.dat"));
        assert!(glob_match("docs/*", "docs/a/b.md"));
        assert!(!glob_match("*.txt", "readme.md"));
        assert!(!glob_match("file?.dat", "file10.dat"));
    }

    #[test]
    fn selection_by_name_basename_and_glob() {
        let cli = parse(&["a.zip", "src/lib.rs", "main.rs", "*.md"]);
        assert!(cli.selects("src/lib.rs"));
        assert!(cli.selects("src/main.rs"));
        assert!(cli.selects("README.md"));
        assert!(!cli.selects("src/cli.rs"));
    }

    #[test]
    fn exclusions_win() {
        let cli = parse(&["a.zip", "-x", "target", "*.o"]);
        assert!(cli.selects("src/lib.rs"));
        assert!(!cli.selects("target/debug/app"));
        assert!(!cli.selects("build/x.o"));
    }

    #[test]
    fn quiet_levels_drive_log_filter() {
        assert_eq!(parse(&["a.zip"]).log_filter(), "warn");
        assert_eq!(parse(&["-v", "a.zip"]).log_filter(), "info");
        assert_eq!(parse(&["-q", "a.zip"]).log_filter(), "error");
        assert_eq!(parse(&["-qq", "a.zip"]).log_filter(), "off");
        assert_eq!(parse(&["-p", "a.zip"]).log_filter(), "error");
        assert!(parse(&["https://example.com/a.zip"]).is_http_url());
    }

    #[test]
    fn basename_of_members() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("c.txt"), "c.txt");
        assert_eq!(basename("a/b/"), "b");
    }
}
