use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "malscroll")]
#[command(version)]
#[command(
    about = "A scrolling strip of MyAnimeList covers, previewed in the terminal",
    long_about = None
)]
pub struct Args {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// MyAnimeList username (overrides config)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Write a default config file to PATH (or PATH/config.toml for a directory) and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<PathBuf>,

    /// Render headless and save the strip as a PNG instead of opening the preview
    #[arg(short, long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Frames to render before saving a snapshot
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub frames: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["malscroll"]);
        assert!(args.config.is_none());
        assert!(args.snapshot.is_none());
        assert_eq!(args.frames, 1);
    }

    #[test]
    fn test_snapshot_flags() {
        let args = Args::parse_from([
            "malscroll",
            "-u",
            "someone",
            "--snapshot",
            "strip.png",
            "--frames",
            "90",
        ]);
        assert_eq!(args.username.as_deref(), Some("someone"));
        assert_eq!(args.snapshot, Some(PathBuf::from("strip.png")));
        assert_eq!(args.frames, 90);
    }

    #[test]
    fn test_zero_frames_rejected() {
        assert!(Args::try_parse_from(["malscroll", "--frames", "0"]).is_err());
    }
}
