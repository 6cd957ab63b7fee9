use clap::Parser;
use serve_videos::config::Config;
use serve_videos_common::ExtensionSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "serve-videos")]
#[command(author, version, about = "Serve a directory of videos over HTTP")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Address to listen on (host:port)
    #[arg(long)]
    pub addr: Option<String>,

    /// Directory to serve files from
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// File extension to serve; repeat for several (replaces the default set)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

impl Cli {
    /// Overlay command-line values on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
        if let Some(root) = &self.root {
            config.server.root = root.clone();
        }
        if !self.extensions.is_empty() {
            config.server.extensions = ExtensionSet::new(self.extensions.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keeps_config() {
        let cli = Cli::try_parse_from(["serve-videos"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.server.addr, "0.0.0.0:8010");
        assert_eq!(config.server.extensions, ExtensionSet::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "serve-videos",
            "--addr",
            "127.0.0.1:9000",
            "--root",
            "/srv/media",
            "-e",
            "webm",
            "--ext",
            "mov",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.server.addr, "127.0.0.1:9000");
        assert_eq!(config.server.root, PathBuf::from("/srv/media"));
        assert_eq!(config.server.extensions.to_string(), "webm,mov");
    }

    #[test]
    fn positional_arguments_rejected() {
        assert!(Cli::try_parse_from(["serve-videos", "extra"]).is_err());
    }

    #[test]
    fn verbose_and_config() {
        let cli = Cli::try_parse_from(["serve-videos", "-v", "-c", "my.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }
}
