use serenity::async_trait;
use thiserror::Error;
use tokio::process::Command as Process;
use tracing::{debug, error, info};

use super::{Music, caller_voice_channel, require_guild};
use crate::error::{CommandError, CommandResult};
use crate::slash::{
    Command, CommandHandler, CommandParameter, Invocation, ParameterKind, Session, Visibility,
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("no playable streams found for {0}")]
    Empty(String),
}

/// Turns a user supplied video URL or ID into streamable URLs.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Vec<String>, ResolveError>;
}

/// Resolves streams with `yt-dlp --get-url`. Playlists yield one URL per video.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    format: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            // low bitrate opus starts quickly and is plenty for voice
            format: "worstaudio[acodec=opus]".into(),
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl SourceResolver for YtDlp {
    async fn resolve(&self, query: &str) -> Result<Vec<String>, ResolveError> {
        debug!("Resolving {} with {}", query, self.program);

        let output = Process::new(&self.program)
            .args(["--get-url", "-f", self.format.as_str(), query])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ResolveError::Io {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ResolveError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let urls = parse_urls(&String::from_utf8_lossy(&output.stdout));
        if urls.is_empty() {
            return Err(ResolveError::Empty(query.to_string()));
        }

        Ok(urls)
    }
}

fn parse_urls(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn command(music: Music) -> Command {
    Command::new("youtube", "Play YouTube video", YouTube { music }).parameter(
        CommandParameter::new(ParameterKind::String, "url", "YouTube Video URL or ID")
            .required(true),
    )
}

struct YouTube {
    music: Music,
}

#[async_trait]
impl CommandHandler for YouTube {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = require_guild(invocation)?;

        if self.music.players.is_playing(guild_id) {
            return Err(CommandError::usage("already playing in this guild"));
        }

        let id = invocation.string("url")?;
        let channel_id = caller_voice_channel(session, guild_id, invocation)?;

        // Playlists can take a while to resolve; answer now so the
        // interaction doesn't time out.
        session
            .respond(
                "Parsing YouTube video. This may take a few minutes.",
                Visibility::Ephemeral,
            )
            .await?;

        let urls = self.music.resolver.resolve(id).await.map_err(|e| {
            error!("Error resolving {}: {}", id, e);
            CommandError::external(format!("could not play {}", id))
        })?;
        info!("Resolved {} into {} streams", id, urls.len());

        // Another playlist may have started while resolving; the table
        // rejects the start in that case.
        self.music
            .players
            .start(guild_id, urls, async {
                session
                    .join_voice(guild_id, channel_id)
                    .await
                    .map_err(CommandError::from)
            })
            .await?;

        session
            .followup(&format!("Playing {}", id), Visibility::Ephemeral)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_urls_drops_blank_lines() {
        let stdout = "https://a.example/1\n\nhttps://a.example/2\n";

        assert_eq!(
            parse_urls(stdout),
            vec!["https://a.example/1", "https://a.example/2"]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let resolver = YtDlp::new("daft-test-no-such-program");

        let err = resolver.resolve("dQw4w9WgXcQ").await.unwrap_err();

        assert_matches!(err, ResolveError::Io { .. });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let err = YtDlp::new("false").resolve("dQw4w9WgXcQ").await.unwrap_err();

        assert_matches!(err, ResolveError::Failed { program, .. } if program == "false");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_no_output_is_empty() {
        let err = YtDlp::new("true").resolve("dQw4w9WgXcQ").await.unwrap_err();

        assert_matches!(err, ResolveError::Empty(query) if query == "dQw4w9WgXcQ");
    }
}
