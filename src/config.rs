use std::num::NonZeroU64;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serenity::all::GuildId;

/// Start Discord bot
#[derive(Parser, Debug, Clone)]
#[command(name = "daft", version, about)]
pub struct Config {
    /// Discord bot token
    #[arg(short, long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Directory that playlists are looked up in
    #[arg(long, env = "DAFT_MUSIC_DIR", default_value = ".")]
    pub music_dir: PathBuf,

    /// yt-dlp compatible program used by /youtube
    #[arg(long, env = "DAFT_YTDL", default_value = "yt-dlp")]
    pub ytdl: String,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Install slash commands, globally or in one guild
    Install { guild: Option<NonZeroU64> },
    /// Uninstall slash commands, globally or in one guild
    #[command(alias = "remove")]
    Uninstall { guild: Option<NonZeroU64> },
}

impl Mode {
    pub fn guild(&self) -> Option<GuildId> {
        match *self {
            Mode::Install { guild } | Mode::Uninstall { guild } => guild.map(GuildId::from),
        }
    }
}
