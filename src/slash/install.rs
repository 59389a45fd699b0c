use serenity::all::{Command as ApplicationCommand, CreateCommand, GuildId, Http};
use tracing::{debug, info};

use super::Registry;

/// Creates the commands in given guild. If guild is `None`, the commands are
/// installed globally. Commands Discord knows about that are not in the
/// registry are removed by the bulk overwrite.
pub async fn install(http: &Http, registry: &Registry, guild: Option<GuildId>) -> serenity::Result<()> {
    let commands: Vec<CreateCommand> = registry.commands().map(|c| c.to_create_command()).collect();

    let installed = match guild {
        Some(guild_id) => guild_id.set_commands(http, commands).await?,
        None => ApplicationCommand::set_global_commands(http, commands).await?,
    };

    for command in &installed {
        debug!("Installed command {} ({})", command.name, command.id);
    }
    info!("Installed {} commands (guild={:?})", installed.len(), guild);

    Ok(())
}

/// Removes every command in given guild, or globally when guild is `None`.
pub async fn uninstall(http: &Http, guild: Option<GuildId>) -> serenity::Result<()> {
    let commands = match guild {
        Some(guild_id) => guild_id.get_commands(http).await?,
        None => ApplicationCommand::get_global_commands(http).await?,
    };

    for command in commands {
        debug!(
            "Uninstalling command {} ({}) guild={:?}",
            command.name, command.id, guild
        );

        match guild {
            Some(guild_id) => guild_id.delete_command(http, command.id).await?,
            None => ApplicationCommand::delete_global_command(http, command.id).await?,
        }
    }

    Ok(())
}
