use super::app_config::LogLevel;
use crate::domain::entities::{ChannelId, GuildId, RoleId, UserId};
use crate::domain::ports::ModifyMemberParams;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "oxicord-member",
    version,
    about = "Inspect and manage Discord guild members",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API base URL.
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (0 disables it).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a member with its roles and resolved permissions.
    Show {
        #[command(flatten)]
        target: MemberTarget,

        /// Also resolve permissions in this channel.
        #[arg(long)]
        channel: Option<ChannelId>,
    },
    /// Change nickname, roles or voice state.
    Modify {
        #[command(flatten)]
        target: MemberTarget,

        #[command(flatten)]
        changes: ModifyArgs,
    },
    /// Remove a member from the guild.
    Kick {
        #[command(flatten)]
        target: MemberTarget,

        /// Reason recorded in the audit log.
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct MemberTarget {
    /// Guild ID.
    #[arg(long)]
    pub guild: GuildId,

    /// User ID.
    #[arg(long)]
    pub user: UserId,
}

#[derive(Debug, Clone, Args)]
pub struct ModifyArgs {
    /// New nickname.
    #[arg(long, conflicts_with = "clear_nick")]
    pub nick: Option<String>,

    /// Reset the nickname.
    #[arg(long)]
    pub clear_nick: bool,

    /// Replace the role list (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub roles: Option<Vec<RoleId>>,

    /// Server-deafen the member.
    #[arg(long)]
    pub deaf: Option<bool>,

    /// Server-mute the member.
    #[arg(long)]
    pub mute: Option<bool>,

    /// Move the member to a voice channel.
    #[arg(long, conflicts_with = "disconnect")]
    pub move_to: Option<ChannelId>,

    /// Disconnect the member from voice.
    #[arg(long)]
    pub disconnect: bool,

    /// Reason recorded in the audit log.
    #[arg(long)]
    pub reason: Option<String>,
}

impl ModifyArgs {
    /// Builds the change set; flags that were not given stay unspecified.
    #[must_use]
    pub fn to_params(&self) -> ModifyMemberParams {
        let mut params = ModifyMemberParams::new();
        if let Some(nick) = &self.nick {
            params = params.with_nick(nick.clone());
        }
        if self.clear_nick {
            params = params.clear_nick();
        }
        if let Some(roles) = &self.roles {
            params = params.with_roles(roles.iter().copied());
        }
        if let Some(deaf) = self.deaf {
            params = params.with_deaf(deaf);
        }
        if let Some(mute) = self.mute {
            params = params.with_mute(mute);
        }
        if let Some(channel) = self.move_to {
            params = params.move_to(Some(channel));
        }
        if self.disconnect {
            params = params.move_to(None);
        }
        params
    }
}
