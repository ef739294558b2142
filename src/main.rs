use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxicord_member::application::GuildMemberRoster;
use oxicord_member::domain::entities::{AuthToken, ChannelId, GuildMember};
use oxicord_member::domain::ports::{MemberPort, RequestOptions};
use oxicord_member::infrastructure::config::{Command, MemberTarget, ModifyArgs};
use oxicord_member::infrastructure::{
    AppConfig, CliArgs, DiscordClient, InMemoryGuildRegistry, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        console_subscriber(filter, std::io::stderr).init();
    }

    Ok(())
}

/// Logs to `writer` when no log file is available.
fn console_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer))
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = match &args.config {
        Some(path) => StorageManager::with_dir(
            path.parent().map(std::path::Path::to_path_buf).unwrap_or_default(),
        ),
        None => StorageManager::new()?,
    };

    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

/// Cancels in-flight requests on Ctrl+C.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending requests");
            child.cancel();
        }
    });
    token
}

struct Session {
    client: Arc<DiscordClient>,
    registry: Arc<InMemoryGuildRegistry>,
    options: RequestOptions,
}

impl Session {
    async fn roster(&self, target: MemberTarget) -> Result<GuildMemberRoster> {
        let guild = self.client.fetch_guild(target.guild, &self.options).await?;
        self.registry.insert(guild);

        Ok(GuildMemberRoster::new(
            self.registry.handle(target.guild),
            Arc::clone(&self.client) as Arc<dyn MemberPort>,
        ))
    }

    async fn show(&self, target: MemberTarget, channel: Option<ChannelId>) -> Result<()> {
        let mut roster = self.roster(target).await?;
        let member = roster.get_or_fetch(target.user, &self.options).await?;
        print_member(member)?;

        if let Some(channel_id) = channel {
            let channel = self.client.fetch_channel(channel_id, &self.options).await?;
            println!(
                "permissions in #{}: {}",
                channel.name(),
                member.channel_permissions(&channel)?
            );
        }

        Ok(())
    }

    async fn modify(&self, target: MemberTarget, args: &ModifyArgs) -> Result<()> {
        let params = args.to_params();
        if params.is_empty() {
            return Err(eyre!("nothing to modify"));
        }

        let options = match &args.reason {
            Some(reason) => self.options.clone().with_audit_log_reason(reason.clone()),
            None => self.options.clone(),
        };

        let mut roster = self.roster(target).await?;
        let member = roster.get_or_fetch(target.user, &self.options).await?;
        member.modify(params, &options).await?;

        info!(guild_id = %target.guild, user_id = %target.user, "Member modified");
        print_member(member)
    }

    async fn kick(&self, target: MemberTarget, reason: Option<String>) -> Result<()> {
        let options = match reason {
            Some(reason) => self.options.clone().with_audit_log_reason(reason),
            None => self.options.clone(),
        };

        let mut roster = self.roster(target).await?;
        roster.get_or_fetch(target.user, &self.options).await?;
        let member = roster.kick(target.user, &options).await?;

        println!("kicked {} from guild {}", member.display_name(), target.guild);
        Ok(())
    }
}

fn print_member(member: &GuildMember) -> Result<()> {
    let roles: Vec<String> = member.role_ids().iter().map(ToString::to_string).collect();

    println!("{} ({})", member.display_name(), member.mention());
    println!("joined:      {}", member.joined_at().to_rfc3339());
    println!("roles:       {}", roles.join(", "));
    println!("deaf / mute: {} / {}", member.is_deafened(), member.is_muted());
    println!("hierarchy:   {}", member.hierarchy()?);
    println!("permissions: {}", member.guild_permissions()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;
    info!(version = oxicord_member::VERSION, "Starting {}", oxicord_member::NAME);

    let token = config
        .token
        .as_deref()
        .and_then(AuthToken::new)
        .ok_or_else(|| eyre!("a valid bot token is required (--token or DISCORD_TOKEN)"))?;

    let session = Session {
        client: Arc::new(DiscordClient::with_base_url(token, &config.api.base_url)?),
        registry: Arc::new(InMemoryGuildRegistry::new()),
        options: config
            .request_options()
            .with_cancellation(cancel_on_interrupt()),
    };

    match args.command {
        Command::Show { target, channel } => session.show(target, channel).await,
        Command::Modify { target, changes } => session.modify(target, &changes).await,
        Command::Kick { target, reason } => session.kick(target, reason).await,
    }
}
