//! Command surface for the deletion scheduler.
//!
//! The chat front end parses user input into [`Command`] intents; `dispatch`
//! executes them against the [`SweeperService`] and renders the reply text to
//! send back. User mistakes (bad durations, missing permissions) come back as
//! replies; infrastructure faults propagate as errors.

use {anyhow::Result, tracing::debug};

use janitor_sweeper::SweeperService;

/// A parsed administrative intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all channels with a non-zero TTL.
    ListTracked,
    /// Set (or with `"0"` clear) a channel's TTL from a raw duration string.
    SetTtl { channel_id: String, duration: String },
    /// Exempt specific messages from deletion.
    Remove {
        channel_id: String,
        message_ids: Vec<String>,
    },
    /// Clear a channel's pending map; `None` targets the invoking channel.
    Wipe { channel_id: Option<String> },
}

/// Who invoked the command, and from where.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub actor_id: String,
    pub current_channel_id: String,
}

/// Execute a command and render the reply.
pub async fn dispatch(
    svc: &SweeperService,
    ctx: &CommandContext,
    command: Command,
) -> Result<String> {
    debug!(actor_id = %ctx.actor_id, ?command, "dispatching command");

    match command {
        Command::ListTracked => list_tracked(svc).await,
        Command::SetTtl {
            channel_id,
            duration,
        } => set_ttl(svc, ctx, &channel_id, &duration).await,
        Command::Remove {
            channel_id,
            message_ids,
        } => remove(svc, &channel_id, &message_ids).await,
        Command::Wipe { channel_id } => {
            let channel_id = channel_id.unwrap_or_else(|| ctx.current_channel_id.clone());
            svc.wipe_channel(&channel_id).await?;
            Ok(format!("Cleared all tracked messages in {channel_id}."))
        },
    }
}

async fn list_tracked(svc: &SweeperService) -> Result<String> {
    let tracked = svc.list_tracked().await?;
    if tracked.is_empty() {
        return Ok(
            "No channels are currently being tracked. Add one with the channel command."
                .to_string(),
        );
    }

    let mut reply = String::new();
    for entry in tracked {
        reply.push_str(&format!(
            "{}: {} seconds\n",
            entry.channel_id, entry.ttl_seconds
        ));
    }
    Ok(reply)
}

async fn set_ttl(
    svc: &SweeperService,
    ctx: &CommandContext,
    channel_id: &str,
    duration: &str,
) -> Result<String> {
    match svc.set_channel_ttl(channel_id, duration, &ctx.actor_id).await {
        Ok(0) => Ok(format!(
            "Messages in {channel_id} will no longer be auto-deleted."
        )),
        Ok(seconds) => Ok(format!(
            "Messages in {channel_id} will now be deleted after {}.",
            humanize_seconds(seconds)
        )),
        Err(error) if error.is_user_error() => Ok(error.to_string()),
        Err(error) => Err(error.into()),
    }
}

async fn remove(svc: &SweeperService, channel_id: &str, message_ids: &[String]) -> Result<String> {
    let report = svc.remove_messages(channel_id, message_ids).await?;
    Ok(format!(
        "Messages successfully removed: {}\nMessages that failed to be removed: {}",
        humanize_list(&report.removed),
        humanize_list(&report.not_found)
    ))
}

/// Oxford-comma joiner: `a`, `a and b`, `a, b, and c`. Empty input renders
/// as `none`.
fn humanize_list(items: &[String]) -> String {
    match items {
        [] => "none".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

/// Render seconds in the largest unit that divides evenly.
fn humanize_seconds(seconds: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (604_800, "week"),
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
    ];
    for (unit_seconds, name) in UNITS {
        if seconds >= unit_seconds && seconds % unit_seconds == 0 {
            let n = seconds / unit_seconds;
            return format!("{n} {name}{}", if n == 1 { "" } else { "s" });
        }
    }
    format!("{seconds} second{}", if seconds == 1 { "" } else { "s" })
}
