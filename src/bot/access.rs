//! Admin allowlist and channel-subscription gate.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use teloxide::types::{ChatId, ChatMemberStatus, Recipient, UserId};

use crate::bot::gateway::ChatGateway;

/// A channel users must join, as written in the `CHANNELS` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Username(String),
    Id(i64),
}

impl ChannelRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(name) = raw.strip_prefix('@') {
            if name.is_empty() {
                return Err(anyhow!("Channel username cannot be empty"));
            }
            return Ok(Self::Username(raw.to_string()));
        }
        raw.parse::<i64>()
            .map(Self::Id)
            .map_err(|_| anyhow!("Invalid channel '{}': expected @username or numeric id", raw))
    }

    pub fn recipient(&self) -> Recipient {
        match self {
            Self::Username(name) => Recipient::ChannelUsername(name.clone()),
            Self::Id(id) => Recipient::Id(ChatId(*id)),
        }
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Outcome of a subscription check. Only [`SubscriptionStatus::Subscribed`]
/// passes the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed,
    NotMember { channel: String },
    LookupFailed { channel: String, reason: String },
}

impl SubscriptionStatus {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    admins: HashSet<u64>,
    channels: Vec<ChannelRef>,
}

impl AccessControl {
    pub fn new(admins: impl IntoIterator<Item = u64>, channels: Vec<ChannelRef>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
            channels,
        }
    }

    pub fn from_config(admins: &[u64], channels: &[String]) -> Result<Self> {
        let channels = channels
            .iter()
            .map(|c| ChannelRef::parse(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(admins.iter().copied(), channels))
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admins.contains(&user_id)
    }

    pub fn channels(&self) -> &[ChannelRef] {
        &self.channels
    }

    /// Checks membership channel by channel, stopping at the first channel
    /// that fails or errors.
    pub async fn check_subscription(
        &self,
        gateway: &dyn ChatGateway,
        user_id: u64,
    ) -> SubscriptionStatus {
        for channel in &self.channels {
            match gateway.member_status(channel.recipient(), UserId(user_id)).await {
                Ok(status) if is_member_status(status) => continue,
                Ok(status) => {
                    tracing::debug!(
                        "User {} is not subscribed to {} (status {:?})",
                        user_id, channel, status
                    );
                    return SubscriptionStatus::NotMember {
                        channel: channel.to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        "Membership lookup for user {} in {} failed: {}",
                        user_id, channel, e
                    );
                    return SubscriptionStatus::LookupFailed {
                        channel: channel.to_string(),
                        reason: e.to_string(),
                    };
                }
            }
        }
        SubscriptionStatus::Subscribed
    }
}

fn is_member_status(status: ChatMemberStatus) -> bool {
    matches!(
        status,
        ChatMemberStatus::Owner | ChatMemberStatus::Administrator | ChatMemberStatus::Member
    )
}
