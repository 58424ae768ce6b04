// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest pipeline: complete, verify, claim.
//!
//! Each unclaimed, enabled quest is driven to completion according to its
//! kind and claimed only when completion succeeded. A failure inside one
//! quest is logged and counted; the remaining quests still run.

use std::sync::Arc;

use pawtap_core::{GameApi, Quest, QuestKind, TapperError};
use tracing::{debug, error, info, warn};

use crate::channel::ChannelJoiner;
use crate::pacing::{pause, Pacing};
use crate::settings::AgentSettings;
use crate::wallet::WalletQuest;

/// How a quest gets completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestPlan {
    /// Join the channel, then verify.
    JoinChannel(String),
    /// Link a wallet; acceptance is the completion.
    LinkWallet,
    /// Ask the server to verify directly.
    Verify,
}

impl QuestPlan {
    pub fn for_quest(quest: &Quest) -> Self {
        match quest.kind() {
            QuestKind::Telegram => match quest.channel_link() {
                Some(link) => Self::JoinChannel(link.to_string()),
                None => Self::Verify,
            },
            QuestKind::Wallet => Self::LinkWallet,
            QuestKind::Standard => Self::Verify,
        }
    }
}

/// Result of one processed quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestOutcome {
    Claimed,
    NotClaimed,
    NotCompleted,
}

/// Tally of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub claimed: usize,
    pub not_claimed: usize,
    pub not_completed: usize,
    /// Quests whose processing raised an error.
    pub failed: usize,
    /// Unclaimed quests excluded by `disabled_tasks`.
    pub skipped: usize,
}

impl PipelineReport {
    fn record(&mut self, outcome: QuestOutcome) {
        match outcome {
            QuestOutcome::Claimed => self.claimed += 1,
            QuestOutcome::NotClaimed => self.not_claimed += 1,
            QuestOutcome::NotCompleted => self.not_completed += 1,
        }
    }

    /// Quests that were attempted.
    pub fn processed(&self) -> usize {
        self.claimed + self.not_claimed + self.not_completed + self.failed
    }
}

/// Runs the quest pipeline for one session.
pub struct TaskPipeline {
    game: Arc<dyn GameApi>,
    channels: ChannelJoiner,
    wallet: WalletQuest,
    settings: AgentSettings,
    pacing: Pacing,
    session: String,
}

impl TaskPipeline {
    pub fn new(
        game: Arc<dyn GameApi>,
        channels: ChannelJoiner,
        wallet: WalletQuest,
        settings: AgentSettings,
        pacing: Pacing,
        session: impl Into<String>,
    ) -> Self {
        Self {
            game,
            channels,
            wallet,
            settings,
            pacing,
            session: session.into(),
        }
    }

    /// Fetches the quest list and processes every eligible quest.
    ///
    /// A failed list fetch yields an empty report.
    pub async fn process_tasks(&self) -> PipelineReport {
        let mut report = PipelineReport::default();

        let Some(quests) = self.game.list_quests().await else {
            warn!(session = %self.session, operation = "list_quests", "quest list unavailable");
            return report;
        };
        debug!(session = %self.session, count = quests.len(), "quests fetched");

        for quest in quests.iter().filter(|q| !q.is_claimed()) {
            if self.settings.disabled_tasks.contains(&quest.code) {
                debug!(session = %self.session, quest = %quest.title, code = %quest.code, "quest disabled");
                report.skipped += 1;
                continue;
            }

            match self.process_quest(quest).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    error!(session = %self.session, operation = "process_quest", quest = %quest.title, error = %e, "quest failed");
                    report.failed += 1;
                }
            }
            pause(&self.pacing.between_quests).await;
        }

        info!(
            session = %self.session,
            claimed = report.claimed,
            not_claimed = report.not_claimed,
            not_completed = report.not_completed,
            failed = report.failed,
            "quests processed"
        );
        report
    }

    async fn process_quest(&self, quest: &Quest) -> Result<QuestOutcome, TapperError> {
        let completed = match QuestPlan::for_quest(quest) {
            QuestPlan::JoinChannel(link) => {
                if !self.settings.join_channels {
                    false
                } else if self.channels.join_channel(&link).await? {
                    pause(&self.pacing.verify_after_join).await;
                    self.game.complete_quest(&quest.id).await
                } else {
                    false
                }
            }
            QuestPlan::LinkWallet => {
                self.settings.auto_add_wallet && self.wallet.complete().await?
            }
            QuestPlan::Verify => self.game.complete_quest(&quest.id).await,
        };

        if !completed {
            info!(session = %self.session, quest = %quest.title, "not completed");
            return Ok(QuestOutcome::NotCompleted);
        }

        if self.game.claim_quest(&quest.id).await {
            info!(
                session = %self.session,
                quest = %quest.title,
                reward = quest.reward_amount().unwrap_or_default(),
                "quest claimed"
            );
            Ok(QuestOutcome::Claimed)
        } else {
            warn!(session = %self.session, quest = %quest.title, "not claimed");
            Ok(QuestOutcome::NotClaimed)
        }
    }
}
