//! Per-chat pending-action state for the admin flows.
//!
//! The state is the dialogue of the chat, kept in teloxide's in-memory
//! storage. A missing dialogue means [`PendingAction::Idle`]; state is lost
//! on restart.

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage, InMemStorageError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PendingAction {
    #[default]
    Idle,
    AwaitingMovieAdd,
    AwaitingMovieDelete,
    AwaitingCategoryAdd,
    AwaitingCategoryDelete,
    AwaitingBroadcast,
}

pub type CatalogStorage = InMemStorage<PendingAction>;
pub type CatalogDialogue = Dialogue<PendingAction, CatalogStorage>;

/// Stores `action` for the dialogue's chat. `Idle` drops the entry.
pub async fn set_pending(
    dialogue: &CatalogDialogue,
    action: PendingAction,
) -> Result<(), InMemStorageError> {
    if action == PendingAction::Idle {
        reset(dialogue).await
    } else {
        dialogue.update(action).await
    }
}

/// Back to idle. Removing a dialogue that was never stored is an error in
/// the storage, so only stored dialogues are exited.
pub async fn reset(dialogue: &CatalogDialogue) -> Result<(), InMemStorageError> {
    if dialogue.get().await?.is_some() {
        dialogue.exit().await?;
    }
    Ok(())
}
