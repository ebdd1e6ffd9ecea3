//! Checklist and subtask mutations, cached per card.

use super::{unsaved, BoardController};
use crate::cache::{QueryData, QueryKey};
use crate::debounce::DebounceTicket;
use crate::domain::{remove_by_id, swap_temporary, CardId, Checklist, Subtask, SubtaskId};
use crate::error::{BoardError, BoardResult};
use crate::notify::GENERIC_FAILURE;
use crate::optimistic::OptimisticMutation;
use crate::remote::{NewSubtask, SubtaskUpdate};

impl BoardController {
    pub async fn load_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>> {
        match self.fetch_checklist(card).await {
            Ok(checklist) => Ok(checklist),
            Err(err) => {
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    pub(crate) async fn fetch_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>> {
        let key = QueryKey::Checklist(card);
        let ticket = self.cache.begin_fetch(key);
        let checklist = self.store.get_checklist(card).await?;
        self.cache
            .resolve_fetch(ticket, QueryData::Checklist(checklist.clone()));
        Ok(checklist)
    }

    /// Cached checklist of a card; `None` when absent or not loaded
    pub fn checklist(&self, card: CardId) -> Option<Checklist> {
        self.cache.checklist(card).flatten()
    }

    /// Give a card its checklist. Returns the existing one if there is one.
    pub async fn create_checklist(&self, card: CardId) -> BoardResult<Checklist> {
        if card.is_temporary() {
            return Err(unsaved("card", card));
        }
        if let Some(existing) = self.checklist(card) {
            return Ok(existing);
        }
        let checklist = match self.store.create_checklist(card).await {
            Ok(checklist) => checklist,
            Err(err) => {
                self.report(&err, GENERIC_FAILURE);
                return Err(err);
            }
        };
        self.cache.cancel_queries(&QueryKey::Checklist(card));
        self.cache.set_checklist(card, Some(checklist.clone()));
        self.optimistic_board(|board| {
            board.card_mut(card)?.checklist = Some(checklist.id);
            Some(())
        });
        Ok(checklist)
    }

    fn optimistic_checklist<T>(
        &self,
        card: CardId,
        edit: impl FnOnce(&mut Checklist) -> Option<T>,
    ) -> Option<(OptimisticMutation, T)> {
        self.optimistic(QueryKey::Checklist(card), |data| {
            data.as_checklist_mut().and_then(edit)
        })
    }

    pub async fn add_subtask(&self, card: CardId, name: &str) -> BoardResult<SubtaskId> {
        let name = name.trim().to_string();
        let temp = SubtaskId(self.cache.temp_id());
        let (_, checklist_id) = self
            .optimistic_checklist(card, |checklist| {
                checklist.subtasks.push(Subtask::new(temp, name.clone()));
                Some(checklist.id)
            })
            .ok_or_else(|| BoardError::not_found(format!("checklist of card {}", card)))?;

        let req = NewSubtask {
            checklist_id,
            name,
            checked: false,
        };
        match self.store.create_subtask(&req).await {
            Ok(created) => {
                let id = created.id;
                self.optimistic_checklist(card, |checklist| {
                    swap_temporary(&mut checklist.subtasks, temp, created);
                    Some(())
                });
                Ok(id)
            }
            Err(err) => {
                self.optimistic_checklist(card, |checklist| {
                    remove_by_id(&mut checklist.subtasks, temp).map(|_| ())
                });
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    pub async fn toggle_subtask(&self, card: CardId, subtask: SubtaskId) -> BoardResult<()> {
        if subtask.is_temporary() {
            return Err(unsaved("subtask", subtask));
        }
        let Some((mut mutation, req)) = self.optimistic_checklist(card, |checklist| {
            let subtask = checklist.subtask_mut(subtask)?;
            subtask.checked = !subtask.checked;
            Some(SubtaskUpdate {
                name: subtask.name.clone(),
                checked: subtask.checked,
            })
        }) else {
            return Err(BoardError::not_found(format!("subtask {}", subtask)));
        };
        let result = self.store.update_subtask(subtask, &req).await;
        self.settle(&mut mutation, result)
    }

    /// Show the new name right away and schedule the write for
    /// `flush_subtask_rename`
    pub fn rename_subtask_local(
        &self,
        card: CardId,
        subtask: SubtaskId,
        name: &str,
    ) -> Option<DebounceTicket<SubtaskId>> {
        let name = name.to_string();
        self.optimistic_checklist(card, |checklist| {
            checklist.subtask_mut(subtask)?.name = name.clone();
            Some(())
        })?;
        Some(self.edits().subtask_names.schedule(subtask, (card, name)))
    }

    /// Send the debounced name if `ticket` is still the latest edit
    pub async fn flush_subtask_rename(&self, ticket: DebounceTicket<SubtaskId>) -> BoardResult<bool> {
        let Some((card, name)) = self.edits().subtask_names.take(ticket) else {
            return Ok(false);
        };
        let id = ticket.key;
        if id.is_temporary() {
            return Ok(false);
        }
        let Some(checked) = self
            .checklist(card)
            .and_then(|c| c.subtasks.iter().find(|s| s.id == id).map(|s| s.checked))
        else {
            return Ok(false);
        };

        let req = SubtaskUpdate {
            name: name.trim().to_string(),
            checked,
        };
        if let Err(err) = self.store.update_subtask(id, &req).await {
            self.report(&err, GENERIC_FAILURE);
            self.heal(QueryKey::Checklist(card)).await;
            return Err(err);
        }
        Ok(true)
    }

    pub async fn remove_subtask(&self, card: CardId, subtask: SubtaskId) -> BoardResult<()> {
        if subtask.is_temporary() {
            return Err(unsaved("subtask", subtask));
        }
        self.edits().subtask_names.cancel(subtask);
        let Some((mut mutation, ())) = self.optimistic_checklist(card, |checklist| {
            remove_by_id(&mut checklist.subtasks, subtask).map(|_| ())
        }) else {
            return Ok(());
        };
        let result = self.store.delete_subtask(subtask).await;
        self.settle(&mut mutation, result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::remote::StoreOp;

    async fn with_checklist() -> (BoardController, crate::remote::InMemoryTaskStore) {
        let (controller, store) = loaded(two_column_board()).await;
        assert_eq!(controller.load_checklist(CardId(10)).await.unwrap(), None);
        controller.create_checklist(CardId(10)).await.unwrap();
        (controller, store)
    }

    #[tokio::test]
    async fn test_create_checklist_links_card() {
        let (controller, _) = with_checklist().await;
        let checklist = controller.checklist(CardId(10)).unwrap();
        assert_eq!(
            controller.board().card(CardId(10)).unwrap().checklist,
            Some(checklist.id)
        );
    }

    #[tokio::test]
    async fn test_add_and_toggle_subtask() {
        let (controller, store) = with_checklist().await;
        let id = controller.add_subtask(CardId(10), "Aquecer").await.unwrap();
        assert!(!id.is_temporary());

        controller.toggle_subtask(CardId(10), id).await.unwrap();
        let checklist = controller.checklist(CardId(10)).unwrap();
        assert_eq!(checklist.progress(), (1, 1));
        assert!(store.checklist_snapshot(CardId(10)).unwrap().subtasks[0].checked);
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back() {
        let (controller, store) = with_checklist().await;
        let id = controller.add_subtask(CardId(10), "Aquecer").await.unwrap();
        store.fail(StoreOp::UpdateSubtask);
        assert!(controller.toggle_subtask(CardId(10), id).await.is_err());
        assert_eq!(controller.checklist(CardId(10)).unwrap().progress(), (0, 1));
    }

    #[tokio::test]
    async fn test_failed_add_subtask_removes_temp() {
        let (controller, store) = with_checklist().await;
        store.fail(StoreOp::CreateSubtask);
        assert!(controller.add_subtask(CardId(10), "Aquecer").await.is_err());
        assert!(controller.checklist(CardId(10)).unwrap().subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_debounced_subtask_rename() {
        let (controller, store) = with_checklist().await;
        let id = controller.add_subtask(CardId(10), "Aq").await.unwrap();
        let stale = controller.rename_subtask_local(CardId(10), id, "Aque").unwrap();
        let latest = controller.rename_subtask_local(CardId(10), id, "Aquecer").unwrap();

        assert!(!controller.flush_subtask_rename(stale).await.unwrap());
        assert!(controller.flush_subtask_rename(latest).await.unwrap());
        assert_eq!(store.checklist_snapshot(CardId(10)).unwrap().subtasks[0].name, "Aquecer");
    }

    #[tokio::test]
    async fn test_remove_subtask() {
        let (controller, _) = with_checklist().await;
        let id = controller.add_subtask(CardId(10), "Aquecer").await.unwrap();
        controller.remove_subtask(CardId(10), id).await.unwrap();
        assert!(controller.checklist(CardId(10)).unwrap().subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_add_subtask_without_checklist() {
        let (controller, _) = loaded(two_column_board()).await;
        let err = controller.add_subtask(CardId(11), "x").await.unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }
}
