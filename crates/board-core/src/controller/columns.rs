//! Column mutations.

use super::{unsaved, BoardController};
use crate::cache::QueryKey;
use crate::debounce::DebounceTicket;
use crate::domain::{remove_by_id, swap_temporary, Column, ColumnId};
use crate::error::BoardResult;
use crate::notify::GENERIC_FAILURE;
use crate::positioning::{next_position, resequence};
use crate::remote::{ColumnUpdate, NewColumn};

impl BoardController {
    /// Append a column under a temporary id, then swap in the server's copy.
    /// The temporary column is dropped if the store refuses it.
    pub async fn create_column(&self, title: &str) -> BoardResult<ColumnId> {
        self.ensure_board().await?;
        let title = title.trim().to_string();
        let temp = ColumnId(self.cache.temp_id());

        let position = self
            .optimistic_board(|board| {
                let position = next_position(&board.columns);
                board.columns.push(Column::new(temp, title.clone(), position));
                Some(position)
            })
            .map(|(_, position)| position)
            .ok_or_else(|| crate::error::BoardError::not_found("board"))?;

        let result = self
            .store
            .create_column(&NewColumn {
                title: title.clone(),
                position,
            })
            .await;
        match result {
            Ok(created) => {
                let id = created.id;
                self.optimistic_board(|board| {
                    let created = Column {
                        cards: Vec::new(),
                        ..created
                    };
                    swap_temporary(&mut board.columns, temp, created);
                    resequence(&mut board.columns);
                    Some(())
                });
                tracing::debug!(%temp, %id, "column created");
                Ok(id)
            }
            Err(err) => {
                self.optimistic_board(|board| {
                    remove_by_id(&mut board.columns, temp)?;
                    resequence(&mut board.columns);
                    Some(())
                });
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    /// Show the new title right away and schedule the write. Redeem the
    /// ticket with `flush_column_rename` once the quiet period has passed.
    pub fn rename_column_local(&self, id: ColumnId, title: &str) -> Option<DebounceTicket<ColumnId>> {
        let title = title.to_string();
        self.optimistic_board(|board| {
            let column = board.column_mut(id)?;
            column.title = title.clone();
            Some(())
        })?;
        Some(self.edits().column_titles.schedule(id, title))
    }

    /// Send the debounced title if `ticket` is still the latest edit.
    /// Returns whether a request was made.
    pub async fn flush_column_rename(&self, ticket: DebounceTicket<ColumnId>) -> BoardResult<bool> {
        let Some(title) = self.edits().column_titles.take(ticket) else {
            return Ok(false);
        };
        let id = ticket.key;
        if id.is_temporary() {
            return Ok(false);
        }
        let Some(position) = self
            .cache
            .board()
            .and_then(|board| board.column(id).map(|c| c.position))
        else {
            return Ok(false);
        };

        let req = ColumnUpdate {
            id,
            title: title.trim().to_string(),
            position,
        };
        if let Err(err) = self.store.update_column(&req).await {
            self.report(&err, GENERIC_FAILURE);
            self.heal(QueryKey::Board).await;
            return Err(err);
        }
        Ok(true)
    }

    /// Remove a column and its cards. Cards go with it server-side, so only
    /// one request is sent.
    pub async fn delete_column(&self, id: ColumnId) -> BoardResult<()> {
        if id.is_temporary() {
            return Err(unsaved("column", id));
        }
        self.edits().column_titles.cancel(id);
        let Some((mut mutation, removed)) = self.optimistic_board(|board| {
            let removed = remove_by_id(&mut board.columns, id)?;
            resequence(&mut board.columns);
            Some(removed)
        }) else {
            return Ok(());
        };

        let result = self.store.delete_column(id).await;
        self.settle(&mut mutation, result)?;
        for card in &removed.cards {
            self.cache.remove(&QueryKey::Checklist(card.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::domain::{CardId, ColumnId};
    use crate::notify::GENERIC_FAILURE;
    use crate::positioning::is_contiguous;
    use crate::remote::{RecordedRequest, StoreOp};

    #[tokio::test]
    async fn test_create_column_swaps_temp_id() {
        let (controller, store) = loaded(two_column_board()).await;
        let id = controller.create_column("  Hoje ").await.unwrap();

        let board = controller.board();
        assert!(!id.is_temporary());
        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.columns[2].id, id);
        assert_eq!(board.columns[2].title, "Hoje");
        assert!(board.columns.iter().all(|c| !c.id.is_temporary()));
        assert_eq!(store.snapshot().columns.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_create_column_leaves_no_temp() {
        let (controller, store) = loaded(two_column_board()).await;
        store.fail(StoreOp::CreateColumn);
        assert!(controller.create_column("Hoje").await.is_err());
        assert_eq!(controller.board().columns.len(), 2);
        assert_eq!(controller.notifier().drain()[0].message, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_debounced_rename_sends_latest_only() {
        let (controller, store) = loaded(two_column_board()).await;
        let first = controller.rename_column_local(ColumnId(1), "Fa").unwrap();
        let second = controller.rename_column_local(ColumnId(1), "Fazendo").unwrap();
        assert_eq!(controller.board().columns[0].title, "Fazendo");

        assert!(!controller.flush_column_rename(first).await.unwrap());
        assert!(controller.flush_column_rename(second).await.unwrap());
        assert_eq!(store.recorded().len(), 1);
        assert_eq!(store.snapshot().columns[0].title, "Fazendo");
    }

    #[tokio::test]
    async fn test_delete_column_cascades_locally() {
        let (controller, store) = loaded(two_column_board()).await;
        controller.delete_column(ColumnId(1)).await.unwrap();

        let board = controller.board();
        assert!(board.card(CardId(10)).is_none());
        assert!(board.card(CardId(11)).is_none());
        assert!(is_contiguous(&board.columns));
        assert_eq!(store.recorded(), vec![RecordedRequest::DeleteColumn(ColumnId(1))]);
    }

    #[tokio::test]
    async fn test_failed_delete_column_restores() {
        let (controller, store) = loaded(two_column_board()).await;
        store.fail(StoreOp::DeleteColumn);
        assert!(controller.delete_column(ColumnId(1)).await.is_err());
        assert_eq!(controller.board().card_count(), 2);
    }
}
