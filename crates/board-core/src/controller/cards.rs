//! Card mutations.

use super::{unsaved, BoardController};
use crate::cache::QueryKey;
use crate::domain::{swap_temporary, Card, CardId, ColumnId, Priority};
use crate::error::{BoardError, BoardResult};
use crate::notify::GENERIC_FAILURE;
use crate::positioning::{next_position, resequence};
use crate::remote::{CardUpdate, NewCard};

/// Title given to cards created from the "+" button
pub const DEFAULT_CARD_TITLE: &str = "Nova tarefa";

impl BoardController {
    /// Append a default card to a column under a temporary id and swap in
    /// the server id once it is known
    pub async fn create_card(&self, column: ColumnId) -> BoardResult<CardId> {
        if column.is_temporary() {
            return Err(unsaved("column", column));
        }
        self.ensure_board().await?;
        let temp = CardId(self.cache.temp_id());

        let (_, position) = self
            .optimistic_board(|board| {
                let cards = &mut board.column_mut(column)?.cards;
                let position = next_position(cards);
                cards.push(Card::new(temp, column, DEFAULT_CARD_TITLE, position));
                Some(position)
            })
            .ok_or_else(|| BoardError::not_found(format!("column {}", column)))?;

        let req = NewCard {
            title: DEFAULT_CARD_TITLE.to_string(),
            description: None,
            position,
            column_id: column,
            priority: Priority::Medium,
        };
        match self.store.create_card(&req).await {
            Ok(created) => {
                let id = created.id;
                self.optimistic_board(|board| {
                    // a refetch may already have placed it in another column
                    if board.locate_card(temp).is_none() && board.card(id).is_some() {
                        return None;
                    }
                    let cards = &mut board.column_mut(column)?.cards;
                    swap_temporary(cards, temp, Card { column_id: column, ..created });
                    resequence(cards);
                    Some(())
                });
                tracing::debug!(%temp, %id, "card created");
                Ok(id)
            }
            Err(err) => {
                self.optimistic_board(|board| {
                    let (ci, ki) = board.locate_card(temp)?;
                    let cards = &mut board.columns[ci].cards;
                    cards.remove(ki);
                    resequence(cards);
                    Some(())
                });
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    /// Save the fields edited in the card dialog
    pub async fn update_card(&self, id: CardId, update: CardUpdate) -> BoardResult<()> {
        if id.is_temporary() {
            return Err(unsaved("card", id));
        }
        let update = CardUpdate {
            title: update.title.trim().to_string(),
            description: update.description.filter(|d| !d.trim().is_empty()),
            ..update
        };
        let Some((mut mutation, ())) = self.optimistic_board(|board| {
            let card = board.card_mut(id)?;
            card.title = update.title.clone();
            card.description = update.description.clone();
            card.priority = update.priority;
            Some(())
        }) else {
            return Err(BoardError::not_found(format!("card {}", id)));
        };

        let result = self.store.update_card(id, &update).await;
        self.settle(&mut mutation, result)
    }

    pub async fn delete_card(&self, id: CardId) -> BoardResult<()> {
        if id.is_temporary() {
            return Err(unsaved("card", id));
        }
        let Some((mut mutation, ())) = self.optimistic_board(|board| {
            let (ci, ki) = board.locate_card(id)?;
            let cards = &mut board.columns[ci].cards;
            cards.remove(ki);
            resequence(cards);
            Some(())
        }) else {
            return Ok(());
        };

        let result = self.store.delete_card(id).await;
        self.settle(&mut mutation, result)?;
        self.cache.remove(&QueryKey::Checklist(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::positioning::is_contiguous;
    use crate::remote::StoreOp;

    #[tokio::test]
    async fn test_create_card_has_one_server_entry() {
        let (controller, store) = loaded(two_column_board()).await;
        let id = controller.create_card(ColumnId(2)).await.unwrap();

        let board = controller.board();
        let column = board.column(ColumnId(2)).unwrap();
        assert_eq!(column.cards.len(), 1);
        assert_eq!(column.cards[0].id, id);
        assert_eq!(column.cards[0].title, DEFAULT_CARD_TITLE);
        assert_eq!(column.cards[0].priority, Priority::Medium);
        assert!(board.cards().all(|c| !c.id.is_temporary()));
        assert!(store.snapshot().card(id).is_some());
    }

    #[tokio::test]
    async fn test_failed_create_card_leaves_no_temp() {
        let (controller, store) = loaded(two_column_board()).await;
        store.fail(StoreOp::CreateCard);
        assert!(controller.create_card(ColumnId(1)).await.is_err());
        let board = controller.board();
        assert_eq!(board.card_count(), 2);
        assert!(is_contiguous(&board.column(ColumnId(1)).unwrap().cards));
    }

    #[tokio::test]
    async fn test_create_card_in_unsaved_column_is_refused() {
        let (controller, store) = loaded(two_column_board()).await;
        let err = controller.create_card(ColumnId(-1)).await.unwrap_err();
        assert!(matches!(err, BoardError::Unsaved(_)));
        assert!(store.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_update_card_fields() {
        let (controller, store) = loaded(two_column_board()).await;
        controller
            .update_card(
                CardId(10),
                CardUpdate {
                    title: " Treinar ".into(),
                    description: Some("**pernas**".into()),
                    priority: Priority::High,
                },
            )
            .await
            .unwrap();
        let card = controller.board().card(CardId(10)).cloned().unwrap();
        assert_eq!(card.title, "Treinar");
        assert_eq!(card.priority, Priority::High);
        assert_eq!(store.snapshot().card(CardId(10)).unwrap().title, "Treinar");
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back() {
        let (controller, store) = loaded(two_column_board()).await;
        store.fail(StoreOp::UpdateCard);
        let result = controller
            .update_card(
                CardId(10),
                CardUpdate {
                    title: "x".into(),
                    description: None,
                    priority: Priority::Low,
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(controller.board().card(CardId(10)).unwrap().title, "a1");
    }

    #[tokio::test]
    async fn test_failed_delete_restores_card() {
        let (controller, store) = loaded(two_column_board()).await;
        store.fail(StoreOp::DeleteCard);
        assert!(controller.delete_card(CardId(10)).await.is_err());
        assert_eq!(controller.board().locate_card(CardId(10)), Some((0, 0)));
    }

    #[tokio::test]
    async fn test_delete_card_resequences() {
        let (controller, _) = loaded(two_column_board()).await;
        controller.delete_card(CardId(10)).await.unwrap();
        let board = controller.board();
        let cards = &board.column(ColumnId(1)).unwrap().cards;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].position, 1);
    }
}
