//! End-to-end board scenarios against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use board_core::positioning::is_contiguous;
use board_core::remote::{
    CardUpdate, ColumnUpdate, NewCard, NewColumn, NewSubtask, NewTag, RecordedRequest,
    ReorderCard, StoreOp, SubtaskUpdate, TaskStore,
};
use board_core::{
    Board, BoardController, BoardResult, Card, CardId, Checklist, Column, ColumnId, DragId,
    InMemoryTaskStore, Notifier, PendingSync, QueryCache, QueryData, QueryKey, Subtask,
    SubtaskId, Tag, TagId,
};
use proptest::prelude::*;
use tokio::sync::Semaphore;

const A: ColumnId = ColumnId(1);
const B: ColumnId = ColumnId(2);
const A1: CardId = CardId(10);
const A2: CardId = CardId(11);

fn board_ab() -> Board {
    let mut a = Column::new(A, "A", 1);
    a.cards = vec![Card::new(A1, A, "a1", 1), Card::new(A2, A, "a2", 2)];
    Board::new(vec![a, Column::new(B, "B", 2)])
}

async fn setup(board: Board) -> (BoardController, InMemoryTaskStore) {
    board_core::logging::init_logging();
    let store = InMemoryTaskStore::with_board(board);
    let controller = BoardController::new(Arc::new(store.clone()), QueryCache::new(), Notifier::new());
    controller.load_board().await.expect("load board");
    (controller, store)
}

fn card_ids(board: &Board, column: ColumnId) -> Vec<CardId> {
    board.column(column).unwrap().cards.iter().map(|c| c.id).collect()
}

fn positions(board: &Board, column: ColumnId) -> Vec<i32> {
    board.column(column).unwrap().cards.iter().map(|c| c.position).collect()
}

#[tokio::test]
async fn moving_a2_above_a1_sends_one_reorder() {
    let (controller, store) = setup(board_ab()).await;

    assert!(controller.drop_and_sync(DragId::Card(A2), Some(DragId::Card(A1))).await);

    let board = controller.board();
    assert_eq!(card_ids(&board, A), vec![A2, A1]);
    assert_eq!(positions(&board, A), vec![1, 2]);
    assert_eq!(
        store.recorded(),
        vec![RecordedRequest::ReorderCard(ReorderCard {
            tarefa_id: A2,
            position: 1,
            card_id: A,
        })]
    );
    // server agrees with the optimistic order
    assert_eq!(card_ids(&store.snapshot(), A), vec![A2, A1]);
}

#[tokio::test]
async fn moving_a1_into_empty_column() {
    let (controller, store) = setup(board_ab()).await;

    assert!(controller.drop_and_sync(DragId::Card(A1), Some(DragId::Column(B))).await);

    let board = controller.board();
    assert_eq!(card_ids(&board, A), vec![A2]);
    assert_eq!(positions(&board, A), vec![1]);
    assert_eq!(card_ids(&board, B), vec![A1]);
    assert_eq!(positions(&board, B), vec![1]);
    assert_eq!(
        store.recorded(),
        vec![RecordedRequest::ReorderCard(ReorderCard {
            tarefa_id: A1,
            position: 1,
            card_id: B,
        })]
    );
}

#[tokio::test]
async fn deleting_a_column_sends_no_card_deletes() {
    let (controller, store) = setup(board_ab()).await;

    controller.delete_column(A).await.unwrap();

    let board = controller.board();
    assert!(board.card(A1).is_none());
    assert!(board.card(A2).is_none());
    assert_eq!(board.columns.len(), 1);
    assert_eq!(store.recorded(), vec![RecordedRequest::DeleteColumn(A)]);
}

#[tokio::test]
async fn failed_column_move_restores_server_order() {
    let (controller, store) = setup(board_ab()).await;
    store.fail(StoreOp::UpdateColumn);

    let pending = controller
        .on_drag_end(DragId::Column(B), Some(DragId::Column(A)))
        .expect("column move");
    assert_eq!(controller.board().columns[0].id, B);
    assert!(matches!(pending, PendingSync::MoveColumn(_)));

    assert!(controller.sync(pending).await.is_err());
    let board = controller.board();
    assert_eq!(board.columns.iter().map(|c| c.id).collect::<Vec<_>>(), vec![A, B]);
    assert!(!controller.cache().is_stale(&QueryKey::Board));
    assert_eq!(controller.notifier().pending(), 1);
}

#[tokio::test]
async fn created_card_ends_with_one_server_id() {
    let (controller, _) = setup(board_ab()).await;

    let id = controller.create_card(B).await.unwrap();

    let board = controller.board();
    assert_eq!(card_ids(&board, B), vec![id]);
    assert_eq!(board.cards().filter(|c| c.id.is_temporary()).count(), 0);
    assert_eq!(board.card_count(), 3);
}

#[tokio::test]
async fn same_index_move_is_a_noop() {
    let (controller, store) = setup(board_ab()).await;
    let before = controller.board();

    // a2 is already last in A
    assert_eq!(controller.on_drag_end(DragId::Card(A2), Some(DragId::Column(A))), None);
    assert!(!controller.drop_and_sync(DragId::Card(A1), Some(DragId::Card(A1))).await);

    assert_eq!(controller.board(), before);
    assert!(store.recorded().is_empty());
}

#[tokio::test]
async fn stale_fetch_does_not_clobber_drop() {
    let (controller, _) = setup(board_ab()).await;

    // a refetch starts, then a drop lands before it resolves
    let ticket = controller.cache().begin_fetch(QueryKey::Board);
    controller
        .on_drag_end(DragId::Card(A2), Some(DragId::Card(A1)))
        .expect("reorder");
    let stored = controller
        .cache()
        .resolve_fetch(ticket, QueryData::Board(board_ab()));

    assert!(!stored);
    assert_eq!(card_ids(&controller.board(), A), vec![A2, A1]);
}

#[tokio::test]
async fn noop_drop_keeps_running_refetch() {
    let (controller, _) = setup(board_ab()).await;
    controller.cache().invalidate(&QueryKey::Board);
    let ticket = controller.cache().begin_fetch(QueryKey::Board);

    // a2 is already last in A
    assert_eq!(controller.on_drag_end(DragId::Card(A2), Some(DragId::Column(A))), None);

    let mut fresh = board_ab();
    fresh.columns[0].title = "A (servidor)".to_string();
    assert!(controller.cache().resolve_fetch(ticket, QueryData::Board(fresh)));
    assert!(!controller.cache().is_stale(&QueryKey::Board));
    assert_eq!(controller.board().columns[0].title, "A (servidor)");
}

/// In-memory store whose card creation waits for a permit
struct GatedStore {
    inner: InMemoryTaskStore,
    gate: Arc<Semaphore>,
}

#[async_trait(?Send)]
impl TaskStore for GatedStore {
    async fn list_columns(&self) -> BoardResult<Vec<Column>> {
        self.inner.list_columns().await
    }
    async fn create_column(&self, req: &NewColumn) -> BoardResult<Column> {
        self.inner.create_column(req).await
    }
    async fn update_column(&self, req: &ColumnUpdate) -> BoardResult<()> {
        self.inner.update_column(req).await
    }
    async fn delete_column(&self, id: ColumnId) -> BoardResult<()> {
        self.inner.delete_column(id).await
    }
    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        self.inner.list_cards().await
    }
    async fn create_card(&self, req: &NewCard) -> BoardResult<Card> {
        let _permit = self.gate.acquire().await;
        self.inner.create_card(req).await
    }
    async fn update_card(&self, id: CardId, req: &CardUpdate) -> BoardResult<()> {
        self.inner.update_card(id, req).await
    }
    async fn reorder_card(&self, req: &ReorderCard) -> BoardResult<()> {
        self.inner.reorder_card(req).await
    }
    async fn delete_card(&self, id: CardId) -> BoardResult<()> {
        self.inner.delete_card(id).await
    }
    async fn list_tags(&self) -> BoardResult<Vec<Tag>> {
        self.inner.list_tags().await
    }
    async fn create_tag(&self, req: &NewTag) -> BoardResult<Tag> {
        self.inner.create_tag(req).await
    }
    async fn delete_tag(&self, id: TagId) -> BoardResult<()> {
        self.inner.delete_tag(id).await
    }
    async fn attach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        self.inner.attach_tag(card, tag).await
    }
    async fn detach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        self.inner.detach_tag(card, tag).await
    }
    async fn get_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>> {
        self.inner.get_checklist(card).await
    }
    async fn create_checklist(&self, card: CardId) -> BoardResult<Checklist> {
        self.inner.create_checklist(card).await
    }
    async fn create_subtask(&self, req: &NewSubtask) -> BoardResult<Subtask> {
        self.inner.create_subtask(req).await
    }
    async fn update_subtask(&self, id: SubtaskId, req: &SubtaskUpdate) -> BoardResult<()> {
        self.inner.update_subtask(id, req).await
    }
    async fn delete_subtask(&self, id: SubtaskId) -> BoardResult<()> {
        self.inner.delete_subtask(id).await
    }
}

#[tokio::test]
async fn created_card_survives_refetch_during_create() {
    let inner = InMemoryTaskStore::with_board(board_ab());
    let gate = Arc::new(Semaphore::new(0));
    let store = GatedStore {
        inner: inner.clone(),
        gate: gate.clone(),
    };
    let controller = BoardController::new(Arc::new(store), QueryCache::new(), Notifier::new());
    controller.load_board().await.expect("load board");

    let refetch = async {
        // the stand-in is cached while the create waits on the store
        assert_eq!(controller.board().card_count(), 3);
        controller.load_board().await.expect("refetch");
        assert_eq!(controller.board().card_count(), 2);
        gate.add_permits(1);
    };
    let (created, ()) = tokio::join!(controller.create_card(B), refetch);
    let id = created.expect("card created");

    let board = controller.board();
    assert_eq!(card_ids(&board, B), vec![id]);
    assert_eq!(board.cards().filter(|c| c.id == id).count(), 1);
    assert_eq!(board.cards().filter(|c| c.id.is_temporary()).count(), 0);
    assert_eq!(board, inner.snapshot());
}

fn three_columns() -> Board {
    let mut columns = Vec::new();
    let mut next = 100;
    for (index, size) in [3usize, 0, 2].iter().enumerate() {
        let id = ColumnId(index as i64 + 1);
        let mut column = Column::new(id, format!("C{}", index), index as i32 + 1);
        for pos in 0..*size {
            column.cards.push(Card::new(CardId(next), id, "t", pos as i32 + 1));
            next += 1;
        }
        columns.push(column);
    }
    Board::new(columns)
}

fn drag_target() -> impl Strategy<Value = DragId> {
    prop_oneof![
        (1i64..=3).prop_map(|c| DragId::Column(ColumnId(c))),
        (100i64..105).prop_map(|c| DragId::Card(CardId(c))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn card_and_column_moves_keep_positions_contiguous(
        moves in prop::collection::vec((drag_target(), drag_target()), 1..15),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let (controller, store) = setup(three_columns()).await;
            for (dragged, target) in moves {
                controller.drop_and_sync(dragged, Some(target)).await;

                let board = controller.board();
                prop_assert!(is_contiguous(&board.columns));
                for column in &board.columns {
                    prop_assert!(is_contiguous(&column.cards));
                    prop_assert!(column.cards.iter().all(|c| c.column_id == column.id));
                }
                prop_assert_eq!(board.card_count(), 5);
                // the store applied the same move
                prop_assert_eq!(&store.snapshot(), &board);
            }
            Ok(())
        })?;
    }
}
