//! In-memory task store.
//!
//! Applies the same ordering rules the backend does, records every write it
//! receives and can be told to fail specific operations. Used for offline
//! mode and as the remote double in tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::wire::{
    CardUpdate, ColumnUpdate, NewCard, NewColumn, NewSubtask, NewTag, ReorderCard, SubtaskUpdate,
};
use super::TaskStore;
use crate::domain::{
    remove_by_id, Board, Card, CardId, Checklist, ChecklistId, Column, ColumnId, Priority,
    Subtask, SubtaskId, Tag, TagId,
};
use crate::error::{BoardError, BoardResult};
use crate::positioning::{resequence, POSITION_BASE};

/// Store operations, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListColumns,
    CreateColumn,
    UpdateColumn,
    DeleteColumn,
    ListCards,
    CreateCard,
    UpdateCard,
    ReorderCard,
    DeleteCard,
    ListTags,
    CreateTag,
    DeleteTag,
    AttachTag,
    DetachTag,
    GetChecklist,
    CreateChecklist,
    CreateSubtask,
    UpdateSubtask,
    DeleteSubtask,
}

/// A write received by the store (reads are not recorded)
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    CreateColumn(NewColumn),
    UpdateColumn(ColumnUpdate),
    DeleteColumn(ColumnId),
    CreateCard(NewCard),
    UpdateCard(CardId, CardUpdate),
    ReorderCard(ReorderCard),
    DeleteCard(CardId),
    CreateTag(NewTag),
    DeleteTag(TagId),
    AttachTag(CardId, TagId),
    DetachTag(CardId, TagId),
    CreateChecklist(CardId),
    CreateSubtask(NewSubtask),
    UpdateSubtask(SubtaskId, SubtaskUpdate),
    DeleteSubtask(SubtaskId),
}

#[derive(Debug, Default)]
struct MemoryState {
    board: Board,
    tags: Vec<Tag>,
    checklists: HashMap<CardId, Checklist>,
    next_id: i64,
    failing: HashSet<StoreOp>,
    failing_once: HashSet<StoreOp>,
    recorded: Vec<RecordedRequest>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&mut self, op: StoreOp) -> BoardResult<()> {
        if self.failing.contains(&op) || self.failing_once.remove(&op) {
            return Err(BoardError::Status {
                status: 503,
                body: format!("injected failure for {:?}", op),
            });
        }
        Ok(())
    }

    fn column_mut(&mut self, id: ColumnId) -> BoardResult<&mut Column> {
        self.board.column_mut(id).ok_or_else(|| missing("column", id))
    }

    fn checklist_by_id(&mut self, id: ChecklistId) -> BoardResult<&mut Checklist> {
        self.checklists
            .values_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing("checklist", id))
    }

    fn subtask_mut(&mut self, id: SubtaskId) -> BoardResult<&mut Subtask> {
        self.checklists
            .values_mut()
            .flat_map(|c| c.subtasks.iter_mut())
            .find(|s| s.id == id)
            .ok_or_else(|| missing("subtask", id))
    }
}

fn missing(what: &str, id: impl std::fmt::Display) -> BoardError {
    BoardError::Status {
        status: 404,
        body: format!("{} {} not found", what, id),
    }
}

/// Clamp a 1-based position to an insertion index for a list of `len`
fn insertion_index(position: i32, len: usize) -> usize {
    let index = (position - POSITION_BASE).max(0) as usize;
    index.min(len)
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryTaskStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing board; ids continue after the largest one
    pub fn with_board(board: Board) -> Self {
        let max_id = board
            .columns
            .iter()
            .map(|c| c.id.0)
            .chain(board.cards().map(|c| c.id.0))
            .max()
            .unwrap_or(0);
        let store = Self::new();
        {
            let mut state = store.lock();
            state.board = Board::new(board.columns);
            state.next_id = max_id.max(0);
        }
        store
    }

    pub fn with_tags(self, tags: Vec<Tag>) -> Self {
        {
            let mut state = self.lock();
            let max_id = tags.iter().map(|t| t.id.0).max().unwrap_or(0);
            state.next_id = state.next_id.max(max_id);
            state.tags = tags;
        }
        self
    }

    /// Sample board used when no API is configured
    pub fn demo() -> Self {
        let mut todo = Column::new(ColumnId(1), "A fazer", 1);
        let mut doing = Column::new(ColumnId(2), "Fazendo", 2);
        let done = Column::new(ColumnId(3), "Feito", 3);

        let mut workout = Card::new(CardId(4), todo.id, "Treino da manhã", 1);
        workout.priority = Priority::High;
        workout.tags = vec![TagId(8)];
        let mut reading = Card::new(CardId(5), todo.id, "Ler 10 páginas", 2);
        reading.description = Some("Capítulo 3 de *Hábitos Atômicos*".to_string());
        reading.tags = vec![TagId(7)];
        todo.cards = vec![workout, reading];

        let mut focus = Card::new(CardId(6), doing.id, "Sessão de foco (Pomodoro)", 1);
        focus.priority = Priority::Low;
        doing.cards = vec![focus];

        Self::with_board(Board::new(vec![todo, doing, done])).with_tags(vec![
            Tag::with_color(TagId(7), "Foco", "#e74c3c"),
            Tag::with_color(TagId(8), "Saúde", "#27ae60"),
        ])
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail every call of `op` until healed
    pub fn fail(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    /// Fail the next call of `op` only
    pub fn fail_once(&self, op: StoreOp) {
        self.lock().failing_once.insert(op);
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.lock().recorded.clone()
    }

    /// Server-side view of the board
    pub fn snapshot(&self) -> Board {
        self.lock().board.clone()
    }

    pub fn checklist_snapshot(&self, card: CardId) -> Option<Checklist> {
        self.lock().checklists.get(&card).cloned()
    }
}

#[async_trait(?Send)]
impl TaskStore for InMemoryTaskStore {
    async fn list_columns(&self) -> BoardResult<Vec<Column>> {
        let mut state = self.lock();
        state.check(StoreOp::ListColumns)?;
        Ok(state.board.columns.clone())
    }

    async fn create_column(&self, req: &NewColumn) -> BoardResult<Column> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::CreateColumn(req.clone()));
        state.check(StoreOp::CreateColumn)?;

        let id = ColumnId(state.allocate_id());
        let index = insertion_index(req.position, state.board.columns.len());
        state
            .board
            .columns
            .insert(index, Column::new(id, req.title.clone(), req.position));
        resequence(&mut state.board.columns);
        Ok(state.board.columns[index].clone())
    }

    async fn update_column(&self, req: &ColumnUpdate) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::UpdateColumn(req.clone()));
        state.check(StoreOp::UpdateColumn)?;

        let mut column =
            remove_by_id(&mut state.board.columns, req.id).ok_or_else(|| missing("column", req.id))?;
        column.title = req.title.clone();
        let index = insertion_index(req.position, state.board.columns.len());
        state.board.columns.insert(index, column);
        resequence(&mut state.board.columns);
        Ok(())
    }

    async fn delete_column(&self, id: ColumnId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::DeleteColumn(id));
        state.check(StoreOp::DeleteColumn)?;

        let column = remove_by_id(&mut state.board.columns, id).ok_or_else(|| missing("column", id))?;
        for card in &column.cards {
            state.checklists.remove(&card.id);
        }
        resequence(&mut state.board.columns);
        Ok(())
    }

    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        let mut state = self.lock();
        state.check(StoreOp::ListCards)?;
        Ok(state.board.cards().cloned().collect())
    }

    async fn create_card(&self, req: &NewCard) -> BoardResult<Card> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::CreateCard(req.clone()));
        state.check(StoreOp::CreateCard)?;

        let id = CardId(state.allocate_id());
        let column = state.column_mut(req.column_id)?;
        let mut card = Card::new(id, req.column_id, req.title.clone(), req.position);
        card.description = req.description.clone();
        card.priority = req.priority;
        let index = insertion_index(req.position, column.cards.len());
        column.cards.insert(index, card);
        resequence(&mut column.cards);
        Ok(column.cards[index].clone())
    }

    async fn update_card(&self, id: CardId, req: &CardUpdate) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::UpdateCard(id, req.clone()));
        state.check(StoreOp::UpdateCard)?;

        let card = state.board.card_mut(id).ok_or_else(|| missing("card", id))?;
        card.title = req.title.clone();
        card.description = req.description.clone();
        card.priority = req.priority;
        Ok(())
    }

    async fn reorder_card(&self, req: &ReorderCard) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::ReorderCard(*req));
        state.check(StoreOp::ReorderCard)?;

        if state.board.column(req.card_id).is_none() {
            return Err(missing("column", req.card_id));
        }
        let (ci, ki) = state
            .board
            .locate_card(req.tarefa_id)
            .ok_or_else(|| missing("card", req.tarefa_id))?;
        let mut card = state.board.columns[ci].cards.remove(ki);
        resequence(&mut state.board.columns[ci].cards);

        card.column_id = req.card_id;
        let target = state.column_mut(req.card_id)?;
        let index = insertion_index(req.position, target.cards.len());
        target.cards.insert(index, card);
        resequence(&mut target.cards);
        Ok(())
    }

    async fn delete_card(&self, id: CardId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::DeleteCard(id));
        state.check(StoreOp::DeleteCard)?;

        let (ci, ki) = state.board.locate_card(id).ok_or_else(|| missing("card", id))?;
        state.board.columns[ci].cards.remove(ki);
        resequence(&mut state.board.columns[ci].cards);
        state.checklists.remove(&id);
        Ok(())
    }

    async fn list_tags(&self) -> BoardResult<Vec<Tag>> {
        let mut state = self.lock();
        state.check(StoreOp::ListTags)?;
        Ok(state.tags.clone())
    }

    async fn create_tag(&self, req: &NewTag) -> BoardResult<Tag> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::CreateTag(req.clone()));
        state.check(StoreOp::CreateTag)?;

        let tag = Tag::with_color(TagId(state.allocate_id()), req.name.clone(), req.color.clone());
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, id: TagId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::DeleteTag(id));
        state.check(StoreOp::DeleteTag)?;

        remove_by_id(&mut state.tags, id).ok_or_else(|| missing("tag", id))?;
        for column in &mut state.board.columns {
            for card in &mut column.cards {
                card.tags.retain(|t| *t != id);
            }
        }
        Ok(())
    }

    async fn attach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::AttachTag(card, tag));
        state.check(StoreOp::AttachTag)?;

        if !state.tags.iter().any(|t| t.id == tag) {
            return Err(missing("tag", tag));
        }
        let card = state.board.card_mut(card).ok_or_else(|| missing("card", card))?;
        if !card.has_tag(tag) {
            card.tags.push(tag);
        }
        Ok(())
    }

    async fn detach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::DetachTag(card, tag));
        state.check(StoreOp::DetachTag)?;

        let card = state.board.card_mut(card).ok_or_else(|| missing("card", card))?;
        card.tags.retain(|t| *t != tag);
        Ok(())
    }

    async fn get_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>> {
        let mut state = self.lock();
        state.check(StoreOp::GetChecklist)?;
        Ok(state.checklists.get(&card).cloned())
    }

    async fn create_checklist(&self, card: CardId) -> BoardResult<Checklist> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::CreateChecklist(card));
        state.check(StoreOp::CreateChecklist)?;

        if let Some(existing) = state.checklists.get(&card) {
            return Ok(existing.clone());
        }
        let checklist = Checklist::new(ChecklistId(state.allocate_id()), card);
        state
            .board
            .card_mut(card)
            .ok_or_else(|| missing("card", card))?
            .checklist = Some(checklist.id);
        state.checklists.insert(card, checklist.clone());
        Ok(checklist)
    }

    async fn create_subtask(&self, req: &NewSubtask) -> BoardResult<Subtask> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::CreateSubtask(req.clone()));
        state.check(StoreOp::CreateSubtask)?;

        let subtask = Subtask {
            id: SubtaskId(state.allocate_id()),
            name: req.name.clone(),
            checked: req.checked,
        };
        state
            .checklist_by_id(req.checklist_id)?
            .subtasks
            .push(subtask.clone());
        Ok(subtask)
    }

    async fn update_subtask(&self, id: SubtaskId, req: &SubtaskUpdate) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::UpdateSubtask(id, req.clone()));
        state.check(StoreOp::UpdateSubtask)?;

        let subtask = state.subtask_mut(id)?;
        subtask.name = req.name.clone();
        subtask.checked = req.checked;
        Ok(())
    }

    async fn delete_subtask(&self, id: SubtaskId) -> BoardResult<()> {
        let mut state = self.lock();
        state.recorded.push(RecordedRequest::DeleteSubtask(id));
        state.check(StoreOp::DeleteSubtask)?;

        let removed = state
            .checklists
            .values_mut()
            .any(|c| remove_by_id(&mut c.subtasks, id).is_some());
        if !removed {
            return Err(missing("subtask", id));
        }
        Ok(())
    }
}
