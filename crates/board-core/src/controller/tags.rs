//! Tag catalogue and card tag assignment.

use super::{unsaved, BoardController};
use crate::cache::{QueryData, QueryKey};
use crate::domain::{remove_by_id, swap_temporary, CardId, Tag, TagId, DEFAULT_TAG_COLOR};
use crate::error::{BoardError, BoardResult};
use crate::notify::GENERIC_FAILURE;
use crate::remote::NewTag;

impl BoardController {
    pub async fn load_tags(&self) -> BoardResult<Vec<Tag>> {
        match self.fetch_tags().await {
            Ok(tags) => Ok(tags),
            Err(err) => {
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    pub(crate) async fn fetch_tags(&self) -> BoardResult<Vec<Tag>> {
        let ticket = self.cache.begin_fetch(QueryKey::Tags);
        let tags = self.store.list_tags().await?;
        self.cache.resolve_fetch(ticket, QueryData::Tags(tags.clone()));
        Ok(tags)
    }

    /// Cached tags, empty until loaded
    pub fn tags(&self) -> Vec<Tag> {
        self.cache.tags().unwrap_or_default()
    }

    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> BoardResult<TagId> {
        if self.cache.tags().is_none() {
            self.load_tags().await?;
        }
        let req = NewTag {
            name: name.trim().to_string(),
            color: color.unwrap_or(DEFAULT_TAG_COLOR).to_string(),
        };
        let temp = TagId(self.cache.temp_id());
        self.optimistic(QueryKey::Tags, |data| {
            data.as_tags_mut()?
                .push(Tag::with_color(temp, req.name.clone(), req.color.clone()));
            Some(())
        });

        match self.store.create_tag(&req).await {
            Ok(created) => {
                let id = created.id;
                self.optimistic(QueryKey::Tags, |data| {
                    swap_temporary(data.as_tags_mut()?, temp, created);
                    Some(())
                });
                Ok(id)
            }
            Err(err) => {
                self.optimistic(QueryKey::Tags, |data| {
                    remove_by_id(data.as_tags_mut()?, temp).map(|_| ())
                });
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    /// Delete a tag and drop it from every card that carries it
    pub async fn delete_tag(&self, id: TagId) -> BoardResult<()> {
        if id.is_temporary() {
            return Err(unsaved("tag", id));
        }
        let catalogue = self.optimistic(QueryKey::Tags, |data| {
            remove_by_id(data.as_tags_mut()?, id).map(|_| ())
        });
        let cards = self.optimistic_board(|board| {
            let mut touched = false;
            for column in &mut board.columns {
                for card in &mut column.cards {
                    let before = card.tags.len();
                    card.tags.retain(|t| *t != id);
                    touched |= card.tags.len() != before;
                }
            }
            touched.then_some(())
        });

        let result = self.store.delete_tag(id).await;
        if let Some((mut mutation, ())) = cards {
            match &result {
                Ok(()) => mutation.confirm(),
                Err(_) => mutation.rollback(&self.cache),
            }
        }
        match catalogue {
            Some((mut mutation, ())) => self.settle(&mut mutation, result),
            None => {
                if let Err(err) = &result {
                    self.report(err, GENERIC_FAILURE);
                }
                result
            }
        }
    }

    pub async fn assign_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        if card.is_temporary() || tag.is_temporary() {
            return Err(unsaved("card tag", format!("{}/{}", card, tag)));
        }
        let Some((mut mutation, ())) = self.optimistic_board(|board| {
            let card = board.card_mut(card)?;
            if card.has_tag(tag) {
                return None;
            }
            card.tags.push(tag);
            Some(())
        }) else {
            // unknown card or tag already there
            return match self.cache.board().and_then(|b| b.card(card).cloned()) {
                Some(_) => Ok(()),
                None => Err(BoardError::not_found(format!("card {}", card))),
            };
        };
        let result = self.store.attach_tag(card, tag).await;
        self.settle(&mut mutation, result)
    }

    pub async fn unassign_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        if card.is_temporary() || tag.is_temporary() {
            return Err(unsaved("card tag", format!("{}/{}", card, tag)));
        }
        let Some((mut mutation, ())) = self.optimistic_board(|board| {
            let card = board.card_mut(card)?;
            let index = card.tags.iter().position(|t| *t == tag)?;
            card.tags.remove(index);
            Some(())
        }) else {
            return Ok(());
        };
        let result = self.store.detach_tag(card, tag).await;
        self.settle(&mut mutation, result)
    }
}
