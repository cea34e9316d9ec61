use crate::models::{
    ContactRecord, Customer, CustomerGroup, Goal, Notification, ScheduleEvent, Todo,
};

pub trait Entity {
    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(impl Entity for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_entity!(Customer, ContactRecord, ScheduleEvent, CustomerGroup, Goal, Todo, Notification);

/// Where `add` places new records. Listing order is what views render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrder {
    /// Newest first.
    Prepend,
    /// Oldest first.
    Append,
}

#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
    order: InsertOrder,
}

impl<T: Entity + Clone> EntityStore<T> {
    pub fn new(order: InsertOrder) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    /// Builds a store from records already in listing order.
    pub fn with_items(order: InsertOrder, items: Vec<T>) -> Self {
        Self { items, order }
    }

    pub fn add(&mut self, item: T) -> String {
        let id = item.id().to_string();
        match self.order {
            InsertOrder::Prepend => self.items.insert(0, item),
            InsertOrder::Append => self.items.push(item),
        }
        id
    }

    /// Adds a batch in one step; the batch keeps its own order.
    pub fn add_batch(&mut self, batch: Vec<T>) -> usize {
        let count = batch.len();
        match self.order {
            InsertOrder::Prepend => {
                self.items.splice(0..0, batch);
            }
            InsertOrder::Append => self.items.extend(batch),
        }
        count
    }

    pub fn update(&mut self, id: &str, apply: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityStore, InsertOrder};
    use crate::models::Todo;

    fn todo(id: &str) -> Todo {
        Todo {
            id: id.to_string(),
            title: format!("todo {}", id),
            time: "09:00".to_string(),
            completed: false,
        }
    }

    fn ids(store: &EntityStore<Todo>) -> Vec<&str> {
        store.list().iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn prepend_store_lists_newest_first() {
        let mut store = EntityStore::new(InsertOrder::Prepend);
        store.add(todo("a"));
        store.add(todo("b"));
        assert_eq!(ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn append_store_lists_oldest_first() {
        let mut store = EntityStore::new(InsertOrder::Append);
        store.add(todo("a"));
        store.add(todo("b"));
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn prepended_batch_keeps_input_order() {
        let mut store = EntityStore::with_items(InsertOrder::Prepend, vec![todo("old")]);
        let added = store.add_batch(vec![todo("x"), todo("y"), todo("z")]);
        assert_eq!(added, 3);
        assert_eq!(ids(&store), vec!["x", "y", "z", "old"]);
    }

    #[test]
    fn update_and_remove_report_missing_ids() {
        let mut store = EntityStore::new(InsertOrder::Append);
        store.add(todo("a"));
        assert!(store.update("a", |item| item.completed = true));
        assert!(store.get("a").map(|item| item.completed).unwrap_or(false));
        assert!(!store.update("missing", |item| item.completed = true));
        assert!(store.remove("missing").is_none());
        assert_eq!(store.remove("a").map(|item| item.id), Some("a".to_string()));
        assert!(store.is_empty());
    }
}
