// used for the keeper indexes
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash};
use std::fmt;

use seahash::SeaHasher;

use crate::model::{Book, BookId, Ident, Member, MemberId, Transaction, TransactionId};

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

pub const GENESIS: Ident = 0;

// ------------- Identifiers -------------
/// Hands out identifiers for new entities. Implementations must never return
/// the same identifier twice, nor one that has been retained.
pub trait IdGenerator: Send {
    fn generate(&mut self) -> Ident;
    // Ids may be given explicitly, as with seed data, in which case the
    // generator has to steer clear of them from then on.
    fn retain(&mut self, id: Ident);
}

#[derive(Debug)]
pub struct SequenceGenerator {
    lower_bound: Ident,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self { lower_bound: GENESIS }
    }
    pub fn starting_after(lower_bound: Ident) -> Self {
        Self { lower_bound }
    }
    pub fn lower_bound(&self) -> Ident {
        self.lower_bound
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&mut self) -> Ident {
        self.lower_bound = self.lower_bound.saturating_add(1);
        self.lower_bound
    }
    fn retain(&mut self, id: Ident) {
        if id > self.lower_bound {
            self.lower_bound = id;
        }
    }
}

// ------------- Keeper -------------
/// Anything a [`Keeper`] can own: it must know its own key.
pub trait Keepsake {
    type Key: Copy + Eq + Hash + fmt::Debug;
    fn key(&self) -> Self::Key;
}

impl Keepsake for Book {
    type Key = BookId;
    fn key(&self) -> BookId {
        self.id
    }
}
impl Keepsake for Member {
    type Key = MemberId;
    fn key(&self) -> MemberId {
        self.id
    }
}
impl Keepsake for Transaction {
    type Key = TransactionId;
    fn key(&self) -> TransactionId {
        self.id
    }
}

/// Owns one collection in insertion order, with a key index on the side.
#[derive(Debug)]
pub struct Keeper<T: Keepsake> {
    kept: Vec<T>,
    index: HashMap<T::Key, usize, KeyHasher>,
}

impl<T: Keepsake> Keeper<T> {
    pub fn new() -> Self {
        Self {
            kept: Vec::new(),
            index: HashMap::default(),
        }
    }
    /// Keeps the keepsake unless its key is already taken. Returns the kept
    /// value and whether it was previously kept (nothing is replaced then).
    pub fn keep(&mut self, keepsake: T) -> (&T, bool) {
        let key = keepsake.key();
        let position = match self.index.get(&key) {
            Some(&position) => return (&self.kept[position], true),
            None => self.kept.len(),
        };
        self.kept.push(keepsake);
        self.index.insert(key, position);
        (&self.kept[position], false)
    }
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).and_then(|&position| self.kept.get(position))
    }
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        match self.index.get(key) {
            Some(&position) => self.kept.get_mut(position),
            None => None,
        }
    }
    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let position = self.index.remove(key)?;
        let removed = self.kept.remove(position);
        // everything after the hole moved one step to the left
        for (offset, keepsake) in self.kept[position..].iter().enumerate() {
            self.index.insert(keepsake.key(), position + offset);
        }
        Some(removed)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.kept.iter()
    }
    // keys must not be changed through this
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.kept.iter_mut()
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl<T: Keepsake> Default for Keeper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Keepsake> IntoIterator for &'a Keeper<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.kept.iter()
    }
}

// ------------- Store -------------
// Owns the id generator and one keeper per collection.
pub struct Store {
    id_generator: Box<dyn IdGenerator>,
    pub(crate) books: Keeper<Book>,
    pub(crate) members: Keeper<Member>,
    pub(crate) transactions: Keeper<Transaction>,
}

impl Store {
    pub fn new(id_generator: Box<dyn IdGenerator>) -> Self {
        Self {
            id_generator,
            books: Keeper::new(),
            members: Keeper::new(),
            transactions: Keeper::new(),
        }
    }
    pub fn with_sequence() -> Self {
        Self::new(Box::new(SequenceGenerator::new()))
    }
    pub fn books(&self) -> &Keeper<Book> {
        &self.books
    }
    pub fn members(&self) -> &Keeper<Member> {
        &self.members
    }
    pub fn transactions(&self) -> &Keeper<Transaction> {
        &self.transactions
    }
    pub(crate) fn generate_id(&mut self) -> Ident {
        self.id_generator.generate()
    }
    // used when loading entities that come with their own ids
    pub(crate) fn retain_id(&mut self, id: Ident) {
        self.id_generator.retain(id);
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("books", &self.books.len())
            .field("members", &self.members.len())
            .field("transactions", &self.transactions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookKind, NewBook};

    fn book(id: Ident, title: &str) -> Book {
        NewBook::new(title, "Someone", BookKind::Book, "BK-0").into_book(BookId(id))
    }

    #[test]
    fn keeper_keeps_order_and_refuses_duplicates() {
        let mut keeper = Keeper::new();
        keeper.keep(book(3, "c"));
        keeper.keep(book(1, "a"));
        let (kept, previously_kept) = keeper.keep(book(3, "other"));
        assert!(previously_kept);
        assert_eq!(kept.title, "c");
        let titles: Vec<_> = keeper.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["c", "a"]);
    }

    #[test]
    fn keeper_reindexes_after_remove() {
        let mut keeper = Keeper::new();
        for (id, title) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
            keeper.keep(book(id, title));
        }
        assert_eq!(keeper.remove(&BookId(2)).map(|b| b.title), Some("b".to_string()));
        assert!(keeper.get(&BookId(2)).is_none());
        assert_eq!(keeper.get(&BookId(3)).map(|b| b.title.as_str()), Some("c"));
        assert_eq!(keeper.get(&BookId(4)).map(|b| b.title.as_str()), Some("d"));
        assert_eq!(keeper.len(), 3);
    }

    #[test]
    fn sequence_skips_retained_ids() {
        let mut generator = SequenceGenerator::new();
        generator.retain(4);
        generator.retain(2);
        assert_eq!(generator.generate(), 5);
        assert_eq!(generator.generate(), 6);
    }
}
