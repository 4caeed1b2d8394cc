//! In-process stores used when no database is configured.
//!
//! All three repositories share one [`MemoryStore`] so favourites behave like
//! the relational schema: they reference existing books and disappear when
//! either side of the pair is deleted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, BookRepository, BookRepositoryError,
    FavouriteRepository, FavouriteRepositoryError,
};
use crate::domain::{
    Account, AccountId, Book, BookBrief, BookDraft, BookId, BookPage, BookQuery, NewAccount, Role,
    StoredAccount, Username,
};

const POISONED: &str = "memory store lock poisoned";

#[derive(Debug, Default)]
struct State {
    next_account: i64,
    next_book: i64,
    accounts: BTreeMap<AccountId, StoredAccount>,
    books: BTreeMap<BookId, Book>,
    // Insertion order doubles as the "favourited at" ordering.
    favourites: Vec<(AccountId, BookId)>,
}

impl State {
    fn allocate_account(&mut self) -> Result<AccountId, String> {
        self.next_account += 1;
        AccountId::new(self.next_account).map_err(|err| err.to_string())
    }

    fn allocate_book(&mut self) -> Result<BookId, String> {
        self.next_book += 1;
        BookId::new(self.next_book).map_err(|err| err.to_string())
    }
}

fn page_of(items: Vec<BookBrief>, page: PageRequest) -> BookPage {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    BookPage {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total,
    }
}

/// Shared backing state for the in-memory repositories.
///
/// Identifiers start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> MemoryAccountRepository {
        MemoryAccountRepository {
            store: self.clone(),
        }
    }

    pub fn books(&self) -> MemoryBookRepository {
        MemoryBookRepository {
            store: self.clone(),
        }
    }

    pub fn favourites(&self) -> MemoryFavouriteRepository {
        MemoryFavouriteRepository {
            store: self.clone(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

/// [`AccountRepository`] over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryAccountRepository {
    store: MemoryStore,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<StoredAccount, AccountRepositoryError> {
        let mut state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        if state
            .accounts
            .values()
            .any(|stored| stored.account.username == account.username)
        {
            return Err(AccountRepositoryError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        let id = state
            .allocate_account()
            .map_err(AccountRepositoryError::query)?;
        let stored = StoredAccount {
            account: Account {
                id,
                username: account.username.clone(),
                role: account.role,
            },
            password_hash: account.password_hash.clone(),
        };
        state.accounts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state
            .accounts
            .values()
            .find(|stored| &stored.account.username == username)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state
            .accounts
            .values()
            .map(|stored| stored.account.clone())
            .collect())
    }

    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state.accounts.get_mut(&id).map(|stored| {
            stored.account.role = role;
            stored.account.clone()
        }))
    }

    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError> {
        let mut state = self.store.lock().map_err(AccountRepositoryError::connection)?;
        let removed = state.accounts.remove(&id).is_some();
        if removed {
            state.favourites.retain(|(account, _)| *account != id);
        }
        Ok(removed)
    }
}

/// [`BookRepository`] over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryBookRepository {
    store: MemoryStore,
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut state = self.store.lock().map_err(BookRepositoryError::connection)?;
        let id = state.allocate_book().map_err(BookRepositoryError::query)?;
        let book = Book::from_draft(id, draft.clone());
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let state = self.store.lock().map_err(BookRepositoryError::connection)?;
        Ok(state.books.get(&id).cloned())
    }

    async fn list(&self, query: &BookQuery) -> Result<BookPage, BookRepositoryError> {
        let state = self.store.lock().map_err(BookRepositoryError::connection)?;
        let matching = state
            .books
            .values()
            .filter(|book| {
                query
                    .genre
                    .as_deref()
                    .is_none_or(|genre| book.genre == genre)
            })
            .map(Book::brief)
            .collect();
        Ok(page_of(matching, query.page))
    }

    async fn genres(&self) -> Result<Vec<String>, BookRepositoryError> {
        let state = self.store.lock().map_err(BookRepositoryError::connection)?;
        let mut genres: Vec<String> = state.books.values().map(|book| book.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        Ok(genres)
    }

    async fn update(
        &self,
        id: BookId,
        draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut state = self.store.lock().map_err(BookRepositoryError::connection)?;
        Ok(state.books.get_mut(&id).map(|book| {
            *book = Book::from_draft(id, draft.clone());
            book.clone()
        }))
    }

    async fn delete(&self, id: BookId) -> Result<bool, BookRepositoryError> {
        let mut state = self.store.lock().map_err(BookRepositoryError::connection)?;
        let removed = state.books.remove(&id).is_some();
        if removed {
            state.favourites.retain(|(_, book)| *book != id);
        }
        Ok(removed)
    }
}

/// [`FavouriteRepository`] over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryFavouriteRepository {
    store: MemoryStore,
}

#[async_trait]
impl FavouriteRepository for MemoryFavouriteRepository {
    async fn add(&self, account: AccountId, book: BookId) -> Result<(), FavouriteRepositoryError> {
        let mut state = self
            .store
            .lock()
            .map_err(FavouriteRepositoryError::connection)?;
        if !state.accounts.contains_key(&account) {
            return Err(FavouriteRepositoryError::unknown_account(account.get()));
        }
        if !state.books.contains_key(&book) {
            return Err(FavouriteRepositoryError::unknown_book(book.get()));
        }
        if !state.favourites.contains(&(account, book)) {
            state.favourites.push((account, book));
        }
        Ok(())
    }

    async fn remove(
        &self,
        account: AccountId,
        book: BookId,
    ) -> Result<(), FavouriteRepositoryError> {
        let mut state = self
            .store
            .lock()
            .map_err(FavouriteRepositoryError::connection)?;
        state.favourites.retain(|pair| *pair != (account, book));
        Ok(())
    }

    async fn list(
        &self,
        account: AccountId,
        page: PageRequest,
    ) -> Result<BookPage, FavouriteRepositoryError> {
        let state = self
            .store
            .lock()
            .map_err(FavouriteRepositoryError::connection)?;
        let items = state
            .favourites
            .iter()
            .filter(|(owner, _)| *owner == account)
            .filter_map(|(_, book)| state.books.get(book).map(Book::brief))
            .collect();
        Ok(page_of(items, page))
    }
}
