//! Favourites service composing relation-store pages into brief views.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::account_service::ACCOUNT_NOT_FOUND_MESSAGE;
use crate::domain::catalogue_service::BOOK_NOT_FOUND_MESSAGE;
use crate::domain::ports::{FavouriteRepository, FavouriteRepositoryError, FavouritesService};
use crate::domain::{AccountId, BookBrief, BookId, Error};

fn map_repository_error(error: FavouriteRepositoryError) -> Error {
    match error {
        FavouriteRepositoryError::Connection { message } => {
            Error::internal(format!("favourite repository unavailable: {message}"))
        }
        FavouriteRepositoryError::Query { message } => {
            Error::internal(format!("favourite repository error: {message}"))
        }
        FavouriteRepositoryError::UnknownAccount { .. } => {
            Error::not_found(ACCOUNT_NOT_FOUND_MESSAGE)
        }
        FavouriteRepositoryError::UnknownBook { .. } => Error::not_found(BOOK_NOT_FOUND_MESSAGE),
    }
}

/// Favourites service backed by the relation store.
#[derive(Clone)]
pub struct FavouritesServiceImpl<R> {
    favourites: Arc<R>,
}

impl<R> FavouritesServiceImpl<R> {
    /// Create a new service with the favourite repository.
    pub fn new(favourites: Arc<R>) -> Self {
        Self { favourites }
    }
}

#[async_trait]
impl<R> FavouritesService for FavouritesServiceImpl<R>
where
    R: FavouriteRepository,
{
    async fn add(&self, account: AccountId, book: BookId) -> Result<(), Error> {
        self.favourites
            .add(account, book)
            .await
            .map_err(map_repository_error)
    }

    async fn remove(&self, account: AccountId, book: BookId) -> Result<(), Error> {
        self.favourites
            .remove(account, book)
            .await
            .map_err(map_repository_error)
    }

    async fn list(
        &self,
        account: AccountId,
        page: PageRequest,
    ) -> Result<Paginated<BookBrief>, Error> {
        let found = self
            .favourites
            .list(account, page)
            .await
            .map_err(map_repository_error)?;
        Ok(Paginated::new(found.items, page, found.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockFavouriteRepository;
    use crate::domain::{BookPage, ErrorCode};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn account() -> AccountId {
        AccountId::new(7).expect("fixture id")
    }

    fn book() -> BookId {
        BookId::new(3).expect("fixture id")
    }

    #[tokio::test]
    async fn add_scopes_to_the_given_account() {
        let mut repo = MockFavouriteRepository::new();
        repo.expect_add()
            .with(eq(account()), eq(book()))
            .times(2)
            .returning(|_, _| Ok(()));
        let svc = FavouritesServiceImpl::new(Arc::new(repo));

        svc.add(account(), book()).await.expect("first add");
        svc.add(account(), book()).await.expect("repeat add is not an error");
    }

    #[rstest]
    #[case(
        FavouriteRepositoryError::unknown_book(3_i64),
        ErrorCode::NotFound,
        "book not found"
    )]
    #[case(
        FavouriteRepositoryError::unknown_account(1_i64),
        ErrorCode::NotFound,
        "account not found"
    )]
    #[case(
        FavouriteRepositoryError::query("boom"),
        ErrorCode::InternalError,
        "favourite repository error: boom"
    )]
    #[case(
        FavouriteRepositoryError::connection("down"),
        ErrorCode::InternalError,
        "favourite repository unavailable: down"
    )]
    #[tokio::test]
    async fn add_maps_repository_failures(
        #[case] failure: FavouriteRepositoryError,
        #[case] expected: ErrorCode,
        #[case] message: &str,
    ) {
        let mut repo = MockFavouriteRepository::new();
        repo.expect_add().return_once(move |_, _| Err(failure));
        let svc = FavouritesServiceImpl::new(Arc::new(repo));

        let err = svc.add(account(), book()).await.expect_err("failure");

        assert_eq!(err.code(), expected);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn list_wraps_page_metadata() {
        let mut repo = MockFavouriteRepository::new();
        repo.expect_list()
            .with(eq(account()), eq(PageRequest::normalized(Some(1), Some(2))))
            .return_once(|_, _| {
                Ok(BookPage {
                    items: Vec::new(),
                    total: 5,
                })
            });
        let svc = FavouritesServiceImpl::new(Arc::new(repo));

        let page = svc
            .list(account(), PageRequest::normalized(Some(1), Some(2)))
            .await
            .expect("listing");

        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.total_pages, 3);
    }
}
