use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, Version};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;
use crate::error::stale;

pub struct MemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for MemoryBookRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.books.iter().find(|book| book.id() == id).cloned())
    }

    async fn find_by_ids(
        &self,
        con: &mut MemoryTransaction,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con
            .staged
            .books
            .iter()
            .filter(|book| ids.contains(book.id()))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for MemoryBookRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.books.iter().any(|stored| stored.id() == book.id()) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Book {} already exists", book.id())));
        }
        con.staged.books.push(book.clone());
        Ok(())
    }

    async fn update_copies(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<Version<Book>, KernelError> {
        let stored = con
            .staged
            .books
            .iter_mut()
            .find(|stored| stored.id() == book.id() && stored.version() == book.version())
            .ok_or_else(|| stale("Book", book.id()))?;
        let next = book.version().next();
        stored.substitute(|stored| {
            *stored.copies = *book.copies();
            *stored.version = next.clone();
        });
        Ok(next)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{Book, BookAuthor, BookId, BookTitle, CopiesNumber, Version};
    use kernel::KernelError;

    use crate::database::{MemoryBookRepository, MemoryDatabase};

    #[tokio::test]
    async fn update_copies_is_version_checked() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;
        let id = BookId::new(uuid::Uuid::new_v4());
        let mut book = Book::new(
            id.clone(),
            BookTitle::new("Roadside Picnic"),
            BookAuthor::new("Strugatsky"),
            CopiesNumber::new(2),
            Version::initial(),
        );
        MemoryBookRepository.create(&mut con, &book).await?;

        book.substitute(|b| *b.copies = CopiesNumber::new(1));
        let version = MemoryBookRepository.update_copies(&mut con, &book).await?;
        assert_eq!(version, Version::new(1));

        let found = MemoryBookRepository
            .find_by_ids(&mut con, &[id.clone(), BookId::new(uuid::Uuid::new_v4())])
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].copies(), &CopiesNumber::new(1));
        assert_eq!(found[0].version(), &Version::new(1));

        let stale = MemoryBookRepository.update_copies(&mut con, &book).await;
        assert_eq!(
            stale.map_err(|e| *e.current_context()),
            Err(KernelError::Concurrency)
        );
        Ok(())
    }
}
