mod date;
mod id;
mod name;
mod status;

pub use self::{date::*, id::*, name::*, status::*};
use crate::entity::common::Version;
use crate::entity::{Book, BookId, Client, ClientEmail, ClientId};
use crate::policy::LendingPolicy;
use crate::{KernelError, Resource, Violation};
use destructure::{Destructure, Mutation};
use time::Date;
use vodca::References;

/// A lending transaction: the books one client borrows together.
///
/// Transitions validate everything before touching state, so a failed call
/// leaves the order and the books it was given untouched.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Order {
    id: OrderId,
    name: OrderName,
    status: OrderStatus,
    accepted_date: Option<AcceptedDate>,
    returned_date: Option<ReturnedDate>,
    books: Vec<BookId>,
    client_id: ClientId,
    version: Version<Order>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        name: OrderName,
        status: OrderStatus,
        accepted_date: Option<AcceptedDate>,
        returned_date: Option<ReturnedDate>,
        books: Vec<BookId>,
        client_id: ClientId,
        version: Version<Order>,
    ) -> Self {
        Self {
            id,
            name,
            status,
            accepted_date,
            returned_date,
            books,
            client_id,
            version,
        }
    }

    pub fn create(id: OrderId, name: OrderName, client_id: ClientId) -> Self {
        Self::new(
            id,
            name,
            OrderStatus::Created,
            None,
            None,
            Vec::new(),
            client_id,
            Version::initial(),
        )
    }

    /// The status `transition` would lead to, or the wrong-status violation.
    pub fn next_status(
        &self,
        transition: Transition,
    ) -> error_stack::Result<OrderStatus, KernelError> {
        self.status.next(transition).ok_or_else(|| {
            Violation::WrongOrderStatus {
                expected: transition.source(),
                actual: self.status,
            }
            .into_report()
        })
    }

    fn ensure_owner(
        &self,
        owner: &Client,
        caller: &ClientEmail,
    ) -> error_stack::Result<(), KernelError> {
        if owner.id() != &self.client_id {
            return Err(error_stack::Report::new(KernelError::Internal)
                .attach_printable(format!("Client {} does not own order {}", owner.id(), self.id)));
        }
        if !owner.is_identified_by(caller) {
            return Err(Violation::OwnerMismatch.into_report());
        }
        Ok(())
    }

    pub fn contains(&self, book_id: &BookId) -> bool {
        self.books.contains(book_id)
    }

    pub fn add_book(&mut self, book: &Book) -> error_stack::Result<(), KernelError> {
        self.next_status(Transition::EditBooks)?;
        if self.contains(book.id()) {
            return Err(Violation::BookAlreadyInOrder {
                book_id: book.id().clone(),
            }
            .into_report());
        }
        self.books.push(book.id().clone());
        Ok(())
    }

    pub fn remove_book(&mut self, book: &Book) -> error_stack::Result<(), KernelError> {
        self.next_status(Transition::EditBooks)?;
        if self.books.is_empty() {
            return Err(Violation::OrderIsEmpty.into_report());
        }
        let Some(position) = self.books.iter().position(|id| id == book.id()) else {
            return Err(Violation::BookNotInOrder {
                book_id: book.id().clone(),
            }
            .into_report());
        };
        self.books.remove(position);
        Ok(())
    }

    pub fn reserve(
        &mut self,
        owner: &Client,
        caller: &ClientEmail,
    ) -> error_stack::Result<(), KernelError> {
        let next = self.next_status(Transition::Reserve)?;
        self.ensure_owner(owner, caller)?;
        if owner.is_locked() {
            return Err(Violation::AccountLocked.into_report());
        }
        self.status = next;
        Ok(())
    }

    /// Hands the books over: every book must have a copy left, otherwise
    /// nothing changes and all exhausted book ids are reported at once.
    pub fn accept(
        &mut self,
        books: &mut [Book],
        today: Date,
    ) -> error_stack::Result<(), KernelError> {
        let next = self.next_status(Transition::Accept)?;
        let indexes = self.locate(books)?;

        let exhausted = indexes
            .iter()
            .map(|&index| &books[index])
            .filter(|book| book.copies().is_exhausted())
            .map(|book| book.id().clone())
            .collect::<Vec<_>>();
        if !exhausted.is_empty() {
            return Err(Violation::InsufficientCopies {
                book_ids: exhausted,
            }
            .into_report());
        }

        indexes.into_iter().for_each(|index| books[index].take_copy());
        self.accepted_date = Some(AcceptedDate::new(today));
        self.status = next;
        Ok(())
    }

    pub fn reject(&mut self) -> error_stack::Result<(), KernelError> {
        self.status = self.next_status(Transition::Reject)?;
        Ok(())
    }

    /// Takes the books back and settles on `RETURNED` or `OVERDUE`.
    pub fn give_back(
        &mut self,
        owner: &Client,
        caller: &ClientEmail,
        books: &mut [Book],
        today: Date,
        policy: &LendingPolicy,
    ) -> error_stack::Result<OrderStatus, KernelError> {
        self.next_status(Transition::Return { overdue: false })?;
        self.ensure_owner(owner, caller)?;
        let accepted = self.accepted_date.ok_or_else(|| {
            error_stack::Report::new(KernelError::Internal)
                .attach_printable(format!("Accepted order {} has no accepted date", self.id))
        })?;
        let indexes = self.locate(books)?;

        let returned = ReturnedDate::new(today);
        let overdue = policy.is_overdue(&accepted, &returned);
        let next = self.next_status(Transition::Return { overdue })?;

        indexes.into_iter().for_each(|index| books[index].put_copy());
        self.returned_date = Some(returned);
        self.status = next;
        Ok(next)
    }

    // Position of each of this order's books inside `books`, in order.
    fn locate(&self, books: &[Book]) -> error_stack::Result<Vec<usize>, KernelError> {
        self.books
            .iter()
            .map(|id| {
                books
                    .iter()
                    .position(|book| book.id() == id)
                    .ok_or_else(|| {
                        Resource::Book
                            .into_report()
                            .attach_printable(format!("Book {id} of order {}", self.id))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;
    use uuid::Uuid;

    use crate::entity::{
        Book, BookAuthor, BookId, BookTitle, Client, ClientEmail, ClientId, ClientName,
        ClientNonLocked, CopiesNumber, Order, OrderId, OrderName, OrderStatus, Version,
    };
    use crate::policy::LendingPolicy;
    use crate::{KernelError, Violation};

    fn client(email: &str) -> Client {
        Client::new(
            ClientId::new(Uuid::new_v4()),
            ClientName::new("reader"),
            ClientEmail::new(email),
            ClientNonLocked::default(),
            Version::initial(),
        )
    }

    fn book(copies: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            CopiesNumber::new(copies),
            Version::initial(),
        )
    }

    fn order_of(owner: &Client, books: &[Book]) -> Order {
        let mut order = Order::create(
            OrderId::new(Uuid::new_v4()),
            OrderName::new("weekend"),
            owner.id().clone(),
        );
        for book in books {
            order.add_book(book).unwrap();
        }
        order
    }

    fn violation(report: &error_stack::Report<KernelError>) -> Option<&Violation> {
        report.downcast_ref::<Violation>()
    }

    #[test]
    fn books_are_editable_only_while_created() {
        let owner = client("a@example.com");
        let first = book(1);
        let mut order = order_of(&owner, &[first.clone()]);

        let duplicate = order.add_book(&first).unwrap_err();
        assert_eq!(duplicate.current_context(), &KernelError::InvalidRequest);
        assert!(matches!(
            violation(&duplicate),
            Some(Violation::BookAlreadyInOrder { .. })
        ));

        let stranger = book(1);
        let absent = order.remove_book(&stranger).unwrap_err();
        assert!(matches!(
            violation(&absent),
            Some(Violation::BookNotInOrder { .. })
        ));

        order.remove_book(&first).unwrap();
        let empty = order.remove_book(&first).unwrap_err();
        assert_eq!(violation(&empty), Some(&Violation::OrderIsEmpty));

        order.add_book(&first).unwrap();
        order
            .reserve(&owner, &ClientEmail::new("a@example.com"))
            .unwrap();
        let late = order.add_book(&stranger).unwrap_err();
        assert_eq!(
            violation(&late),
            Some(&Violation::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: OrderStatus::Reserved,
            })
        );
        assert_eq!(order.books(), &vec![first.id().clone()]);
    }

    #[test]
    fn reserve_checks_owner() {
        let owner = client("owner@example.com");
        let mut order = order_of(&owner, &[]);

        let report = order
            .reserve(&owner, &ClientEmail::new("thief@example.com"))
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);
        assert_eq!(violation(&report), Some(&Violation::OwnerMismatch));
        assert_eq!(order.status(), &OrderStatus::Created);

        order
            .reserve(&owner, &ClientEmail::new("owner@example.com"))
            .unwrap();
        assert_eq!(order.status(), &OrderStatus::Reserved);

        let twice = order
            .reserve(&owner, &ClientEmail::new("owner@example.com"))
            .unwrap_err();
        assert_eq!(twice.current_context(), &KernelError::InvalidRequest);
    }

    #[test]
    fn locked_owner_cannot_reserve() {
        let mut owner = client("owner@example.com");
        owner.lock();
        let mut order = order_of(&owner, &[]);
        let report = order
            .reserve(&owner, &ClientEmail::new("owner@example.com"))
            .unwrap_err();
        assert_eq!(violation(&report), Some(&Violation::AccountLocked));
    }

    #[test]
    fn accept_is_all_or_nothing() {
        let owner = client("owner@example.com");
        let mut books = vec![book(0), book(2)];
        let mut order = order_of(&owner, &books);
        order
            .reserve(&owner, &ClientEmail::new("owner@example.com"))
            .unwrap();

        let report = order.accept(&mut books, date!(2024 - 04 - 01)).unwrap_err();
        assert_eq!(
            violation(&report),
            Some(&Violation::InsufficientCopies {
                book_ids: vec![books[0].id().clone()],
            })
        );
        assert_eq!(books[0].copies(), &CopiesNumber::new(0));
        assert_eq!(books[1].copies(), &CopiesNumber::new(2));
        assert_eq!(order.status(), &OrderStatus::Reserved);
        assert_eq!(order.accepted_date(), &None);
    }

    #[test]
    fn accept_then_late_return() {
        let owner = client("owner@example.com");
        let email = ClientEmail::new("owner@example.com");
        let mut books = vec![book(1)];
        let mut order = order_of(&owner, &books);
        order.reserve(&owner, &email).unwrap();

        order.accept(&mut books, date!(2024 - 04 - 01)).unwrap();
        assert_eq!(order.status(), &OrderStatus::Accepted);
        assert_eq!(books[0].copies(), &CopiesNumber::new(0));
        assert!(order.accept(&mut books, date!(2024 - 04 - 01)).is_err());

        let status = order
            .give_back(
                &owner,
                &email,
                &mut books,
                date!(2024 - 04 - 22),
                &LendingPolicy::default(),
            )
            .unwrap();
        assert_eq!(status, OrderStatus::Overdue);
        assert_eq!(books[0].copies(), &CopiesNumber::new(1));
        assert!(order.returned_date().is_some());
    }

    #[test]
    fn return_on_day_twenty_is_on_time() {
        let owner = client("owner@example.com");
        let email = ClientEmail::new("owner@example.com");
        let mut books = vec![book(3), book(1)];
        let mut order = order_of(&owner, &books);
        order.reserve(&owner, &email).unwrap();
        order.accept(&mut books, date!(2024 - 04 - 01)).unwrap();

        let status = order
            .give_back(
                &owner,
                &email,
                &mut books,
                date!(2024 - 04 - 21),
                &LendingPolicy::default(),
            )
            .unwrap();
        assert_eq!(status, OrderStatus::Returned);
        assert_eq!(books[0].copies(), &CopiesNumber::new(3));
        assert_eq!(books[1].copies(), &CopiesNumber::new(1));
    }

    #[test]
    fn return_by_someone_else_changes_nothing() {
        let owner = client("x@example.com");
        let mut books = vec![book(1)];
        let mut order = order_of(&owner, &books);
        order
            .reserve(&owner, &ClientEmail::new("x@example.com"))
            .unwrap();
        order.accept(&mut books, date!(2024 - 04 - 01)).unwrap();
        let before = order.clone();

        let report = order
            .give_back(
                &owner,
                &ClientEmail::new("y@example.com"),
                &mut books,
                date!(2024 - 04 - 02),
                &LendingPolicy::default(),
            )
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);
        assert_eq!(order, before);
        assert_eq!(books[0].copies(), &CopiesNumber::new(0));
    }

    #[test]
    fn reject_leaves_inventory_alone() {
        let owner = client("owner@example.com");
        let mut order = order_of(&owner, &[book(1)]);
        assert!(order.reject().is_err());
        order
            .reserve(&owner, &ClientEmail::new("owner@example.com"))
            .unwrap();
        order.reject().unwrap();
        assert_eq!(order.status(), &OrderStatus::Rejected);
        assert!(order.reject().is_err());
    }
}
