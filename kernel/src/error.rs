use std::fmt::Display;

use error_stack::{Context, Report};
use serde::Serialize;

use crate::entity::{BookId, OrderStatus};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound,
    InvalidRequest,
    Forbidden,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Requested resource not found"),
            KernelError::InvalidRequest => write!(f, "Request violates a lending rule"),
            KernelError::Forbidden => write!(f, "Caller is not allowed to do this"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// Which entity a `NotFound` report refers to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Order,
    Book,
    Client,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Order => write!(f, "Order not found"),
            Resource::Book => write!(f, "Book not found"),
            Resource::Client => write!(f, "Client not found"),
        }
    }
}

/// The rule an `InvalidRequest` or `Forbidden` report broke.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    WrongOrderStatus {
        expected: OrderStatus,
        actual: OrderStatus,
    },
    BookAlreadyInOrder {
        book_id: BookId,
    },
    OrderIsEmpty,
    BookNotInOrder {
        book_id: BookId,
    },
    OwnerMismatch,
    InsufficientCopies {
        book_ids: Vec<BookId>,
    },
    AccountLocked,
    EmailAlreadyRegistered,
    NegativeCopies,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::WrongOrderStatus { expected, actual } => {
                write!(f, "Wrong order status: expected {expected}, found {actual}")
            }
            Violation::BookAlreadyInOrder { .. } => write!(f, "Book is already in this order"),
            Violation::OrderIsEmpty => write!(f, "Order is already empty"),
            Violation::BookNotInOrder { .. } => {
                write!(f, "The book is not available in the current order")
            }
            Violation::OwnerMismatch => write!(f, "Mismatch between client and order owner"),
            Violation::InsufficientCopies { book_ids } => {
                write!(f, "{} book(s) have not enough copies", book_ids.len())
            }
            Violation::AccountLocked => write!(f, "Client account is locked"),
            Violation::EmailAlreadyRegistered => {
                write!(f, "A client with this email is already registered")
            }
            Violation::NegativeCopies => write!(f, "Copies number must not be negative"),
        }
    }
}

impl Violation {
    pub fn context(&self) -> KernelError {
        match self {
            Violation::OwnerMismatch | Violation::AccountLocked => KernelError::Forbidden,
            _ => KernelError::InvalidRequest,
        }
    }

    pub fn into_report(self) -> Report<KernelError> {
        Report::new(self.context()).attach_printable(self)
    }
}

impl Resource {
    pub fn into_report(self) -> Report<KernelError> {
        Report::new(KernelError::NotFound).attach_printable(self)
    }
}
