use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Reserved,
    Accepted,
    Rejected,
    Returned,
    Overdue,
}

/// Something that can happen to an order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Transition {
    EditBooks,
    Reserve,
    Accept,
    Reject,
    Return { overdue: bool },
}

impl Transition {
    /// The only status this transition may start from.
    pub fn source(&self) -> OrderStatus {
        match self {
            Transition::EditBooks | Transition::Reserve => OrderStatus::Created,
            Transition::Accept | Transition::Reject => OrderStatus::Reserved,
            Transition::Return { .. } => OrderStatus::Accepted,
        }
    }
}

impl OrderStatus {
    pub fn next(&self, transition: Transition) -> Option<OrderStatus> {
        match (self, transition) {
            (OrderStatus::Created, Transition::EditBooks) => Some(OrderStatus::Created),
            (OrderStatus::Created, Transition::Reserve) => Some(OrderStatus::Reserved),
            (OrderStatus::Reserved, Transition::Accept) => Some(OrderStatus::Accepted),
            (OrderStatus::Reserved, Transition::Reject) => Some(OrderStatus::Rejected),
            (OrderStatus::Accepted, Transition::Return { overdue: false }) => {
                Some(OrderStatus::Returned)
            }
            (OrderStatus::Accepted, Transition::Return { overdue: true }) => {
                Some(OrderStatus::Overdue)
            }
            (
                OrderStatus::Created
                | OrderStatus::Reserved
                | OrderStatus::Accepted
                | OrderStatus::Rejected
                | OrderStatus::Returned
                | OrderStatus::Overdue,
                _,
            ) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Reserved => "RESERVED",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Returned => "RETURNED",
            OrderStatus::Overdue => "OVERDUE",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OrderStatus::Created),
            "RESERVED" => Ok(OrderStatus::Reserved),
            "ACCEPTED" => Ok(OrderStatus::Accepted),
            "REJECTED" => Ok(OrderStatus::Rejected),
            "RETURNED" => Ok(OrderStatus::Returned),
            "OVERDUE" => Ok(OrderStatus::Overdue),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown order status: {s}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{OrderStatus, Transition};

    const TRANSITIONS: [Transition; 6] = [
        Transition::EditBooks,
        Transition::Reserve,
        Transition::Accept,
        Transition::Reject,
        Transition::Return { overdue: false },
        Transition::Return { overdue: true },
    ];

    #[test]
    fn only_documented_edges_exist() {
        let all = [
            OrderStatus::Created,
            OrderStatus::Reserved,
            OrderStatus::Accepted,
            OrderStatus::Rejected,
            OrderStatus::Returned,
            OrderStatus::Overdue,
        ];
        for status in all {
            for transition in TRANSITIONS {
                let next = status.next(transition);
                assert_eq!(next.is_some(), status == transition.source());
            }
        }
    }

    #[test]
    fn terminal_states_have_no_way_out() {
        for status in [
            OrderStatus::Rejected,
            OrderStatus::Returned,
            OrderStatus::Overdue,
        ] {
            for transition in TRANSITIONS {
                assert!(status.next(transition).is_none());
            }
        }
        assert!(OrderStatus::Accepted
            .next(Transition::Return { overdue: false })
            .is_some());
        assert_eq!(
            OrderStatus::Rejected.next(Transition::Accept),
            None,
            "a rejected order cannot be revived"
        );
    }

    #[test]
    fn parses_what_it_prints() {
        let status: OrderStatus = OrderStatus::Overdue.as_str().parse().unwrap();
        assert_eq!(status, OrderStatus::Overdue);
        assert!("LOST".parse::<OrderStatus>().is_err());
    }
}
