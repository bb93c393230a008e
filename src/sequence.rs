use std::cell::Cell;

/// Handed out when a list request is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Keeps only the latest of overlapping list requests: a response may be
/// rendered only if no request was issued after it.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: Cell<u64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        RequestSequence::default()
    }

    pub fn next(&self) -> Ticket {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        Ticket(ticket)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.get() == ticket.0
    }
}
