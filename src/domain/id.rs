//! Ticket identifiers
//!
//! A ticket ID is an integer in `[1, 36^5]`, printed on the physical ticket
//! as an uppercase base-36 code of at most five characters (six for the
//! single value `36^5` itself, rendered `100000`).
//!
//! Zero is reserved as the invalid ID and never names a stored entry.

use std::fmt;
use std::str::FromStr;

use super::base36;
use super::error::TableError;

/// Smallest valid ticket ID value
pub const TICKET_ID_MIN: u64 = 1;

/// Largest valid ticket ID value: five base-36 characters worth of codes
pub const TICKET_ID_MAX: u64 = 36 * 36 * 36 * 36 * 36;

/// Primary key of a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketId(u64);

impl TicketId {
    /// The reserved invalid ID
    pub const INVALID: TicketId = TicketId(0);

    /// Creates a ticket ID, rejecting values outside `[1, 36^5]`
    pub fn new(value: u64) -> Result<Self, TableError> {
        if !(TICKET_ID_MIN..=TICKET_ID_MAX).contains(&value) {
            return Err(TableError::IdInvalid);
        }
        Ok(Self(value))
    }

    /// Returns the raw integer value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true unless this is the reserved invalid ID
    pub fn is_valid(&self) -> bool {
        (TICKET_ID_MIN..=TICKET_ID_MAX).contains(&self.0)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base36::encode(self.0))
    }
}

impl FromStr for TicketId {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = base36::decode(s.trim())?;
        Self::new(value)
    }
}

/// A freshly generated ticket ID paired with the table generation it was
/// drawn at
///
/// It can be used for exactly one insertion, and only if nothing else
/// mutated the table in between (including generating another ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedTicketId {
    id: TicketId,
    generation: u64,
}

impl GeneratedTicketId {
    pub(crate) fn new(id: TicketId, generation: u64) -> Self {
        Self { id, generation }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_rejects_out_of_range() {
        assert!(matches!(TicketId::new(0), Err(TableError::IdInvalid)));
        assert!(matches!(TicketId::new(TICKET_ID_MAX + 1), Err(TableError::IdInvalid)));
        assert!(TicketId::new(TICKET_ID_MIN).is_ok());
        assert!(TicketId::new(TICKET_ID_MAX).is_ok());
    }

    #[test]
    fn invalid_id_is_not_valid() {
        assert!(!TicketId::INVALID.is_valid());
        assert!(TicketId::new(42).unwrap().is_valid());
    }

    #[test]
    fn ticket_id_displays_as_base36() {
        let id = TicketId::new(36 * 36 + 10).unwrap();
        assert_eq!(id.to_string(), "11A");
    }

    #[test]
    fn ticket_id_parses_lowercase_and_trims() {
        let id: TicketId = " 11a ".parse().unwrap();
        assert_eq!(id.value(), 36 * 36 + 10);
    }

    #[test]
    fn ticket_id_parse_errors() {
        assert!(matches!("0".parse::<TicketId>(), Err(TableError::IdInvalid)));
        assert!(matches!("100001".parse::<TicketId>(), Err(TableError::IdInvalid)));
        assert!(matches!("AB_C".parse::<TicketId>(), Err(TableError::InvalidParameter(_))));
        assert!(matches!(
            "ZZZZZZZZZZZZZZ".parse::<TicketId>(),
            Err(TableError::IntegerOverflow)
        ));
    }

    #[test]
    fn ticket_ids_order_numerically() {
        // "Z" sorts after "10" as text but is the smaller ID
        let z: TicketId = "Z".parse().unwrap();
        let ten: TicketId = "10".parse().unwrap();
        assert!(z < ten);
    }
}
