//! Call context passed to every mutating registry operation

use lib_types::{Address, Amount, Timestamp};

/// Who is calling, what value they attached, and when
///
/// `value` is already in the custody account when the call starts. If the
/// operation fails the environment returns it to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: Amount,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self {
            caller,
            value: 0,
            now,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}
