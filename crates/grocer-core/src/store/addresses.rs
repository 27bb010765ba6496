//! # Address Slice
//!
//! The address book. Addresses are soft-deleted: `Deactivated` clears the
//! active flag and the record stays, because past orders may point at it.

use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::types::Address;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressState {
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddressAction {
    Loaded(Vec<Address>),
    Added(Address),
    Updated(Address),
    Deactivated { id: String },
}

impl Reducer for AddressState {
    type Action = AddressAction;

    fn reduce(mut self, action: AddressAction) -> Self {
        match action {
            AddressAction::Loaded(addresses) => self.addresses = addresses,
            AddressAction::Added(address) | AddressAction::Updated(address) => {
                match self.addresses.iter_mut().find(|a| a.id == address.id) {
                    Some(existing) => *existing = address,
                    None => self.addresses.push(address),
                }
            }
            AddressAction::Deactivated { id } => {
                if let Some(address) = self.addresses.iter_mut().find(|a| a.id == id) {
                    address.active = false;
                }
            }
        }
        self
    }
}

impl AddressState {
    /// Addresses offered at checkout and in the address book.
    pub fn active(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter().filter(|a| a.active)
    }

    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::address;

    #[test]
    fn test_deactivate_keeps_record() {
        let state = AddressState::default()
            .reduce(AddressAction::Loaded(vec![address("a1"), address("a2")]))
            .reduce(AddressAction::Deactivated { id: "a1".into() });

        assert_eq!(state.addresses.len(), 2);
        assert!(!state.get("a1").map(|a| a.active).unwrap_or(true));
        let active: Vec<_> = state.active().map(|a| a.id.as_str()).collect();
        assert_eq!(active, vec!["a2"]);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let mut changed = address("a1");
        changed.city = "Mumbai".into();
        let state = AddressState::default()
            .reduce(AddressAction::Added(address("a1")))
            .reduce(AddressAction::Updated(changed));

        assert_eq!(state.addresses.len(), 1);
        assert_eq!(state.addresses[0].city, "Mumbai");
    }
}
