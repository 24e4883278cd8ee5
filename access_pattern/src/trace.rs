//! Typed state-manager trace records.
//!
//! Every record describes one operation on either the world-state trie (the
//! leaf of an account) or the storage trie of that account (one slot). The
//! access-pattern grammar only ever looks at the [`TraceKind`] of a record,
//! the payload is carried along for the layers that check it against the
//! arithmetization.

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Which trie a [`Trace`] operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Scope {
    /// The leaf of the account in the world-state trie.
    #[strum(serialize = "WS")]
    WorldState,
    /// A slot in the storage trie of the account.
    #[strum(serialize = "ST")]
    Storage,
}

/// The operation a [`Trace`] records, irrespective of its [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Op {
    /// Read of a key that is absent from the trie.
    ReadZero,
    /// Read of a key that is present in the trie.
    ReadNonZero,
    /// Insertion of a previously absent key.
    Insertion,
    /// Overwrite of a present key.
    Update,
    /// Removal of a present key.
    Deletion,
}

/// The kind x scope tag of a [`Trace`].
///
/// This is what the access-pattern grammar is written against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum TraceKind {
    ReadZeroWS,
    ReadNonZeroWS,
    InsertionWS,
    UpdateWS,
    DeletionWS,
    ReadZeroST,
    ReadNonZeroST,
    InsertionST,
    UpdateST,
    DeletionST,
}

impl TraceKind {
    /// Inverse of [`Self::op`] and [`Self::scope`].
    pub const fn new(op: Op, scope: Scope) -> Self {
        match (op, scope) {
            (Op::ReadZero, Scope::WorldState) => Self::ReadZeroWS,
            (Op::ReadNonZero, Scope::WorldState) => Self::ReadNonZeroWS,
            (Op::Insertion, Scope::WorldState) => Self::InsertionWS,
            (Op::Update, Scope::WorldState) => Self::UpdateWS,
            (Op::Deletion, Scope::WorldState) => Self::DeletionWS,
            (Op::ReadZero, Scope::Storage) => Self::ReadZeroST,
            (Op::ReadNonZero, Scope::Storage) => Self::ReadNonZeroST,
            (Op::Insertion, Scope::Storage) => Self::InsertionST,
            (Op::Update, Scope::Storage) => Self::UpdateST,
            (Op::Deletion, Scope::Storage) => Self::DeletionST,
        }
    }

    pub const fn op(self) -> Op {
        match self {
            Self::ReadZeroWS | Self::ReadZeroST => Op::ReadZero,
            Self::ReadNonZeroWS | Self::ReadNonZeroST => Op::ReadNonZero,
            Self::InsertionWS | Self::InsertionST => Op::Insertion,
            Self::UpdateWS | Self::UpdateST => Op::Update,
            Self::DeletionWS | Self::DeletionST => Op::Deletion,
        }
    }

    pub const fn scope(self) -> Scope {
        match self {
            Self::ReadZeroWS
            | Self::ReadNonZeroWS
            | Self::InsertionWS
            | Self::UpdateWS
            | Self::DeletionWS => Scope::WorldState,
            Self::ReadZeroST
            | Self::ReadNonZeroST
            | Self::InsertionST
            | Self::UpdateST
            | Self::DeletionST => Scope::Storage,
        }
    }

    pub const fn is_world_state(self) -> bool {
        matches!(self.scope(), Scope::WorldState)
    }
}

/// The world-state leaf of an account, as reported by the state manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Account {
    pub nonce: U256,
    pub balance: U256,
    pub storage_root: H256,
    pub code_hash: H256,
    pub code_size: u64,
}

/// One trie operation.
///
/// World-state variants are keyed by the account [`Address`], storage variants
/// by the slot key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Trace {
    ReadZeroWS {
        key: Address,
    },
    ReadNonZeroWS {
        key: Address,
        value: Account,
    },
    InsertionWS {
        key: Address,
        value: Account,
    },
    UpdateWS {
        key: Address,
        prior: Account,
        next: Account,
    },
    DeletionWS {
        key: Address,
        prior: Account,
    },
    ReadZeroST {
        key: H256,
    },
    ReadNonZeroST {
        key: H256,
        value: H256,
    },
    InsertionST {
        key: H256,
        value: H256,
    },
    UpdateST {
        key: H256,
        prior: H256,
        next: H256,
    },
    DeletionST {
        key: H256,
        prior: H256,
    },
}

impl Trace {
    pub const fn kind(&self) -> TraceKind {
        match self {
            Self::ReadZeroWS { .. } => TraceKind::ReadZeroWS,
            Self::ReadNonZeroWS { .. } => TraceKind::ReadNonZeroWS,
            Self::InsertionWS { .. } => TraceKind::InsertionWS,
            Self::UpdateWS { .. } => TraceKind::UpdateWS,
            Self::DeletionWS { .. } => TraceKind::DeletionWS,
            Self::ReadZeroST { .. } => TraceKind::ReadZeroST,
            Self::ReadNonZeroST { .. } => TraceKind::ReadNonZeroST,
            Self::InsertionST { .. } => TraceKind::InsertionST,
            Self::UpdateST { .. } => TraceKind::UpdateST,
            Self::DeletionST { .. } => TraceKind::DeletionST,
        }
    }

    pub const fn is_world_state(&self) -> bool {
        self.kind().is_world_state()
    }
}

/// A [`Trace`] together with the account whose segment it belongs to.
///
/// For storage traces, `account` is the owner of the storage trie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedTrace {
    pub account: Address,
    pub trace: Trace,
}

impl DecodedTrace {
    pub const fn kind(&self) -> TraceKind {
        self.trace.kind()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn kind_round_trips_through_op_and_scope() {
        for kind in TraceKind::iter() {
            assert_eq!(TraceKind::new(kind.op(), kind.scope()), kind);
        }
    }

    #[test]
    fn display_names_scope() {
        assert_eq!(TraceKind::ReadZeroWS.to_string(), "ReadZeroWS");
        assert_eq!(TraceKind::InsertionST.to_string(), "InsertionST");
        assert_eq!(Scope::WorldState.to_string(), "WS");
        assert_eq!(
            format!("{}{}", Op::Update, Scope::Storage),
            TraceKind::UpdateST.to_string()
        );
    }

    #[test]
    fn world_state_predicate() {
        let world_state = TraceKind::iter()
            .filter(|it| it.is_world_state())
            .collect::<Vec<_>>();
        assert_eq!(
            world_state,
            [
                TraceKind::ReadZeroWS,
                TraceKind::ReadNonZeroWS,
                TraceKind::InsertionWS,
                TraceKind::UpdateWS,
                TraceKind::DeletionWS,
            ]
        );
    }

    #[test]
    fn deserialize_tagged_trace() {
        let trace = serde_json::from_str::<DecodedTrace>(
            r#"{
                "account": "0x00000000000000000000000000000000000000aa",
                "trace": {
                    "type": "ReadNonZeroST",
                    "key": "0x0000000000000000000000000000000000000000000000000000000000000001",
                    "value": "0x0000000000000000000000000000000000000000000000000000000000000002"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(trace.kind(), TraceKind::ReadNonZeroST);
        assert_eq!(trace.account, Address::from_low_u64_be(0xaa));
        assert!(!trace.trace.is_world_state());
    }
}
