//! Operation classification.
//!
//! Every data-layer operation the cache understands belongs to exactly one
//! [`OperationKind`], which selects the caching policy applied to it. The
//! table is fixed at compile time; names outside it are never cached.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use phf::phf_map;
use std::fmt;

/// Caching policy category of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Read,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }

    /// Whether the underlying query mutates data.
    pub fn is_write(&self) -> bool {
        !matches!(self, OperationKind::Read)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cacheable data-layer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindUnique,
    FindUniqueOrThrow,
    FindFirst,
    FindFirstOrThrow,
    FindMany,
    Count,
    GroupBy,
    Aggregate,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Upsert,
    Delete,
    DeleteMany,
}

/// Operation name → operation, as spelled by the host data layer
static OPERATIONS: phf::Map<&'static str, Operation> = phf_map! {
    "findUnique" => Operation::FindUnique,
    "findUniqueOrThrow" => Operation::FindUniqueOrThrow,
    "findFirst" => Operation::FindFirst,
    "findFirstOrThrow" => Operation::FindFirstOrThrow,
    "findMany" => Operation::FindMany,
    "count" => Operation::Count,
    "groupBy" => Operation::GroupBy,
    "aggregate" => Operation::Aggregate,
    "create" => Operation::Create,
    "createMany" => Operation::CreateMany,
    "update" => Operation::Update,
    "updateMany" => Operation::UpdateMany,
    "upsert" => Operation::Upsert,
    "delete" => Operation::Delete,
    "deleteMany" => Operation::DeleteMany,
};

impl Operation {
    /// Look up an operation by its data-layer name.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS.get(name).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FindUnique => "findUnique",
            Operation::FindUniqueOrThrow => "findUniqueOrThrow",
            Operation::FindFirst => "findFirst",
            Operation::FindFirstOrThrow => "findFirstOrThrow",
            Operation::FindMany => "findMany",
            Operation::Count => "count",
            Operation::GroupBy => "groupBy",
            Operation::Aggregate => "aggregate",
            Operation::Create => "create",
            Operation::CreateMany => "createMany",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::Upsert => "upsert",
            Operation::Delete => "delete",
            Operation::DeleteMany => "deleteMany",
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::FindUnique
            | Operation::FindUniqueOrThrow
            | Operation::FindFirst
            | Operation::FindFirstOrThrow
            | Operation::FindMany
            | Operation::Count
            | Operation::GroupBy
            | Operation::Aggregate => OperationKind::Read,
            Operation::Create | Operation::CreateMany => OperationKind::Create,
            Operation::Update | Operation::UpdateMany | Operation::Upsert => OperationKind::Update,
            Operation::Delete | Operation::DeleteMany => OperationKind::Delete,
        }
    }

    /// All cacheable operations.
    pub fn all() -> impl Iterator<Item = Operation> {
        OPERATIONS.values().copied()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an operation name. `None` means the operation is not subject to
/// caching and must be passed through.
pub fn classify(name: &str) -> Option<OperationKind> {
    Operation::from_name(name).map(|op| op.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        for name in [
            "findUnique",
            "findUniqueOrThrow",
            "findFirst",
            "findFirstOrThrow",
            "findMany",
            "count",
            "groupBy",
            "aggregate",
        ] {
            assert_eq!(classify(name), Some(OperationKind::Read), "{}", name);
        }

        assert_eq!(classify("create"), Some(OperationKind::Create));
        assert_eq!(classify("createMany"), Some(OperationKind::Create));
        assert_eq!(classify("update"), Some(OperationKind::Update));
        assert_eq!(classify("updateMany"), Some(OperationKind::Update));
        assert_eq!(classify("upsert"), Some(OperationKind::Update));
        assert_eq!(classify("delete"), Some(OperationKind::Delete));
        assert_eq!(classify("deleteMany"), Some(OperationKind::Delete));
    }

    #[test]
    fn test_unknown_operations_are_unclassified() {
        assert_eq!(classify("executeRaw"), None);
        assert_eq!(classify("findRaw"), None);
        assert_eq!(classify(""), None);
        // Names are case sensitive
        assert_eq!(classify("FindUnique"), None);
    }

    #[test]
    fn test_names_round_trip() {
        assert_eq!(Operation::all().count(), 15);
        for op in Operation::all() {
            assert_eq!(Operation::from_name(op.as_str()), Some(op));
        }
    }
}
