//! Create, update, delete operations
//!
//! Operations are the value objects handed to the
//! [`MutationGateway`](super::MutationGateway): one operation, one network
//! call, one outcome. Reads go through [`ListQuery`](super::ListQuery)
//! instead.

use uuid::Uuid;

use crate::model::Entity;
use crate::model::Record;

/// A single remote write against one collection.
///
/// # Example
///
/// ```
/// use praxis_lib::api::Operation;
/// use praxis_lib::model::{Entity, Record};
///
/// let op = Operation::create(Entity::Clinics, Record::new("clinic").set("name", "Blue Clinic"));
/// assert_eq!(op.entity(), Entity::Clinics);
/// ```
#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a new record.
    Create {
        entity: Entity,
        record: Record,
    },

    /// Update an existing record.
    Update {
        entity: Entity,
        id: Uuid,
        record: Record,
    },

    /// Delete a record.
    Delete {
        entity: Entity,
        id: Uuid,
    },

    /// Delete several records in one backend call.
    ///
    /// Atomicity is the backend's: the gateway never retries a partial
    /// failure item-by-item.
    BulkDelete {
        entity: Entity,
        ids: Vec<Uuid>,
    },
}

impl Operation {
    /// Creates a new Create operation.
    pub fn create(entity: Entity, record: Record) -> Self {
        Operation::Create { entity, record }
    }

    /// Creates a new Update operation.
    pub fn update(entity: Entity, id: Uuid, record: Record) -> Self {
        Operation::Update { entity, id, record }
    }

    /// Creates a new Delete operation.
    pub fn delete(entity: Entity, id: Uuid) -> Self {
        Operation::Delete { entity, id }
    }

    /// Creates a new BulkDelete operation.
    pub fn bulk_delete(entity: Entity, ids: Vec<Uuid>) -> Self {
        Operation::BulkDelete { entity, ids }
    }

    /// Returns the collection this operation targets.
    pub fn entity(&self) -> Entity {
        match self {
            Operation::Create { entity, .. }
            | Operation::Update { entity, .. }
            | Operation::Delete { entity, .. }
            | Operation::BulkDelete { entity, .. } => *entity,
        }
    }

    /// Short description for logging and status lines.
    pub fn describe(&self) -> String {
        match self {
            Operation::Create { entity, .. } => format!("create {}", entity.logical_name()),
            Operation::Update { entity, id, .. } => {
                format!("update {} {id}", entity.logical_name())
            }
            Operation::Delete { entity, id } => format!("delete {} {id}", entity.logical_name()),
            Operation::BulkDelete { entity, ids } => {
                format!("bulk delete {} {}(s)", ids.len(), entity.logical_name())
            }
        }
    }
}

/// The resolved result of a successful operation.
#[derive(Debug, Clone)]
pub enum MutationOutcome {
    /// The created record, as returned by the server.
    Created(Record),
    /// The updated record, as returned by the server.
    Updated(Record),
    /// The deleted record's identity.
    Deleted {
        entity: Entity,
        id: Uuid,
    },
    /// The identities removed by a bulk delete.
    BulkDeleted {
        entity: Entity,
        ids: Vec<Uuid>,
    },
}

impl MutationOutcome {
    /// Returns the server-returned record for create/update outcomes.
    pub fn record(&self) -> Option<&Record> {
        match self {
            MutationOutcome::Created(record) | MutationOutcome::Updated(record) => Some(record),
            _ => None,
        }
    }

    /// Consumes self and returns the record, if the outcome carried one.
    pub fn into_record(self) -> Option<Record> {
        match self {
            MutationOutcome::Created(record) | MutationOutcome::Updated(record) => Some(record),
            _ => None,
        }
    }

    /// Returns `true` if a new record was created.
    pub fn is_created(&self) -> bool {
        matches!(self, MutationOutcome::Created(_))
    }
}
