//! Where submitted records go. A rejected record leaves the collection
//! untouched and the caller reports the reason instead of the success
//! message.

use crate::model::{Client, ClientDirectory, Task, TaskList};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("{0}")]
    Rejected(String),
}

pub trait RecordSink<E> {
    fn commit(&mut self, record: E) -> Result<(), SinkError>;
}

/// Record ids are unique within a collection.
impl RecordSink<Client> for ClientDirectory {
    fn commit(&mut self, record: Client) -> Result<(), SinkError> {
        if self.get(&record.id).is_some() {
            return Err(SinkError::Rejected(format!(
                "client id {} is already in use",
                record.id
            )));
        }
        self.push(record);
        Ok(())
    }
}

impl RecordSink<Task> for TaskList {
    fn commit(&mut self, record: Task) -> Result<(), SinkError> {
        if self.all().iter().any(|t| t.id == record.id) {
            return Err(SinkError::Rejected(format!(
                "task id {} is already in use",
                record.id
            )));
        }
        self.add(record);
        Ok(())
    }
}
