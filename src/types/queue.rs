//! Task lists and the queue descriptors the supervisor runs workers for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named SWF task list.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::TaskList;
///
/// let list = TaskList::new("orders");
/// assert_eq!(serde_json::to_string(&list).unwrap(), r#"{"name":"orders"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskList {
    /// Task list name.
    pub name: String,
}

impl TaskList {
    /// Creates a task list with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which poll operation a queue is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueueKind {
    /// Served by `PollForActivityTask`.
    Activity,
    /// Served by `PollForDecisionTask`.
    Decision,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity => write!(f, "activity"),
            Self::Decision => write!(f, "decision"),
        }
    }
}

/// A task list bound to the poll operation that serves it.
///
/// Identity is the `(kind, task list)` pair: the same name configured as
/// both an activity and a decision list yields two distinct descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueDescriptor {
    /// Poll operation serving this queue.
    pub kind: QueueKind,
    /// The task list polled.
    pub task_list: TaskList,
}

impl QueueDescriptor {
    /// Descriptor for an activity task list.
    pub fn activity(task_list: TaskList) -> Self {
        Self {
            kind: QueueKind::Activity,
            task_list,
        }
    }

    /// Descriptor for a decision task list.
    pub fn decision(task_list: TaskList) -> Self {
        Self {
            kind: QueueKind::Decision,
            task_list,
        }
    }

    /// The task list name.
    pub fn name(&self) -> &str {
        &self.task_list.name
    }
}

impl fmt::Display for QueueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.task_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_descriptor_identity_includes_kind() {
        let activity = QueueDescriptor::activity(TaskList::new("shared"));
        let decision = QueueDescriptor::decision(TaskList::new("shared"));
        assert_ne!(activity, decision);

        let set: HashSet<_> = [
            activity.clone(),
            decision,
            QueueDescriptor::activity(TaskList::new("shared")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&activity));
    }

    #[test]
    fn test_descriptor_display() {
        let queue = QueueDescriptor::decision(TaskList::new("greetings"));
        assert_eq!(queue.to_string(), "decision:greetings");
        assert_eq!(queue.name(), "greetings");
    }
}
