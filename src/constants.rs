//! Record keys, environment variable names, and fixed poll options.

/// Top-level record key holding the activity poll request.
pub const POLL_FOR_ACTIVITY_TASK: &str = "pollForActivityTask";

/// Top-level record key holding the activity task.
pub const ACTIVITY_TASK: &str = "activityTask";

/// Top-level record key holding the decision poll request.
pub const POLL_FOR_DECISION_TASK: &str = "pollForDecisionTask";

/// Top-level record key holding the decision task.
pub const DECISION_TASK: &str = "decisionTask";

/// Maximum number of history events SWF returns per decision poll page.
pub const DECISION_PAGE_SIZE: i32 = 1;

/// Decision polls request the newest history events first.
pub const DECISION_REVERSE_ORDER: bool = true;

/// Region used when the default provider chain cannot detect one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Workflow domain to poll (required).
pub const ENV_DOMAIN: &str = "DOMAIN";

/// Comma-separated activity task list names.
pub const ENV_ACTIVITY_TASK_LISTS: &str = "ACTIVITY_TASK_LISTS";

/// Comma-separated decision task list names.
pub const ENV_DECISION_TASK_LISTS: &str = "DECISION_TASK_LISTS";

/// Kinesis stream receiving the records (required).
pub const ENV_STREAM_NAME: &str = "STREAM_NAME";

/// Identity reported to SWF on every poll.
pub const ENV_WORKER_IDENTITY: &str = "WORKER_IDENTITY";

/// Pause in milliseconds after a failed cycle. Unset or `0` retries immediately.
pub const ENV_RETRY_DELAY_MS: &str = "RETRY_DELAY_MS";
