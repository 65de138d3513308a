use serde::{Deserialize, Serialize};

/// Status of a background job as reported to pollers.
///
/// `InProgress` carries a completion percentage, `Completed` a human-readable
/// summary and `Failed` the reason the job stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}
