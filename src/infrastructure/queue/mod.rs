mod jobs;

pub use jobs::{keys, queues, JobRecord, JobState, ProcessQueryJob};
