pub mod job;

pub use job::{Job, JobFilter, JobUpdate, NewJob};
