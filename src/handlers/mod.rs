pub mod builds;
pub mod checklist;
pub mod members;
pub mod stash;
