pub mod add;
pub mod create;
pub mod dashboard;
pub mod delete;
pub mod due;
pub mod export;
pub mod list;
pub mod reindex;
pub mod review;
pub mod show;
