pub mod add;
pub mod done;
pub mod edit;
pub mod list;
pub mod note;
pub mod seed;
pub mod show;
pub mod user;
