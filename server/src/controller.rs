pub use list::ListController;

mod list;
