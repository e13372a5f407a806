pub mod header;
pub mod todo_item;
pub mod todo_list;
