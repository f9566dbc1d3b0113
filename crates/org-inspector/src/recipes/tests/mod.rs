mod common;
mod lists;
mod parameters;
