mod catalog;
mod common;
mod entity;
