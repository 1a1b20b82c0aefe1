mod catalog;
mod common;
mod upload;
