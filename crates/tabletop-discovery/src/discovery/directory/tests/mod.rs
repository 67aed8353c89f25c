mod common;
mod search;
