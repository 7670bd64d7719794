mod common;
mod explain;
mod service;
