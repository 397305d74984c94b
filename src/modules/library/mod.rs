pub mod catalog;
pub mod playlist_io;
pub mod scanner;
pub mod search_engine;
