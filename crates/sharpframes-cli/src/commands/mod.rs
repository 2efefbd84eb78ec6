pub mod config;
pub mod info;
pub mod pick;
pub mod run;
pub mod scan;
