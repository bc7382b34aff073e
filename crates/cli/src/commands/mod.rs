pub mod check;
pub mod export;
pub mod info;
pub mod init;
pub mod run;
pub mod table;
