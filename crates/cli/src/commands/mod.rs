pub mod reset;
pub mod show;
pub mod status;
pub mod url;
