pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod lookup;
pub mod markup;
pub mod matcher;
pub mod output;
pub mod reference;
pub mod runner;
pub mod softwareupdate;
