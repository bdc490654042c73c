pub mod timefix_core;
