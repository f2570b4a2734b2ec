pub mod logging;
pub mod nullable;
