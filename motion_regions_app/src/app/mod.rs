mod app_cfg;
mod app_fns;
mod arg_parse;
mod errors;
mod frame_dir;
mod sinks;

pub(crate) use app_cfg::*;
pub(crate) use errors::*;

pub use app_fns::run_app;
