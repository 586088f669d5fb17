//! OpenCTM command-line tools
//!
//! Library half of `ctmconv` and `ctminfo`: conversion settings, the
//! external converter registry, and file summaries.

pub mod convert;
pub mod error;
pub mod external;
pub mod info;

pub use convert::{export_context, load_ctm, ConvertOptions, Converter};
pub use error::{ToolError, ToolResult};
pub use external::{CommandRunner, ConverterRegistry, SystemCommandRunner};
pub use info::describe;

/// Installs `env_logger` with `info` as the default filter, or `debug`
/// when `verbose` is set. `RUST_LOG` overrides both.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}
