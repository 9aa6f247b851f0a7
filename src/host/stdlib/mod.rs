pub mod io;

use super::{HostModuleHandle, OutputSink};

/// Maps a path under `std.` (prefix already stripped) to a bundled module.
pub fn resolve_bundled(path: &str, out: OutputSink) -> Option<HostModuleHandle> {
    match path {
        "io" => Some(io::module(out)),
        _ => None,
    }
}
