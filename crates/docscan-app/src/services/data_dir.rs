// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where docscan keeps its configuration when `--config` is not given.

use std::ffi::OsString;
use std::path::PathBuf;

/// Directory under the data home that belongs to docscan.
const APP_DIR: &str = "docscan";

/// Name of the configuration file inside the docscan directory.
pub const CONFIG_FILE: &str = "config.json";

/// Default configuration file for this user.
///
/// Nothing is created here; a missing file loads as the defaults.
pub fn config_path() -> PathBuf {
    let path = resolve_config_path(
        std::env::var_os("XDG_DATA_HOME"),
        std::env::var_os("HOME"),
    );
    tracing::debug!(path = %path.display(), "default config path");
    path
}

/// `$XDG_DATA_HOME/docscan/config.json`, else `~/.local/share/docscan/...`,
/// else the system temp directory. An empty variable counts as unset.
fn resolve_config_path(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let set = |value: Option<OsString>| value.filter(|v| !v.is_empty()).map(PathBuf::from);
    let data_home = set(xdg_data_home)
        .or_else(|| set(home).map(|home| home.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir);
    data_home.join(APP_DIR).join(CONFIG_FILE)
}
