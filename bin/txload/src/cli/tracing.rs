// This file is part of txload.
//
// txload is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// txload is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with txload.
// If not, see https://www.gnu.org/licenses/.

use std::io;

pub use tracing::*;
use tracing::{subscriber, subscriber::Interest, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, EnvFilter, FmtSubscriber, Layer,
};

use super::LogsArgs;

/// Install the global subscriber
///
/// Logs go to stderr unless a file is given, since stdout carries the run's progress
/// lines. Without `RUST_LOG` only warnings and errors are shown.
pub fn configure_logging(config: &LogsArgs) -> anyhow::Result<WorkerGuard> {
    let (appender, guard) = match &config.file {
        Some(log_file) => {
            tracing_appender::non_blocking(tracing_appender::rolling::never(".", log_file))
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(config.file.is_none())
        .with_writer(appender);
    if config.json {
        subscriber::set_global_default(builder.json().finish().with(TargetBlacklistLayer))?;
    } else {
        subscriber::set_global_default(builder.pretty().finish().with(TargetBlacklistLayer))?;
    }

    // alloy's HTTP stack logs through `log`
    LogTracer::init()?;

    Ok(guard)
}

/// HTTP client internals, noisy at debug level
const BLACKLISTED_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "tower::buffer"];

fn is_blacklisted(target: &str) -> bool {
    BLACKLISTED_TARGETS.iter().any(|blocked| {
        target
            .strip_prefix(blocked)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

struct TargetBlacklistLayer;

impl<S: Subscriber> Layer<S> for TargetBlacklistLayer {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if is_blacklisted(metadata.target()) {
            Interest::never()
        } else {
            Interest::always()
        }
    }
}
