//! The `zoodro watch` loop: view lines in, vendor lists out.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use zoodro_coordinator::Coordinator;
use zoodro_core::MapView;

use crate::{report, view_line};

/// Feeds every line of `input` to the coordinator as a view change and
/// writes each accepted vendor list to `out`.
///
/// When the input ends, the view still inside the debounce window is
/// fetched right away so the last line is never lost.
pub(crate) async fn run<R, W>(
    coordinator: &Coordinator,
    input: R,
    base: MapView,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut vendors = coordinator.vendors();
    let mut lines = input.lines();
    let mut last_view = base;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match view_line::parse(&line, &last_view) {
                    Ok(view) => {
                        last_view = view;
                        coordinator.view_changed(view)?;
                    }
                    Err(err) => tracing::warn!(line = %line, error = %err, "ignoring input line"),
                }
            }
            Ok(()) = vendors.changed() => {
                let current = vendors.borrow_and_update().clone();
                write!(out, "{}", report::format_vendors(last_view.center, &current))?;
            }
        }
    }

    coordinator.flush().await?;
    if vendors.has_changed().unwrap_or(false) {
        let current = vendors.borrow_and_update().clone();
        write!(out, "{}", report::format_vendors(last_view.center, &current))?;
    }
    Ok(())
}
