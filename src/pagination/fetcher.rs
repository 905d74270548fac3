//! The pagination loop

use super::clock::Clock;
use super::machine::{advance, check_limit, on_rate_limited};
use super::types::{Completion, Decision, LoopState, Outcome, Progress};
use crate::classify::{classify, Classification};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::http::RequestExecutor;
use crate::ratelimit::{RateLimitHeaders, StateStore};
use std::io::Write;
use tracing::{debug, info, warn};

/// Walks one resource's cursor chain, writing each page as a line of NDJSON.
///
/// Strictly sequential: one request at a time and no request while waiting.
pub struct Fetcher<'a> {
    config: &'a FetchConfig,
    executor: &'a dyn RequestExecutor,
    store: &'a dyn StateStore,
    clock: &'a dyn Clock,
}

impl<'a> Fetcher<'a> {
    pub fn new(
        config: &'a FetchConfig,
        executor: &'a dyn RequestExecutor,
        store: &'a dyn StateStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            executor,
            store,
            clock,
        }
    }

    /// Run the loop until it finishes, aborts or fails.
    ///
    /// The rate-limit snapshot is persisted after every request attempt,
    /// whatever its result. Executor failures and persistence failures are
    /// returned as errors; policy aborts are an [`Outcome`].
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<Outcome> {
        let mut limits = self.store.load()?.unwrap_or_default();
        let mut progress = Progress::default();
        let mut state = LoopState::Start;

        loop {
            state = match state {
                LoopState::Start => {
                    progress = Progress::new(self.config.start_cursor.clone());
                    debug!(
                        "Starting {} at cursor {}; {limits}",
                        self.config.resource,
                        cursor_label(&progress)
                    );
                    LoopState::CheckLimit
                }

                LoopState::CheckLimit => {
                    match check_limit(self.config, &progress, &limits, self.clock.now()) {
                        Decision::Proceed => LoopState::Fetch,
                        Decision::Finish => LoopState::Done(Completion::PageLimit),
                        Decision::Abort(reason) => LoopState::Aborted(reason),
                        Decision::Wait(delay) => {
                            info!(
                                "Rate-limit window exhausted, waiting {}s (reset at {:?})",
                                delay.seconds, limits.reset_epoch
                            );
                            self.clock.sleep(delay).await;
                            limits.refill_with(self.config.refill);
                            LoopState::Fetch
                        }
                    }
                }

                LoopState::Fetch => {
                    let request = self.config.build_request(progress.cursor.as_ref())?;
                    debug!(
                        "Fetching page {} ({} {})",
                        progress.pages + 1,
                        request.method,
                        request.url
                    );

                    match self.executor.execute(&request).await {
                        Ok(response) => {
                            limits.apply(RateLimitHeaders::from_headers(&response.headers));
                            self.store.save(&limits)?;
                            debug!("HTTP {}; {limits}", response.status);
                            LoopState::Classify(response)
                        }
                        Err(e) => {
                            self.store.save(&limits)?;
                            LoopState::Failed(e)
                        }
                    }
                }

                LoopState::Classify(response) => {
                    match classify(&response.body, &self.config.classifier) {
                        Classification::RateLimited => LoopState::RateLimitedRetry,
                        Classification::OtherError(body) => {
                            warn!(
                                "API returned an error (HTTP {}), passing it through",
                                response.status
                            );
                            write_line(out, &body)?;
                            LoopState::Done(Completion::ApiError)
                        }
                        Classification::Success { page, next_cursor } => {
                            LoopState::EmitAndAdvance { page, next_cursor }
                        }
                    }
                }

                LoopState::RateLimitedRetry => {
                    match on_rate_limited(self.config, &limits, self.clock.now()) {
                        Decision::Wait(delay) => {
                            warn!(
                                "Rate limited by server, waiting {}s before retrying cursor {}",
                                delay.seconds,
                                cursor_label(&progress)
                            );
                            self.clock.sleep(delay).await;
                            limits.refill();
                            LoopState::CheckLimit
                        }
                        Decision::Abort(reason) => LoopState::Aborted(reason),
                        Decision::Proceed | Decision::Finish => LoopState::CheckLimit,
                    }
                }

                LoopState::EmitAndAdvance { page, next_cursor } => {
                    write_line(out, &page)?;
                    advance(&mut progress, next_cursor)
                }

                LoopState::Done(completion) => {
                    info!(
                        "Finished {} ({completion:?}): {} pages, cursor {}",
                        self.config.resource,
                        progress.pages,
                        cursor_label(&progress)
                    );
                    return Ok(Outcome::Completed {
                        completion,
                        pages: progress.pages,
                        cursor: progress.cursor,
                    });
                }

                LoopState::Aborted(reason) => {
                    return Ok(Outcome::Aborted {
                        reason,
                        pages: progress.pages,
                        cursor: progress.cursor,
                    });
                }

                LoopState::Failed(e) => return Err(e),
            };
        }
    }
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn cursor_label(progress: &Progress) -> &str {
    progress.cursor.as_ref().map_or("(start)", |c| c.as_str())
}
