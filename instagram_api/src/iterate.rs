//! Turns repeated page fetches into one lazy, cancellable sequence.
//!
//! A background task owns the fetch loop. It hands items over one at a
//! time on a bounded channel and reports at most one terminal error on a
//! oneshot channel. Within a page, items are emitted last-to-first; pages
//! follow the server's pagination order.

use tokio::sync::{mpsc, oneshot};

use crate::{
    context::Context,
    pagination::Page,
    types::{Media, PaginatedMediaResponse},
    Client, Error,
};

/// Consumer side of a paginated iteration.
///
/// Read items with [`PageStream::next`] until it returns `None`, then call
/// [`PageStream::finish`] to learn whether the stream ended cleanly.
/// Cancelling the [`Context`] passed to [`Client::iterate`] stops the
/// producer at its next send or fetch.
#[derive(Debug)]
pub struct PageStream<T> {
    items: mpsc::Receiver<T>,
    error: oneshot::Receiver<Error>,
}

impl<T> PageStream<T> {
    /// Waits for the next item. `None` means the producer has stopped.
    pub async fn next(&mut self) -> Option<T> {
        self.items.recv().await
    }

    /// Stops accepting items and waits for the producer to finish.
    ///
    /// Returns the terminal error, if any. A stream stopped by cancellation
    /// while handing over items, or one that ran out of pages, returns `Ok`.
    pub async fn finish(mut self) -> Result<(), Error> {
        self.items.close();
        match self.error.await {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }

    /// Drains every remaining item, then returns them with the terminal result.
    pub async fn collect(mut self) -> (Vec<T>, Result<(), Error>) {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item);
        }
        let result = self.finish().await;
        (items, result)
    }
}

impl Client {
    /// Iterates every item reachable from `first` by following pagination.
    ///
    /// `first` is an already-fetched page; a failed first fetch is the
    /// caller's error to handle. Must be called from within a tokio runtime.
    pub fn iterate<P: Page>(&self, ctx: &Context, first: P) -> PageStream<P::Item> {
        let (item_tx, item_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = oneshot::channel();
        let client = self.clone();
        let ctx = ctx.clone();

        tokio::spawn(async move {
            if let Err(e) = client.produce(&ctx, first, &item_tx).await {
                tracing::debug!("Iteration stopped: {}", e);
                let _ = err_tx.send(e);
            }
        });

        PageStream {
            items: item_rx,
            error: err_rx,
        }
    }

    /// Media version of [`Client::iterate`]. Within a page, media arrive
    /// oldest first, since pages list newest first.
    pub fn iterate_media(&self, ctx: &Context, first: PaginatedMediaResponse) -> PageStream<Media> {
        self.iterate(ctx, first)
    }

    async fn produce<P: Page>(
        &self,
        ctx: &Context,
        first: P,
        items: &mpsc::Sender<P::Item>,
    ) -> Result<(), Error> {
        let mut page = first;
        let mut fetched = 1usize;
        loop {
            let (batch, pagination) = page.into_parts();
            if batch.is_empty() {
                tracing::debug!(pages = fetched, "Iteration reached an empty page");
                return Ok(());
            }

            for item in batch.into_iter().rev() {
                tokio::select! {
                    biased;
                    _ = ctx.done() => return Ok(()),
                    sent = items.send(item) => {
                        if sent.is_err() {
                            return Ok(());
                        }
                    }
                }
            }

            let Some(pagination) = pagination else {
                return Ok(());
            };
            page = match self.next_page::<P>(ctx, &pagination).await? {
                Some(next) => next,
                None => {
                    tracing::debug!(pages = fetched, "Iteration reached the last page");
                    return Ok(());
                }
            };
            fetched += 1;
        }
    }
}
