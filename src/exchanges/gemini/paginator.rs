//! Cursor-driven trade history pagination
//!
//! Retrieves an unbounded historical trade stream in bounded pages by
//! advancing a timestamp cursor taken from the server's own trade records.
//! Offset pagination is unstable under concurrent trade insertion; the
//! time cursor avoids duplicate and missing records as long as the
//! exchange returns pages ordered by insertion time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::parse::{self, RawTrade};
use crate::client::Pacer;
use crate::errors::GeminiResult;
use crate::types::Trade;

/// One-page fetch seam, so the pagination loop can run against a mock in
/// tests
#[async_trait]
pub trait TradePageFetcher: Send + Sync {
    /// Fetch one raw page of trades at the given cursor
    async fn fetch_page(
        &self,
        symbol: &str,
        cursor: Option<DateTime<Utc>>,
        limit: usize,
    ) -> GeminiResult<Vec<RawTrade>>;
}

/// Pagination state machine: fetch a page, canonicalize and deliver it,
/// advance the cursor, repeat until exhausted or cancelled.
///
/// Each instance is self-contained; concurrent runs against the same
/// symbol need no external synchronization. On a fetch error the cursor
/// stays at its last advanced value, so the run is resumable by reading
/// [`cursor`](Self::cursor) and starting a new run from there.
pub struct TradeHistoryPaginator<'a, F: TradePageFetcher> {
    fetcher: &'a F,
    pacer: &'a dyn Pacer,
    page_limit: usize,
    cursor: Option<DateTime<Utc>>,
}

impl<'a, F: TradePageFetcher> TradeHistoryPaginator<'a, F> {
    pub fn new(fetcher: &'a F, pacer: &'a dyn Pacer, page_limit: usize) -> Self {
        Self {
            fetcher,
            pacer,
            page_limit,
            cursor: None,
        }
    }

    /// The moving timestamp boundary for the next page request
    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor
    }

    /// Run the pagination loop.
    ///
    /// The first request omits the cursor when `since` is `None`; in that
    /// case a single unbounded fetch is made and the loop ends after one
    /// delivery. Each delivered page is stable-sorted ascending by
    /// timestamp regardless of raw page order. The consumer returns
    /// `false` to cancel cooperatively; the paginator never forces
    /// cancellation on its own. Fetch errors propagate immediately.
    pub async fn run<C>(
        &mut self,
        symbol: &str,
        since: Option<DateTime<Utc>>,
        mut consumer: C,
    ) -> GeminiResult<()>
    where
        C: FnMut(Vec<Trade>) -> bool + Send,
    {
        self.cursor = since;

        loop {
            // FETCHING
            let raw_page = self
                .fetcher
                .fetch_page(symbol, self.cursor, self.page_limit)
                .await?;

            if raw_page.is_empty() {
                debug!(%symbol, "empty page, pagination done");
                break;
            }

            let page_len = raw_page.len();

            // The page's first element is the most recent in request
            // order; its timestamp becomes the boundary for the next page.
            // Out-of-range timestamps degrade to the epoch, like every
            // other canonicalized instant, instead of clearing the cursor.
            if self.cursor.is_some() {
                self.cursor = Some(parse::from_millis(raw_page[0].timestampms));
            }

            // DELIVERING
            let mut trades: Vec<Trade> = raw_page.iter().map(parse::parse_trade).collect();
            trades.sort_by_key(|t| t.timestamp);

            debug!(%symbol, page_len, cursor = ?self.cursor, "delivering page");

            if !consumer(trades) {
                debug!(%symbol, "consumer cancelled pagination");
                break;
            }

            // DONE when exhausted or when no cursor was ever established
            // (a single unbounded fetch)
            if self.cursor.is_none() || page_len < self.page_limit {
                break;
            }

            self.pacer.pause().await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoopPacer;
    use crate::errors::GeminiError;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn raw(tid: i64, timestampms: i64) -> RawTrade {
        RawTrade {
            timestampms,
            tid,
            price: dec!(50000),
            amount: dec!(0.1),
            side: "buy".into(),
        }
    }

    /// Most recent first, as the exchange returns pages
    fn page_descending(first_ms: i64, len: usize) -> Vec<RawTrade> {
        (0..len as i64)
            .map(|i| raw(first_ms - i, first_ms - i))
            .collect()
    }

    struct ScriptedFetcher {
        pages: Mutex<Vec<GeminiResult<Vec<RawTrade>>>>,
        seen_cursors: Mutex<Vec<Option<DateTime<Utc>>>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<GeminiResult<Vec<RawTrade>>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                seen_cursors: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.seen_cursors.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TradePageFetcher for ScriptedFetcher {
        async fn fetch_page(
            &self,
            _symbol: &str,
            cursor: Option<DateTime<Utc>>,
            _limit: usize,
        ) -> GeminiResult<Vec<RawTrade>> {
            self.seen_cursors.lock().unwrap().push(cursor);
            self.pages.lock().unwrap().remove(0)
        }
    }

    fn since(ms: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(ms)
    }

    #[tokio::test]
    async fn test_three_pages_deliver_three_times_and_stop() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_descending(1_000_100, 100)),
            Ok(page_descending(1_000_200, 100)),
            Ok(page_descending(1_000_240, 40)),
        ]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let mut deliveries = 0usize;
        paginator
            .run("btcusd", since(1_000_000), |_trades| {
                deliveries += 1;
                true
            })
            .await
            .unwrap();

        assert_eq!(deliveries, 3);
        assert_eq!(fetcher.fetch_count(), 3);

        // Cursor strictly advances; no request repeats an earlier boundary
        let cursors = fetcher.seen_cursors.lock().unwrap().clone();
        assert_eq!(
            cursors,
            vec![since(1_000_000), since(1_000_100), since(1_000_200)]
        );
        for pair in cursors.windows(2) {
            assert!(pair[0].unwrap() < pair[1].unwrap());
        }
    }

    #[tokio::test]
    async fn test_consumer_cancellation_stops_after_one_page() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_descending(1_000_100, 100)),
            Ok(page_descending(1_000_200, 100)),
        ]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let mut deliveries = 0usize;
        paginator
            .run("btcusd", since(1_000_000), |_trades| {
                deliveries += 1;
                false
            })
            .await
            .unwrap();

        assert_eq!(deliveries, 1);
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_ends_without_delivery() {
        let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let mut deliveries = 0usize;
        paginator
            .run("btcusd", since(1_000_000), |_trades| {
                deliveries += 1;
                true
            })
            .await
            .unwrap();

        assert_eq!(deliveries, 0);
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_no_starting_instant_means_single_unbounded_fetch() {
        // Full page, but no cursor was ever established
        let fetcher = ScriptedFetcher::new(vec![Ok(page_descending(1_000_100, 100))]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let mut deliveries = 0usize;
        paginator
            .run("btcusd", None, |_trades| {
                deliveries += 1;
                true
            })
            .await
            .unwrap();

        assert_eq!(deliveries, 1);
        assert_eq!(fetcher.fetch_count(), 1);
        assert_eq!(fetcher.seen_cursors.lock().unwrap()[0], None);
    }

    #[tokio::test]
    async fn test_delivered_pages_are_sorted_ascending() {
        let shuffled = vec![raw(3, 1_000_300), raw(1, 1_000_100), raw(2, 1_000_200)];
        let fetcher = ScriptedFetcher::new(vec![Ok(shuffled)]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let mut delivered = Vec::new();
        paginator
            .run("btcusd", None, |trades| {
                delivered = trades;
                true
            })
            .await
            .unwrap();

        let ids: Vec<i64> = delivered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for pair in delivered.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_degrades_cursor_to_epoch() {
        // A full page whose newest record carries an unrepresentable
        // timestamp must keep paginating with the degraded epoch cursor,
        // not end as if no cursor was ever established
        let page = vec![raw(9, i64::MAX), raw(8, 2000), raw(7, 1000)];
        let fetcher = ScriptedFetcher::new(vec![Ok(page), Ok(Vec::new())]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 3);

        paginator.run("btcusd", since(500), |_| true).await.unwrap();

        assert_eq!(fetcher.fetch_count(), 2);
        let cursors = fetcher.seen_cursors.lock().unwrap().clone();
        assert_eq!(cursors[1], Some(DateTime::<Utc>::UNIX_EPOCH));
        assert_eq!(paginator.cursor(), Some(DateTime::<Utc>::UNIX_EPOCH));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_and_keeps_cursor() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_descending(1_000_100, 100)),
            Err(GeminiError::RequestTimeout {
                url: "https://api.gemini.com/v1/trades/btcusd".into(),
            }),
        ]);
        let pacer = NoopPacer;
        let mut paginator = TradeHistoryPaginator::new(&fetcher, &pacer, 100);

        let result = paginator.run("btcusd", since(1_000_000), |_| true).await;
        assert!(matches!(result, Err(GeminiError::RequestTimeout { .. })));

        // Cursor stayed at the last successfully advanced value, so the
        // caller can resume from it
        assert_eq!(paginator.cursor(), since(1_000_100));
    }
}
