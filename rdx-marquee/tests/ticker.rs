use marquee::ticker::{PeriodicTicker, TickFlow, MIN_INTERVAL};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const PERIOD: Duration = Duration::from_millis(100);

fn counting_ticker(calls: &Arc<AtomicUsize>) -> PeriodicTicker {
    let calls = calls.clone();
    PeriodicTicker::new("test", move || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            TickFlow::Continue
        }
    })
}

#[tokio::test(start_paused = true)]
async fn first_call_waits_one_interval() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    ticker.start(PERIOD);
    sleep(PERIOD / 2).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(ticker.is_running());

    sleep(PERIOD).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn calls_once_per_interval() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    ticker.start(PERIOD);
    sleep(PERIOD * 3 + PERIOD / 2).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(ticker.tick_count(), 3);
    assert_eq!(ticker.interval(), Some(PERIOD));
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    assert!(!ticker.stop());
    assert!(!ticker.stop());
    assert!(!ticker.is_running());

    ticker.start(PERIOD);
    sleep(PERIOD + PERIOD / 2).await;
    assert!(ticker.stop());
    assert!(!ticker.stop());
    assert_eq!(ticker.interval(), None);

    sleep(PERIOD * 5).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_previous_repetition() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    ticker.start(PERIOD);
    sleep(PERIOD + PERIOD / 2).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Restart halfway between ticks; the old schedule must not keep firing.
    ticker.start(PERIOD);
    sleep(PERIOD * 2 + PERIOD / 4).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(ticker.tick_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn callback_can_end_its_own_repetition() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = {
        let calls = calls.clone();
        PeriodicTicker::new("self-stopping", move || {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                    TickFlow::Stop
                } else {
                    TickFlow::Continue
                }
            }
        })
    };

    ticker.start(PERIOD);
    sleep(PERIOD * 10).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!ticker.is_running());
    assert!(!ticker.stop());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_ticker_cancels_it() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    ticker.start(PERIOD);
    drop(ticker);
    sleep(PERIOD * 5).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_clamped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut ticker = counting_ticker(&calls);

    ticker.start(Duration::ZERO);
    assert_eq!(ticker.interval(), Some(MIN_INTERVAL));

    sleep(MIN_INTERVAL * 10).await;
    assert!(calls.load(Ordering::SeqCst) >= 5);
}
