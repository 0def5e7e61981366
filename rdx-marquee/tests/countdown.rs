use marquee::components::countdown::{CompletionCallback, Countdown, CountdownPhase};
use marquee::events::CountdownEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const UNIT: Duration = Duration::from_secs(1);

fn counter() -> (Arc<AtomicUsize>, Option<CompletionCallback>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let callback: CompletionCallback = {
        let fired = fired.clone();
        Box::new(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
    };
    (fired, Some(callback))
}

#[tokio::test(start_paused = true)]
async fn completes_after_initial_ticks_and_fires_once() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(3, on_complete);
    assert_eq!(countdown.phase().await, CountdownPhase::Idle);

    countdown.start().await;
    assert_eq!(countdown.phase().await, CountdownPhase::Running);

    sleep(UNIT * 2 + UNIT / 2).await;
    assert_eq!(countdown.remaining().await, 1);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    sleep(UNIT).await;
    assert_eq!(countdown.remaining().await, 0);
    assert_eq!(countdown.phase().await, CountdownPhase::Completed);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!countdown.is_ticking());

    sleep(UNIT * 5).await;
    assert_eq!(countdown.remaining().await, 0);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn works_without_a_completion_callback() {
    let mut countdown = Countdown::new(2, None);
    countdown.start().await;
    sleep(UNIT * 3).await;
    assert_eq!(countdown.phase().await, CountdownPhase::Completed);
}

#[tokio::test(start_paused = true)]
async fn stop_pauses_without_completion() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(5, on_complete);

    countdown.start().await;
    sleep(UNIT * 2 + UNIT / 2).await;
    countdown.stop().await;

    assert_eq!(countdown.phase().await, CountdownPhase::Idle);
    assert_eq!(countdown.remaining().await, 3);

    sleep(UNIT * 10).await;
    assert_eq!(countdown.remaining().await, 3);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn stop_twice_or_before_start_changes_nothing() {
    let mut countdown = Countdown::new(4, None);
    countdown.stop().await;
    countdown.stop().await;
    assert_eq!(countdown.snapshot().await.remaining(), 4);
    assert_eq!(countdown.phase().await, CountdownPhase::Idle);

    countdown.start().await;
    sleep(UNIT + UNIT / 2).await;
    countdown.stop().await;
    let after_first = countdown.snapshot().await;
    countdown.stop().await;
    assert_eq!(countdown.snapshot().await, after_first);
}

#[tokio::test(start_paused = true)]
async fn reset_restores_initial_and_stops_ticking() {
    let mut countdown = Countdown::new(5, None);
    countdown.start().await;
    sleep(UNIT * 2 + UNIT / 2).await;

    countdown.reset().await;
    assert_eq!(countdown.remaining().await, 5);
    assert_eq!(countdown.phase().await, CountdownPhase::Idle);
    assert!(!countdown.is_ticking());

    sleep(UNIT * 3).await;
    assert_eq!(countdown.remaining().await, 5);
}

#[tokio::test(start_paused = true)]
async fn restart_while_running_does_not_double_decrement() {
    let mut countdown = Countdown::new(10, None);
    countdown.start().await;
    sleep(UNIT * 3 + UNIT / 2).await;
    assert_eq!(countdown.remaining().await, 7);

    countdown.start().await;
    assert_eq!(countdown.remaining().await, 10);
    sleep(UNIT * 2 + UNIT / 4).await;
    assert_eq!(countdown.remaining().await, 8);
}

#[tokio::test(start_paused = true)]
async fn start_after_completion_runs_again() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(2, on_complete);

    countdown.start().await;
    sleep(UNIT * 3).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    countdown.start().await;
    assert_eq!(countdown.remaining().await, 2);
    sleep(UNIT * 3).await;
    assert_eq!(countdown.phase().await, CountdownPhase::Completed);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn publishes_tick_and_completion_events() {
    let mut countdown = Countdown::with_tick_period(2, Duration::from_millis(100), None);
    let mut events = countdown.subscribe();

    countdown.start().await;
    sleep(Duration::from_millis(250)).await;

    assert!(matches!(events.try_recv(), Ok(CountdownEvent::Started { from: 2 })));
    assert!(matches!(events.try_recv(), Ok(CountdownEvent::Tick { remaining: 1 })));
    assert!(matches!(events.try_recv(), Ok(CountdownEvent::Tick { remaining: 0 })));
    assert!(matches!(events.try_recv(), Ok(CountdownEvent::Completed { .. })));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_countdown_cancels_its_ticker() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(1, on_complete);
    countdown.start().await;
    drop(countdown);

    sleep(UNIT * 3).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_initial_value_never_fires_completion() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(0, on_complete);

    countdown.start().await;
    sleep(UNIT * 3 + UNIT / 2).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(countdown.remaining().await, 0);
    assert_eq!(countdown.phase().await, CountdownPhase::Running);
    assert!(!countdown.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn dispose_leaves_a_running_countdown_idle() {
    let (fired, on_complete) = counter();
    let mut countdown = Countdown::new(5, on_complete);
    let mut events = countdown.subscribe();

    countdown.start().await;
    sleep(UNIT + UNIT / 2).await;
    countdown.dispose();

    assert!(!countdown.is_ticking());
    assert_eq!(countdown.phase().await, CountdownPhase::Idle);
    assert_eq!(countdown.remaining().await, 4);

    sleep(UNIT * 10).await;
    assert_eq!(countdown.remaining().await, 4);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    let mut stopped = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, CountdownEvent::Stopped { remaining: 4 }) {
            stopped += 1;
        }
    }
    assert_eq!(stopped, 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_keeps_a_completed_countdown_completed() {
    let mut countdown = Countdown::new(1, None);
    countdown.start().await;
    sleep(UNIT * 2).await;

    countdown.dispose();
    assert_eq!(countdown.phase().await, CountdownPhase::Completed);
}
