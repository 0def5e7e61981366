use marquee::prelude::*;
use std::time::Duration;
use tokio::time::sleep;

const STEP: Duration = Duration::from_millis(200);

fn assert_each_marker_once(grid: &GridState) {
    let mut values: Vec<u8> = grid.occupied().into_iter().map(|(_, v)| v).collect();
    values.sort_unstable();
    assert_eq!(values, (1..=MARKER_COUNT as u8).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn stays_still_until_started() {
    let saver = ScreenSaver::new();
    sleep(STEP * 5).await;
    assert_eq!(saver.trail().await, MarkerTrail::new());
    assert_eq!(saver.frames().await, 0);
    assert!(!saver.is_running());
}

#[tokio::test(start_paused = true)]
async fn default_speed_moves_one_cell_per_200ms() {
    let mut saver = ScreenSaver::new();
    saver.start_animation(AnimationSpeed::default());
    assert_eq!(saver.interval(), Some(STEP));

    sleep(STEP * 3 + STEP / 2).await;

    assert_eq!(saver.frames().await, 3);
    let mut expected = MarkerTrail::new();
    for _ in 0..3 {
        expected.advance();
    }
    assert_eq!(saver.trail().await, expected);
    assert_eq!(saver.grid().await, GridState::from_trail(&expected));
}

#[tokio::test(start_paused = true)]
async fn frames_keep_grid_and_trail_consistent() {
    let mut saver = ScreenSaver::new();
    let mut events = saver.subscribe();
    saver.start_animation(Duration::from_millis(10));

    let mut previous = MarkerTrail::new();
    let mut frames = 0;
    while frames < 40 {
        match events.recv().await {
            Ok(AnimationEvent::Frame(frame)) => {
                frames += 1;
                assert_eq!(frame.tick, frames);
                assert_eq!(frame.trail.leader(), next_position(previous.leader()));
                for i in 1..MARKER_COUNT {
                    assert_eq!(frame.trail.positions()[i], previous.positions()[i - 1]);
                }
                assert_each_marker_once(&frame.grid);
                previous = frame.trail.clone();
            }
            Ok(_) => {}
            Err(err) => panic!("animation stream closed: {err}"),
        }
    }
    saver.stop_animation();
}

#[tokio::test(start_paused = true)]
async fn leader_hands_off_to_the_next_grid() {
    let mut saver = ScreenSaver::new();
    saver.start_animation(STEP);

    // The leader starts three cells into the first lap of ROWS + COLS - 1 cells.
    let steps_to_hand_off = (ROWS + COLS - 1 - 3) as u32;
    sleep(STEP * steps_to_hand_off + STEP / 2).await;

    let trail = saver.trail().await;
    assert_eq!(trail.leader(), Position::new(1, 0, 0));
    assert_eq!(trail.positions()[1], Position::new(0, ROWS - 1, COLS - 1));
}

#[tokio::test(start_paused = true)]
async fn stop_freezes_the_train() {
    let mut saver = ScreenSaver::new();
    let mut events = saver.subscribe();
    saver.start_animation(STEP);
    sleep(STEP * 2 + STEP / 2).await;

    saver.stop_animation();
    saver.stop_animation();
    let frozen = saver.trail().await;

    sleep(STEP * 5).await;
    assert_eq!(saver.trail().await, frozen);
    assert!(!saver.is_running());

    let mut stopped = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, AnimationEvent::Stopped) {
            stopped += 1;
        }
    }
    assert_eq!(stopped, 1);
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_double_the_step_rate() {
    let mut saver = ScreenSaver::new();
    saver.start_animation(STEP);
    sleep(STEP + STEP / 2).await;
    saver.start_animation(STEP);
    sleep(STEP * 2 + STEP / 4).await;

    assert_eq!(saver.frames().await, 3);
}

#[tokio::test(start_paused = true)]
async fn named_speeds_change_the_step_period() {
    let mut saver = ScreenSaver::new();
    saver.start_animation(AnimationSpeed::Fast);
    sleep(Duration::from_millis(450)).await;
    assert_eq!(saver.frames().await, 4);

    saver.start_animation(AnimationSpeed::Slow);
    assert_eq!(saver.interval(), Some(Duration::from_millis(400)));
}
