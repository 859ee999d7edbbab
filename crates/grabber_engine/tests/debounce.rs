use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use grabber_engine::Debouncer;
use tokio::runtime::Handle;
use tokio::time::sleep;

fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let for_factory = fired.clone();
    let factory = move || {
        let fired = for_factory.clone();
        Box::new(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        }) as Box<dyn FnOnce() + Send>
    };
    (fired, factory)
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_fires_once_after_last() {
    let mut debouncer = Debouncer::new(Handle::current());
    let (fired, make_fire) = counter();
    let delay = Duration::from_millis(800);

    for _ in 0..5 {
        debouncer.schedule(delay, make_fire());
        sleep(Duration::from_millis(300)).await;
    }
    // 300ms after the last keystroke: still quiet.
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    sleep(Duration::from_millis(499)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(debouncer.is_pending());

    sleep(Duration::from_millis(2)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_fire_separately() {
    let mut debouncer = Debouncer::new(Handle::current());
    let (fired, make_fire) = counter();
    let delay = Duration::from_millis(800);

    debouncer.schedule(delay, make_fire());
    sleep(Duration::from_millis(900)).await;
    debouncer.schedule(delay, make_fire());
    sleep(Duration::from_millis(900)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_timer() {
    let mut debouncer = Debouncer::new(Handle::current());
    let (fired, make_fire) = counter();

    debouncer.schedule(Duration::from_millis(800), make_fire());
    sleep(Duration::from_millis(100)).await;
    debouncer.cancel();
    sleep(Duration::from_secs(2)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(!debouncer.is_pending());
}
