use std::time::{Duration, Instant};

use garmentstudio_designer::scheduler::RecompositeScheduler;

fn scheduler() -> RecompositeScheduler {
    RecompositeScheduler::new(Duration::from_millis(150))
}

#[test]
fn test_clean_scheduler_never_fires() {
    let s = scheduler();
    assert!(!s.is_dirty());
    assert!(!s.should_recomposite(Instant::now()));
}

#[test]
fn test_discrete_edit_fires_immediately() {
    let mut s = scheduler();
    let now = Instant::now();
    s.mark_dirty(now);
    assert!(s.should_recomposite(now));
}

#[test]
fn test_interactive_edit_waits_for_quiet_period() {
    let mut s = scheduler();
    let now = Instant::now();
    s.mark_interactive(now);

    assert!(!s.should_recomposite(now));
    assert!(!s.should_recomposite(now + Duration::from_millis(100)));
    assert!(s.should_recomposite(now + Duration::from_millis(150)));
}

#[test]
fn test_move_burst_coalesces_to_trailing_edge() {
    let mut s = scheduler();
    let start = Instant::now();

    // Pointer-move burst: an edit every 20ms for 200ms. The quiet period
    // restarts with each edit, so nothing fires during the burst.
    let mut last = start;
    for i in 0..11 {
        last = start + Duration::from_millis(i * 20);
        s.mark_interactive(last);
        assert!(!s.should_recomposite(last));
    }

    // One composite on the trailing edge
    assert!(s.should_recomposite(last + Duration::from_millis(150)));
    s.acknowledge();
    assert!(!s.should_recomposite(last + Duration::from_secs(10)));
    assert_eq!(s.stats().composites, 1);
}

#[test]
fn test_discrete_edit_overrides_pending_interactive() {
    let mut s = scheduler();
    let now = Instant::now();
    s.mark_interactive(now);
    assert!(!s.should_recomposite(now));

    // A drag commit is discrete and flushes right away
    s.mark_dirty(now + Duration::from_millis(10));
    assert!(s.should_recomposite(now + Duration::from_millis(10)));
}

#[test]
fn test_acknowledge_clears_dirty() {
    let mut s = scheduler();
    s.mark_dirty(Instant::now());
    assert!(s.is_dirty());
    s.acknowledge();
    assert!(!s.is_dirty());
}

#[test]
fn test_stats_count_edits() {
    let mut s = scheduler();
    let now = Instant::now();
    s.mark_dirty(now);
    s.mark_interactive(now);
    s.mark_interactive(now);
    assert_eq!(s.stats().edits, 3);
}
